//! Storage layer for Plannr.
//!
//! The scheduler only ever talks to the narrow [`PlannerStore`] trait; the
//! SQLite implementation lives in [`sqlite`]. Keeping the boundary a trait
//! lets scheduler tests run against an in-memory fake.
//!
//! # Example
//!
//! ```ignore
//! use plannr::store::SqliteStore;
//! use std::path::Path;
//!
//! let mut store = SqliteStore::open(Path::new("plannr.db"))?;
//! let user_id = store.create_user("ada")?;
//! let subject_id = store.create_subject(user_id, "Maths")?;
//! store.create_topic(subject_id, "Integration", 4, 5, 2, 3.0)?;
//! ```

mod sqlite;

pub use sqlite::SqliteStore;

use crate::domain::{SessionRecord, Topic};
use crate::error::Result;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Data-access boundary consumed by the scheduler.
///
/// All methods are synchronous; the planning run itself has no suspension
/// points and treats storage as a blocking collaborator. Implementations are
/// expected to apply `persist_sessions` all-or-nothing per call.
pub trait PlannerStore {
    /// The user's configured daily study hours, if set.
    fn get_daily_budget(&self, user_id: i64) -> Result<Option<f64>>;

    /// Nearest exam date per subject, on or after `on_or_after`. Subjects
    /// with no qualifying exam are absent from the map.
    fn get_upcoming_exams(
        &self,
        user_id: i64,
        on_or_after: NaiveDate,
    ) -> Result<HashMap<i64, NaiveDate>>;

    /// All topics owned by the user, via subject ownership.
    fn get_active_topics(&self, user_id: i64) -> Result<Vec<Topic>>;

    /// Completed minutes per topic, summed over completed sessions. Topics
    /// with no completed work are absent from the map.
    fn get_completed_minutes(
        &self,
        user_id: i64,
        topic_ids: &[i64],
    ) -> Result<HashMap<i64, u32>>;

    /// Write a run's session records as one atomic unit.
    fn persist_sessions(&mut self, user_id: i64, records: &[SessionRecord]) -> Result<()>;
}
