//! Topic records as loaded from storage.

use serde::{Deserialize, Serialize};

/// A unit of study content owned (via its subject) by one user.
///
/// `difficulty`, `importance`, and `confidence` are expected on a 1-5 scale.
/// The scale is a precondition owned by topic creation upstream; the planner
/// tolerates out-of-range values rather than re-checking them here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: i64,

    pub subject_id: i64,

    /// Subject name, denormalized for display
    pub subject_name: String,

    pub topic_name: String,

    pub difficulty: u8,

    pub importance: u8,

    /// Self-rated confidence; lower values raise priority
    pub confidence: u8,

    /// Total effort the topic requires, as stored
    pub hours_required: f64,
}

impl Topic {
    /// Total required effort in whole minutes.
    pub fn required_minutes(&self) -> u32 {
        minutes_from_hours(self.hours_required)
    }
}

/// Convert fractional hours to whole minutes, rounding to nearest.
pub fn minutes_from_hours(hours: f64) -> u32 {
    (hours * 60.0).round() as u32
}
