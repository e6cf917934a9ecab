//! Domain types for Plannr
//!
//! Plain data structures shared by the scorer, allocator, scheduler, and the
//! storage layer. These are independent of any database representation.

pub mod plan;
pub mod session;
pub mod topic;

pub use plan::{DayPlan, WeekPlan};
pub use session::{PlannedSession, SessionRecord, SessionStatus, StoredSession};
pub use topic::Topic;
