//! Study session types.
//!
//! A `PlannedSession` is an in-memory allocation produced by the scheduler.
//! A `SessionRecord` is the durable form written to storage when a plan is
//! persisted; a `StoredSession` is one read back out.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One bounded study session allocated to a topic on a specific day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedSession {
    pub topic_id: i64,

    pub subject_id: i64,

    pub subject_name: String,

    pub topic_name: String,

    /// Always within [25, 50] minutes
    pub duration_minutes: u32,

    /// The day this session is scheduled on
    pub plan_date: NaiveDate,

    /// Days until the subject's nearest exam at the time this session was
    /// scored; `None` means no upcoming exam. Retained for display and audit,
    /// never re-derived later.
    pub days_until_exam: Option<i64>,
}

/// Status of a persisted session.
///
/// The `pending -> completed` transition happens outside the scheduler (user
/// action); completed minutes are what the next planning run subtracts from
/// each topic's required effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Completed => "completed",
        }
    }
}

/// A session row to be written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub topic_id: i64,

    pub scheduled_date: NaiveDate,

    pub scheduled_time: NaiveTime,

    pub duration_minutes: u32,

    pub status: SessionStatus,
}

/// A session row read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: i64,

    pub topic_id: i64,

    pub topic_name: String,

    pub scheduled_date: NaiveDate,

    pub scheduled_time: NaiveTime,

    pub duration_minutes: u32,

    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(SessionStatus::Pending.as_str(), "pending");
        assert_eq!(SessionStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let status: SessionStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, SessionStatus::Completed);
    }

    #[test]
    fn test_planned_session_serialization_roundtrip() {
        let session = PlannedSession {
            topic_id: 1,
            subject_id: 2,
            subject_name: "Physics".to_string(),
            topic_name: "Waves".to_string(),
            duration_minutes: 50,
            plan_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            days_until_exam: Some(10),
        };
        let json = serde_json::to_string(&session).unwrap();
        let restored: PlannedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.topic_id, 1);
        assert_eq!(restored.duration_minutes, 50);
        assert_eq!(restored.days_until_exam, Some(10));
    }
}
