//! Day and week plan types produced by the scheduler.

use crate::domain::session::PlannedSession;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The schedule for one calendar day: budget, leftover, and ordered sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,

    /// The user's configured daily study hours
    pub daily_hours: f64,

    /// Minute budget the day started with
    pub budget_minutes: u32,

    /// Minutes left unallocated after both passes
    pub minutes_left: u32,

    /// Sessions in allocation order
    pub sessions: Vec<PlannedSession>,

    /// Explanatory note when no sessions could be scheduled
    pub note: Option<String>,
}

impl DayPlan {
    /// An empty day plan with budget fields populated and a note.
    pub fn empty(date: NaiveDate, daily_hours: f64, budget_minutes: u32, note: &str) -> Self {
        Self {
            date,
            daily_hours,
            budget_minutes,
            minutes_left: budget_minutes,
            sessions: Vec::new(),
            note: Some(note.to_string()),
        }
    }

    /// Total minutes allocated across this day's sessions.
    pub fn allocated_minutes(&self) -> u32 {
        self.sessions.iter().map(|s| s.duration_minutes).sum()
    }
}

/// The result of one planning run: one DayPlan per day of the horizon
/// (7 for a weekly run, 1 for the single-day variant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    pub days: Vec<DayPlan>,

    /// True only when a persist was requested and every session row was
    /// durably written. Callers must not assume durability when false.
    pub persisted: bool,
}

impl WeekPlan {
    /// Total minutes allocated across the whole horizon.
    pub fn total_allocated_minutes(&self) -> u32 {
        self.days.iter().map(DayPlan::allocated_minutes).sum()
    }

    /// Total number of sessions across the whole horizon.
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }
}
