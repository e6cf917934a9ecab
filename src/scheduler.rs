//! Weekly planning runs.
//!
//! One run is a read-then-mutate-in-memory-then-optionally-flush sequence
//! over a single user's topics: resolve the daily budget and upcoming exams,
//! subtract completed effort, then fold the daily allocator over the horizon
//! while threading the per-topic remaining-effort map from day to day. The
//! map is an explicit value owned by the run, never ambient state.
//!
//! Runs are synchronous and uninterruptible; callers must serialize runs per
//! user, the scheduler does not enforce it.

use crate::allocator::{self, Candidate, MINIMUM_SESSION_MINUTES};
use crate::domain::topic::minutes_from_hours;
use crate::domain::{DayPlan, SessionRecord, SessionStatus, Topic, WeekPlan};
use crate::error::Result;
use crate::scoring::effective_priority;
use crate::store::PlannerStore;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, error, info};
use std::collections::HashMap;

/// Days in a weekly planning horizon
pub const WEEK_DAYS: usize = 7;

/// Daily study hours applied when the user has no stored preference
pub const DEFAULT_DAILY_HOURS: f64 = 2.0;

/// Break inserted between persisted sessions; not counted against the budget
pub const DEFAULT_BREAK_MINUTES: u32 = 10;

/// Time of day the first persisted session of each day starts at
pub const DEFAULT_START_HOUR: u32 = 8;

/// Note attached when the user owns no topics at all
pub const NOTE_NO_TOPICS: &str = "No topics available.";

/// Note attached when every topic's effort is already complete
pub const NOTE_ALL_COMPLETED: &str = "All topics already completed.";

/// Note attached to a day that ends up with no sessions
pub const NOTE_EMPTY_DAY: &str =
    "No sessions scheduled today (all topics exhausted or not enough time).";

/// Tunables that affect persistence layout, sourced from config.
#[derive(Debug, Clone)]
pub struct SchedulingParams {
    /// Fallback when the user has no stored daily-hours preference
    pub default_daily_hours: f64,

    /// Minutes of break between consecutive persisted sessions
    pub break_minutes: u32,

    /// Time of day persisted sessions start from
    pub start_time: NaiveTime,
}

impl Default for SchedulingParams {
    fn default() -> Self {
        Self {
            default_daily_hours: DEFAULT_DAILY_HOURS,
            break_minutes: DEFAULT_BREAK_MINUTES,
            start_time: NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Orchestrates planning runs against a [`PlannerStore`].
pub struct WeeklyScheduler<'a, S: PlannerStore> {
    store: &'a mut S,
    params: SchedulingParams,
}

impl<'a, S: PlannerStore> WeeklyScheduler<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            params: SchedulingParams::default(),
        }
    }

    pub fn with_params(store: &'a mut S, params: SchedulingParams) -> Self {
        Self { store, params }
    }

    /// Plan the next seven days for a user.
    ///
    /// `start_date` defaults to today. With `persist`, every session across
    /// the week is written to the store as one atomic unit with status
    /// pending; the returned plan's `persisted` flag reports whether that
    /// write succeeded.
    pub fn plan_week(
        &mut self,
        user_id: i64,
        start_date: Option<NaiveDate>,
        persist: bool,
    ) -> Result<WeekPlan> {
        self.plan_horizon(user_id, start_date, WEEK_DAYS, persist)
    }

    /// Plan a single day: the degenerate one-day case of the weekly run.
    pub fn plan_today(
        &mut self,
        user_id: i64,
        date: Option<NaiveDate>,
        persist: bool,
    ) -> Result<WeekPlan> {
        self.plan_horizon(user_id, date, 1, persist)
    }

    fn plan_horizon(
        &mut self,
        user_id: i64,
        start_date: Option<NaiveDate>,
        horizon_days: usize,
        persist: bool,
    ) -> Result<WeekPlan> {
        let start = start_date.unwrap_or_else(|| Local::now().date_naive());
        info!("Planning {horizon_days} day(s) for user {user_id} starting {start}");

        // Budget: stored preference or default, floored so at least one
        // minimum session fits.
        let daily_hours = self
            .store
            .get_daily_budget(user_id)?
            .unwrap_or(self.params.default_daily_hours);
        let daily_minutes = minutes_from_hours(daily_hours).max(MINIMUM_SESSION_MINUTES);

        let exams = self.store.get_upcoming_exams(user_id, start)?;
        let topics = self.store.get_active_topics(user_id)?;

        if topics.is_empty() {
            debug!("User {user_id} owns no topics");
            return Ok(empty_plan(
                start,
                horizon_days,
                daily_hours,
                daily_minutes,
                NOTE_NO_TOPICS,
                persist,
            ));
        }

        // Remaining effort per topic: required minus already-completed work.
        // Topics at or below zero contribute nothing further and are dropped
        // from the run entirely.
        let topic_ids: Vec<i64> = topics.iter().map(|t| t.topic_id).collect();
        let completed = self.store.get_completed_minutes(user_id, &topic_ids)?;

        let mut remaining: HashMap<i64, u32> = HashMap::new();
        for topic in &topics {
            let required = topic.required_minutes();
            let done = completed.get(&topic.topic_id).copied().unwrap_or(0);
            if done < required {
                remaining.insert(topic.topic_id, required - done);
            }
        }

        if remaining.is_empty() {
            debug!("User {user_id}: all topics already completed");
            return Ok(empty_plan(
                start,
                horizon_days,
                daily_hours,
                daily_minutes,
                NOTE_ALL_COMPLETED,
                persist,
            ));
        }

        // Fold over the horizon. `remaining` is mutated by each day's
        // allocation and carried into the next, so the week is stateful
        // rather than seven independent runs.
        let mut days = Vec::with_capacity(horizon_days);
        for offset in 0..horizon_days {
            let plan_date = start + Duration::days(offset as i64);
            let candidates = build_candidates(&topics, &remaining, &exams, plan_date);

            let outcome = allocator::allocate_day(candidates, daily_minutes, plan_date);
            for cand in &outcome.candidates {
                remaining.insert(cand.topic_id, cand.remaining_minutes);
            }

            let note = outcome
                .sessions
                .is_empty()
                .then(|| NOTE_EMPTY_DAY.to_string());
            days.push(DayPlan {
                date: plan_date,
                daily_hours,
                budget_minutes: daily_minutes,
                minutes_left: outcome.minutes_left,
                sessions: outcome.sessions,
                note,
            });
        }

        let mut persisted = false;
        if persist {
            let records = self.session_records(&days);
            match self.store.persist_sessions(user_id, &records) {
                Ok(()) => {
                    info!("Persisted {} session(s) for user {user_id}", records.len());
                    persisted = true;
                }
                Err(e) => {
                    // The computed plan is still returned; the flag tells the
                    // caller not to assume durability.
                    error!("Failed to persist sessions for user {user_id}: {e}");
                }
            }
        }

        Ok(WeekPlan { days, persisted })
    }

    /// Lay the run's sessions out as durable records: chronological day
    /// order, within-day allocation order, start times advancing from the
    /// configured start of day by duration plus the break interval.
    fn session_records(&self, days: &[DayPlan]) -> Vec<SessionRecord> {
        let mut records = Vec::new();
        for day in days {
            let mut clock = NaiveDateTime::new(day.date, self.params.start_time);
            for session in &day.sessions {
                records.push(SessionRecord {
                    topic_id: session.topic_id,
                    scheduled_date: day.date,
                    scheduled_time: clock.time(),
                    duration_minutes: session.duration_minutes,
                    status: SessionStatus::Pending,
                });
                clock += Duration::minutes(
                    i64::from(session.duration_minutes) + i64::from(self.params.break_minutes),
                );
            }
        }
        records
    }
}

/// Today's candidate list: every topic with effort left, scored for this
/// specific date. Scores must be rebuilt per day because days-until-exam
/// shrinks as the date advances.
fn build_candidates(
    topics: &[Topic],
    remaining: &HashMap<i64, u32>,
    exams: &HashMap<i64, NaiveDate>,
    plan_date: NaiveDate,
) -> Vec<Candidate> {
    topics
        .iter()
        .filter_map(|topic| {
            let minutes = remaining.get(&topic.topic_id).copied().unwrap_or(0);
            if minutes == 0 {
                return None;
            }
            let days_until_exam = exams
                .get(&topic.subject_id)
                .map(|exam| (*exam - plan_date).num_days());
            Some(Candidate {
                topic_id: topic.topic_id,
                subject_id: topic.subject_id,
                subject_name: topic.subject_name.clone(),
                topic_name: topic.topic_name.clone(),
                remaining_minutes: minutes,
                effective_priority: effective_priority(
                    topic.difficulty,
                    topic.importance,
                    topic.confidence,
                    days_until_exam,
                ),
                days_until_exam,
            })
        })
        .collect()
}

/// A horizon of empty, noted days. With nothing to write, a requested
/// persist is vacuously durable.
fn empty_plan(
    start: NaiveDate,
    horizon_days: usize,
    daily_hours: f64,
    daily_minutes: u32,
    note: &str,
    persist: bool,
) -> WeekPlan {
    let days = (0..horizon_days)
        .map(|offset| {
            DayPlan::empty(
                start + Duration::days(offset as i64),
                daily_hours,
                daily_minutes,
                note,
            )
        })
        .collect();
    WeekPlan {
        days,
        persisted: persist,
    }
}
