//! Daily session allocation.
//!
//! Packs one day's minute budget with bounded study sessions in two passes:
//!
//! - **Phase 1** drains whole preferred (50-minute) blocks from candidates in
//!   priority order, fully exhausting one topic's whole blocks before moving
//!   to the next.
//! - **Phase 2** fills what is left with sessions between the minimum (25)
//!   and preferred size, re-scanning the priority order after every single
//!   allocation.
//!
//! No session below the minimum is ever emitted. Once every candidate's
//! remaining effort is below the minimum the day (and the remainder of the
//! topic, for the rest of the run) goes unscheduled; see the note on stranded
//! remainders in DESIGN.md.

use crate::domain::PlannedSession;
use chrono::NaiveDate;

/// Preferred session length used by the first allocation pass
pub const PREFERRED_SESSION_MINUTES: u32 = 50;

/// Smallest schedulable session; below this no session is created
pub const MINIMUM_SESSION_MINUTES: u32 = 25;

/// A topic eligible for allocation today, with its day-specific score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub topic_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub topic_name: String,

    /// Effort still outstanding; decremented by each allocation
    pub remaining_minutes: u32,

    /// Precomputed day-specific score; fixed for the duration of one day
    pub effective_priority: f64,

    /// Days until the subject's nearest exam at scoring time
    pub days_until_exam: Option<i64>,
}

impl Candidate {
    fn session(&self, duration_minutes: u32, date: NaiveDate) -> PlannedSession {
        PlannedSession {
            topic_id: self.topic_id,
            subject_id: self.subject_id,
            subject_name: self.subject_name.clone(),
            topic_name: self.topic_name.clone(),
            duration_minutes,
            plan_date: date,
            days_until_exam: self.days_until_exam,
        }
    }
}

/// The outcome of allocating one day.
#[derive(Debug, Clone)]
pub struct DayAllocation {
    /// Sessions in allocation order
    pub sessions: Vec<PlannedSession>,

    /// Candidates with their remaining effort decremented
    pub candidates: Vec<Candidate>,

    /// Budget minutes left unallocated
    pub minutes_left: u32,
}

/// Sort candidates by effective priority descending.
///
/// Ties are broken by ascending topic id so allocation order is fully
/// deterministic regardless of input order.
fn sort_by_priority(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.effective_priority
            .total_cmp(&a.effective_priority)
            .then(a.topic_id.cmp(&b.topic_id))
    });
}

/// Phase 1: drain whole preferred blocks in priority order.
///
/// Visits each candidate once, highest priority first, and allocates
/// 50-minute blocks while both the budget and the candidate's remaining
/// effort can take a whole block. One topic is fully drained of whole blocks
/// before the next is considered; this is deliberately not round-robin.
///
/// Returns the sessions emitted and the budget left.
pub fn drain_preferred_blocks(
    candidates: &mut Vec<Candidate>,
    budget: u32,
    date: NaiveDate,
) -> (Vec<PlannedSession>, u32) {
    sort_by_priority(candidates);

    let mut sessions = Vec::new();
    let mut minutes_left = budget;

    for cand in candidates.iter_mut() {
        while minutes_left >= PREFERRED_SESSION_MINUTES
            && cand.remaining_minutes >= PREFERRED_SESSION_MINUTES
        {
            sessions.push(cand.session(PREFERRED_SESSION_MINUTES, date));
            cand.remaining_minutes -= PREFERRED_SESSION_MINUTES;
            minutes_left -= PREFERRED_SESSION_MINUTES;
        }
    }

    (sessions, minutes_left)
}

/// Phase 2: fill the remaining budget with sessions of at least the minimum.
///
/// Repeatedly picks the highest-priority candidate with at least 25 minutes
/// outstanding and allocates `min(remaining, 50, budget_left)`. A would-be
/// allocation below the minimum terminates the pass; no sub-minimum session
/// is ever created. Unlike Phase 1 this re-scans the priority order after
/// every single allocation, so it can still emit full 50-minute sessions.
pub fn fill_remainder(
    candidates: &mut Vec<Candidate>,
    budget: u32,
    date: NaiveDate,
) -> (Vec<PlannedSession>, u32) {
    sort_by_priority(candidates);

    let mut sessions = Vec::new();
    let mut minutes_left = budget;

    while minutes_left >= MINIMUM_SESSION_MINUTES {
        let Some(chosen) = candidates
            .iter_mut()
            .find(|c| c.remaining_minutes >= MINIMUM_SESSION_MINUTES)
        else {
            break;
        };

        let alloc = chosen
            .remaining_minutes
            .min(PREFERRED_SESSION_MINUTES)
            .min(minutes_left);
        if alloc < MINIMUM_SESSION_MINUTES {
            break;
        }

        sessions.push(chosen.session(alloc, date));
        chosen.remaining_minutes -= alloc;
        minutes_left -= alloc;
    }

    (sessions, minutes_left)
}

/// Allocate one day: Phase 1 then Phase 2 against the same candidate set.
///
/// A configured budget below the minimum session size is floored to the
/// minimum so at least one allocation attempt is possible. An empty result
/// is a valid outcome, not an error.
pub fn allocate_day(
    mut candidates: Vec<Candidate>,
    budget: u32,
    date: NaiveDate,
) -> DayAllocation {
    let budget = budget.max(MINIMUM_SESSION_MINUTES);

    let (mut sessions, minutes_left) = drain_preferred_blocks(&mut candidates, budget, date);
    let (tail, minutes_left) = fill_remainder(&mut candidates, minutes_left, date);
    sessions.extend(tail);

    DayAllocation {
        sessions,
        candidates,
        minutes_left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn cand(topic_id: i64, remaining: u32, priority: f64) -> Candidate {
        Candidate {
            topic_id,
            subject_id: 1,
            subject_name: "Maths".to_string(),
            topic_name: format!("topic-{topic_id}"),
            remaining_minutes: remaining,
            effective_priority: priority,
            days_until_exam: None,
        }
    }

    #[test]
    fn test_phase1_drains_one_topic_before_next() {
        // Highest priority topic has two whole blocks; both must come out
        // before the lower-priority topic gets any.
        let mut cands = vec![cand(2, 100, 1.0), cand(1, 100, 5.0)];
        let (sessions, left) = drain_preferred_blocks(&mut cands, 150, date());

        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].topic_id, 1);
        assert_eq!(sessions[1].topic_id, 1);
        assert_eq!(sessions[2].topic_id, 2);
        assert!(sessions.iter().all(|s| s.duration_minutes == 50));
        assert_eq!(left, 0);
    }

    #[test]
    fn test_phase1_skips_topics_below_preferred() {
        let mut cands = vec![cand(1, 40, 5.0), cand(2, 60, 1.0)];
        let (sessions, left) = drain_preferred_blocks(&mut cands, 120, date());

        // Topic 1 can't take a whole block; topic 2 takes exactly one.
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].topic_id, 2);
        assert_eq!(left, 70);
    }

    #[test]
    fn test_phase1_respects_budget() {
        let mut cands = vec![cand(1, 500, 5.0)];
        let (sessions, left) = drain_preferred_blocks(&mut cands, 120, date());

        assert_eq!(sessions.len(), 2);
        assert_eq!(left, 20);
        assert_eq!(cands[0].remaining_minutes, 400);
    }

    #[test]
    fn test_phase1_tie_broken_by_topic_id() {
        let mut cands = vec![cand(9, 50, 3.0), cand(4, 50, 3.0)];
        let (sessions, _) = drain_preferred_blocks(&mut cands, 100, date());

        assert_eq!(sessions[0].topic_id, 4);
        assert_eq!(sessions[1].topic_id, 9);
    }

    #[test]
    fn test_phase2_allocates_partial_session() {
        let mut cands = vec![cand(1, 40, 5.0)];
        let (sessions, left) = fill_remainder(&mut cands, 120, date());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_minutes, 40);
        assert_eq!(left, 80);
        // 0 left on the candidate, nothing more to schedule
        assert_eq!(cands[0].remaining_minutes, 0);
    }

    #[test]
    fn test_phase2_can_emit_full_sessions() {
        // Exactly 50 remaining with ample budget comes out as one 50-minute
        // session even in the remainder pass.
        let mut cands = vec![cand(1, 50, 5.0)];
        let (sessions, left) = fill_remainder(&mut cands, 120, date());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_minutes, 50);
        assert_eq!(left, 70);
    }

    #[test]
    fn test_phase2_terminates_on_sub_minimum_allocation() {
        // Budget leaves only 20 minutes after the first session; the run
        // stops rather than emit a sub-minimum session.
        let mut cands = vec![cand(1, 50, 5.0), cand(2, 50, 4.0)];
        let (sessions, left) = fill_remainder(&mut cands, 70, date());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].topic_id, 1);
        assert_eq!(sessions[0].duration_minutes, 50);
        assert_eq!(left, 20);
    }

    #[test]
    fn test_phase2_skips_stranded_remainders() {
        // 10 minutes remaining is below the minimum; never scheduled.
        let mut cands = vec![cand(1, 10, 5.0), cand(2, 30, 1.0)];
        let (sessions, _) = fill_remainder(&mut cands, 120, date());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].topic_id, 2);
        assert_eq!(cands.iter().find(|c| c.topic_id == 1).unwrap().remaining_minutes, 10);
    }

    #[test]
    fn test_phase2_rescans_after_each_allocation() {
        // Highest-priority topic is consumed first, then the scan falls
        // through to the next topic.
        let mut cands = vec![cand(2, 30, 1.0), cand(1, 30, 5.0)];
        let (sessions, left) = fill_remainder(&mut cands, 120, date());

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].topic_id, 1);
        assert_eq!(sessions[0].duration_minutes, 30);
        assert_eq!(sessions[1].topic_id, 2);
        assert_eq!(left, 60);
    }

    #[test]
    fn test_allocate_day_scenario_one_topic_60_minutes() {
        // 60 minutes required, 120 budget: one 50-minute block in Phase 1,
        // then the 10-minute remainder is below the minimum and is stranded.
        let alloc = allocate_day(vec![cand(1, 60, 3.0)], 120, date());

        assert_eq!(alloc.sessions.len(), 1);
        assert_eq!(alloc.sessions[0].duration_minutes, 50);
        assert_eq!(alloc.minutes_left, 70);
        assert_eq!(alloc.candidates[0].remaining_minutes, 10);
    }

    #[test]
    fn test_allocate_day_floors_tiny_budget() {
        // A 10-minute configured budget is floored to 25 so one minimum
        // session can still be attempted.
        let alloc = allocate_day(vec![cand(1, 100, 3.0)], 10, date());

        assert_eq!(alloc.sessions.len(), 1);
        assert_eq!(alloc.sessions[0].duration_minutes, 25);
        assert_eq!(alloc.minutes_left, 0);
    }

    #[test]
    fn test_allocate_day_empty_candidates() {
        let alloc = allocate_day(Vec::new(), 120, date());
        assert!(alloc.sessions.is_empty());
        assert_eq!(alloc.minutes_left, 120);
    }

    #[test]
    fn test_allocate_day_never_over_allocates() {
        let cands = vec![cand(1, 75, 5.0), cand(2, 75, 4.0)];
        let alloc = allocate_day(cands, 300, date());

        let per_topic =
            |id: i64| -> u32 {
                alloc
                    .sessions
                    .iter()
                    .filter(|s| s.topic_id == id)
                    .map(|s| s.duration_minutes)
                    .sum()
            };
        assert!(per_topic(1) <= 75);
        assert!(per_topic(2) <= 75);
        let total: u32 = alloc.sessions.iter().map(|s| s.duration_minutes).sum();
        assert_eq!(total + alloc.minutes_left, 300);
    }

    #[test]
    fn test_allocate_day_all_sessions_within_bounds() {
        let cands = vec![cand(1, 130, 5.0), cand(2, 95, 4.0), cand(3, 27, 3.0)];
        let alloc = allocate_day(cands, 240, date());

        assert!(!alloc.sessions.is_empty());
        for s in &alloc.sessions {
            assert!(s.duration_minutes >= MINIMUM_SESSION_MINUTES);
            assert!(s.duration_minutes <= PREFERRED_SESSION_MINUTES);
        }
    }
}
