//! Weekly planning integration tests
//!
//! Exercises the full run against a real SQLite store: seeding, scoring,
//! allocation, persistence, and completed-work carry-over between runs.

use chrono::{Duration, NaiveDate, NaiveTime};
use plannr::allocator::{MINIMUM_SESSION_MINUTES, PREFERRED_SESSION_MINUTES};
use plannr::scheduler::{NOTE_ALL_COMPLETED, WeeklyScheduler};
use plannr::store::{PlannerStore, SqliteStore};
use tempfile::TempDir;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

struct Fixture {
    _temp_dir: TempDir,
    store: SqliteStore,
    user_id: i64,
}

fn fixture() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp_dir.path().join("plannr.db")).unwrap();
    let user_id = store.create_user("ada").unwrap();
    Fixture {
        _temp_dir: temp_dir,
        store,
        user_id,
    }
}

/// Integration test: a full week over several topics respects every session
/// and budget bound.
#[test]
fn test_week_plan_respects_bounds() {
    let mut fx = fixture();
    let maths = fx.store.create_subject(fx.user_id, "Maths").unwrap();
    let physics = fx.store.create_subject(fx.user_id, "Physics").unwrap();
    fx.store.create_topic(maths, "Integration", 4, 5, 2, 3.0).unwrap();
    fx.store.create_topic(maths, "Series", 3, 3, 4, 1.5).unwrap();
    fx.store.create_topic(physics, "Waves", 5, 4, 1, 2.0).unwrap();
    fx.store.create_exam(maths, start() + Duration::days(6)).unwrap();

    let plan = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), false)
        .unwrap();

    assert_eq!(plan.days.len(), 7);
    for day in &plan.days {
        assert!(day.allocated_minutes() <= day.budget_minutes);
        for session in &day.sessions {
            assert!(session.duration_minutes >= MINIMUM_SESSION_MINUTES);
            assert!(session.duration_minutes <= PREFERRED_SESSION_MINUTES);
        }
    }

    // No topic is allocated more than its required effort (3h + 1.5h + 2h).
    assert!(plan.total_allocated_minutes() <= 390);
}

/// Integration test: exam urgency pulls the exam subject's topics to the
/// front of the week.
#[test]
fn test_exam_subject_scheduled_first() {
    let mut fx = fixture();
    let maths = fx.store.create_subject(fx.user_id, "Maths").unwrap();
    let history = fx.store.create_subject(fx.user_id, "History").unwrap();
    // Identical ratings; only the exam differs.
    fx.store.create_topic(maths, "Integration", 3, 3, 3, 2.0).unwrap();
    fx.store.create_topic(history, "Revolutions", 3, 3, 3, 2.0).unwrap();
    fx.store.create_exam(maths, start() + Duration::days(3)).unwrap();

    fx.store.set_daily_hours(fx.user_id, 50.0 / 60.0).unwrap();

    let plan = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), false)
        .unwrap();

    let first = &plan.days[0].sessions[0];
    assert_eq!(first.subject_name, "Maths");
    assert_eq!(first.days_until_exam, Some(3));
}

/// Integration test: persisted sessions carry sequential start times from
/// 08:00 with ten-minute breaks, all pending.
#[test]
fn test_persisted_session_layout() {
    let mut fx = fixture();
    let maths = fx.store.create_subject(fx.user_id, "Maths").unwrap();
    fx.store.create_topic(maths, "Integration", 4, 4, 2, 2.0).unwrap();

    let plan = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), true)
        .unwrap();
    assert!(plan.persisted);

    let sessions = fx.store.list_sessions(fx.user_id).unwrap();
    // 120 minutes of effort against a 120-minute default budget: two
    // 50-minute blocks on day one, the 20-minute remainder stranded.
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].scheduled_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(sessions[1].scheduled_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert!(sessions
        .iter()
        .all(|s| s.status == plannr::domain::SessionStatus::Pending));
}

/// Integration test: completing persisted sessions shrinks the next run.
#[test]
fn test_completed_work_carries_into_next_run() {
    let mut fx = fixture();
    let maths = fx.store.create_subject(fx.user_id, "Maths").unwrap();
    fx.store.create_topic(maths, "Integration", 4, 4, 2, 2.0).unwrap();

    let first_run = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), true)
        .unwrap();
    assert_eq!(first_run.total_allocated_minutes(), 100);

    // Complete everything that was scheduled.
    let sessions = fx.store.list_sessions(fx.user_id).unwrap();
    for s in &sessions {
        fx.store.complete_session(s.session_id).unwrap();
    }

    // 100 of 120 minutes done; the next run only schedules the rest... which
    // is 20 minutes, below the minimum, so nothing is scheduled at all.
    let second_run = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start() + Duration::days(7)), false)
        .unwrap();
    assert_eq!(second_run.total_allocated_minutes(), 0);
}

/// Integration test: a fully-completed backlog yields the noted empty week.
#[test]
fn test_fully_completed_backlog() {
    let mut fx = fixture();
    let maths = fx.store.create_subject(fx.user_id, "Maths").unwrap();
    fx.store.create_topic(maths, "Integration", 4, 4, 2, 1.0).unwrap();

    let plan = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), true)
        .unwrap();
    for s in fx.store.list_sessions(fx.user_id).unwrap() {
        fx.store.complete_session(s.session_id).unwrap();
    }

    // 50 of 60 minutes done leaves a stranded remainder; mark the rest done
    // by completing a manually persisted catch-up session.
    assert_eq!(plan.total_allocated_minutes(), 50);
    fx.store
        .persist_sessions(
            fx.user_id,
            &[plannr::domain::SessionRecord {
                topic_id: fx.store.get_active_topics(fx.user_id).unwrap()[0].topic_id,
                scheduled_date: start(),
                scheduled_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                duration_minutes: 10,
                status: plannr::domain::SessionStatus::Pending,
            }],
        )
        .unwrap();
    let last = fx.store.list_sessions(fx.user_id).unwrap();
    fx.store
        .complete_session(last.last().unwrap().session_id)
        .unwrap();

    let plan = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), false)
        .unwrap();
    assert_eq!(plan.days.len(), 7);
    for day in &plan.days {
        assert!(day.sessions.is_empty());
        assert_eq!(day.note.as_deref(), Some(NOTE_ALL_COMPLETED));
    }
}

/// Integration test: cross-day carry-over inside one run never re-schedules
/// drained effort.
#[test]
fn test_cross_day_carry_over() {
    let mut fx = fixture();
    let maths = fx.store.create_subject(fx.user_id, "Maths").unwrap();
    let topic_id = fx.store.create_topic(maths, "Integration", 4, 4, 2, 5.0).unwrap();

    let plan = WeeklyScheduler::new(&mut fx.store)
        .plan_week(fx.user_id, Some(start()), false)
        .unwrap();

    // 300 minutes of effort at 100 allocatable minutes/day: exactly three
    // days of work, then empty days.
    let per_day: Vec<u32> = plan.days.iter().map(|d| d.allocated_minutes()).collect();
    assert_eq!(per_day[0], 100);
    assert_eq!(per_day[1], 100);
    assert_eq!(per_day[2], 100);
    assert!(per_day[3..].iter().all(|m| *m == 0));

    let total: u32 = plan
        .days
        .iter()
        .flat_map(|d| &d.sessions)
        .filter(|s| s.topic_id == topic_id)
        .map(|s| s.duration_minutes)
        .sum();
    assert_eq!(total, 300);
}
