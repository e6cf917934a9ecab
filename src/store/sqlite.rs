//! SQLite-backed implementation of the planner store.
//!
//! Owns the relational schema: users, per-user preferences, subjects, topics,
//! exams, and study sessions. Dates and times are stored as ISO-8601 text.

use crate::domain::{SessionRecord, SessionStatus, StoredSession, Topic};
use crate::error::{PlannrError, Result};
use crate::store::PlannerStore;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, params, params_from_iter};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";

/// SQLite store holding all durable planner state.
pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given database path.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let db = Connection::open(db_path)?;
        Self::init_schema(&db)?;
        Ok(Self { db })
    }

    /// Open an in-memory store. Useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self { db })
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS user_preferences (
                user_id INTEGER PRIMARY KEY,
                daily_study_hours REAL
            );

            CREATE TABLE IF NOT EXISTS subjects (
                subject_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                subject_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS topics (
                topic_id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id INTEGER NOT NULL,
                topic_name TEXT NOT NULL,
                difficulty_level INTEGER NOT NULL,
                importance INTEGER NOT NULL,
                confidence_level INTEGER NOT NULL,
                hours_required REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS exams (
                exam_id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id INTEGER NOT NULL,
                exam_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS study_sessions (
                session_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                topic_id INTEGER NOT NULL,
                scheduled_date TEXT NOT NULL,
                scheduled_time TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                status TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_subjects_user ON subjects(user_id);
            CREATE INDEX IF NOT EXISTS idx_topics_subject ON topics(subject_id);
            CREATE INDEX IF NOT EXISTS idx_exams_subject_date ON exams(subject_id, exam_date);
            CREATE INDEX IF NOT EXISTS idx_sessions_topic_status ON study_sessions(topic_id, status);
            CREATE INDEX IF NOT EXISTS idx_sessions_user ON study_sessions(user_id);
            "#,
        )?;
        Ok(())
    }

    //=== Ingestion helpers (outside the scheduler's boundary) ===

    /// Create a user, returning its id.
    pub fn create_user(&self, username: &str) -> Result<i64> {
        self.db.execute(
            "INSERT INTO users (username) VALUES (?1)",
            params![username],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    /// Look a user up by username.
    pub fn find_user(&self, username: &str) -> Result<Option<i64>> {
        let mut stmt = self
            .db
            .prepare("SELECT user_id FROM users WHERE username = ?1")?;
        let mut rows = stmt.query(params![username])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set (or replace) the user's daily study hours preference.
    pub fn set_daily_hours(&self, user_id: i64, hours: f64) -> Result<()> {
        self.db.execute(
            "INSERT INTO user_preferences (user_id, daily_study_hours) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET daily_study_hours = excluded.daily_study_hours",
            params![user_id, hours],
        )?;
        Ok(())
    }

    /// Create a subject owned by a user, returning its id.
    pub fn create_subject(&self, user_id: i64, subject_name: &str) -> Result<i64> {
        self.db.execute(
            "INSERT INTO subjects (user_id, subject_name) VALUES (?1, ?2)",
            params![user_id, subject_name],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    /// Create a topic under a subject, returning its id.
    ///
    /// The 1-5 scales are not validated here; that precondition belongs to
    /// the caller.
    pub fn create_topic(
        &self,
        subject_id: i64,
        topic_name: &str,
        difficulty: u8,
        importance: u8,
        confidence: u8,
        hours_required: f64,
    ) -> Result<i64> {
        self.db.execute(
            "INSERT INTO topics
             (subject_id, topic_name, difficulty_level, importance, confidence_level, hours_required)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                subject_id,
                topic_name,
                difficulty,
                importance,
                confidence,
                hours_required
            ],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    /// Record an exam date for a subject, returning its id.
    pub fn create_exam(&self, subject_id: i64, exam_date: NaiveDate) -> Result<i64> {
        self.db.execute(
            "INSERT INTO exams (subject_id, exam_date) VALUES (?1, ?2)",
            params![subject_id, exam_date.format(DATE_FMT).to_string()],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    /// List a user's persisted sessions, chronologically.
    pub fn list_sessions(&self, user_id: i64) -> Result<Vec<StoredSession>> {
        let mut stmt = self.db.prepare(
            "SELECT ss.session_id, ss.topic_id, t.topic_name, ss.scheduled_date,
                    ss.scheduled_time, ss.duration_minutes, ss.status
             FROM study_sessions ss
             JOIN topics t ON ss.topic_id = t.topic_id
             WHERE ss.user_id = ?1
             ORDER BY ss.scheduled_date, ss.scheduled_time",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (session_id, topic_id, topic_name, date, time, duration_minutes, status) = row?;
            sessions.push(StoredSession {
                session_id,
                topic_id,
                topic_name,
                scheduled_date: parse_date(&date)?,
                scheduled_time: parse_time(&time)?,
                duration_minutes,
                status: parse_status(&status),
            });
        }
        Ok(sessions)
    }

    /// Mark a session completed; the next planning run subtracts its minutes
    /// from the topic's remaining effort.
    pub fn complete_session(&self, session_id: i64) -> Result<()> {
        let updated = self.db.execute(
            "UPDATE study_sessions SET status = 'completed' WHERE session_id = ?1",
            params![session_id],
        )?;
        if updated == 0 {
            return Err(PlannrError::SessionNotFound(session_id));
        }
        Ok(())
    }
}

impl PlannerStore for SqliteStore {
    fn get_daily_budget(&self, user_id: i64) -> Result<Option<f64>> {
        let mut stmt = self
            .db
            .prepare("SELECT daily_study_hours FROM user_preferences WHERE user_id = ?1")?;
        let mut rows = stmt.query(params![user_id])?;
        match rows.next()? {
            Some(row) => Ok(row.get::<_, Option<f64>>(0)?),
            None => Ok(None),
        }
    }

    fn get_upcoming_exams(
        &self,
        user_id: i64,
        on_or_after: NaiveDate,
    ) -> Result<HashMap<i64, NaiveDate>> {
        let mut stmt = self.db.prepare(
            "SELECT e.subject_id, MIN(e.exam_date)
             FROM exams e
             JOIN subjects s ON e.subject_id = s.subject_id
             WHERE s.user_id = ?1 AND e.exam_date >= ?2
             GROUP BY e.subject_id",
        )?;
        let rows = stmt.query_map(
            params![user_id, on_or_after.format(DATE_FMT).to_string()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut exams = HashMap::new();
        for row in rows {
            let (subject_id, date) = row?;
            exams.insert(subject_id, parse_date(&date)?);
        }
        Ok(exams)
    }

    fn get_active_topics(&self, user_id: i64) -> Result<Vec<Topic>> {
        let mut stmt = self.db.prepare(
            "SELECT t.topic_id, t.subject_id, s.subject_name, t.topic_name,
                    t.difficulty_level, t.importance, t.confidence_level, t.hours_required
             FROM topics t
             JOIN subjects s ON t.subject_id = s.subject_id
             WHERE s.user_id = ?1
             ORDER BY t.topic_id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Topic {
                topic_id: row.get(0)?,
                subject_id: row.get(1)?,
                subject_name: row.get(2)?,
                topic_name: row.get(3)?,
                difficulty: row.get(4)?,
                importance: row.get(5)?,
                confidence: row.get(6)?,
                hours_required: row.get(7)?,
            })
        })?;

        let mut topics = Vec::new();
        for row in rows {
            topics.push(row?);
        }
        Ok(topics)
    }

    fn get_completed_minutes(
        &self,
        user_id: i64,
        topic_ids: &[i64],
    ) -> Result<HashMap<i64, u32>> {
        if topic_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = topic_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT topic_id, COALESCE(SUM(duration_minutes), 0)
             FROM study_sessions
             WHERE user_id = ? AND status = 'completed' AND topic_id IN ({placeholders})
             GROUP BY topic_id"
        );

        let mut stmt = self.db.prepare(&sql)?;
        let mut bind: Vec<i64> = Vec::with_capacity(topic_ids.len() + 1);
        bind.push(user_id);
        bind.extend_from_slice(topic_ids);

        let rows = stmt.query_map(params_from_iter(bind.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut completed = HashMap::new();
        for row in rows {
            let (topic_id, minutes) = row?;
            completed.insert(topic_id, minutes);
        }
        Ok(completed)
    }

    fn persist_sessions(&mut self, user_id: i64, records: &[SessionRecord]) -> Result<()> {
        let tx = self.db.transaction()?;
        for record in records {
            tx.execute(
                "INSERT INTO study_sessions
                 (user_id, topic_id, scheduled_date, scheduled_time, duration_minutes, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user_id,
                    record.topic_id,
                    record.scheduled_date.format(DATE_FMT).to_string(),
                    record.scheduled_time.format(TIME_FMT).to_string(),
                    record.duration_minutes,
                    record.status.as_str(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| PlannrError::InvalidDate(format!("{s}: {e}")))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FMT)
        .map_err(|e| PlannrError::InvalidDate(format!("{s}: {e}")))
}

fn parse_status(s: &str) -> SessionStatus {
    match s {
        "completed" => SessionStatus::Completed,
        _ => SessionStatus::Pending,
    }
}
