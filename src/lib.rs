//! Plannr - a study-time allocation planner
//!
//! Plannr turns a backlog of study topics (difficulty, importance,
//! self-rated confidence, required effort) and a calendar of upcoming exams
//! into a week of bounded study sessions, packed greedily into a fixed daily
//! minute budget with exam urgency pulling work earlier.

pub mod allocator;
pub mod config;
pub mod domain;
pub mod error;
pub mod scheduler;
pub mod scoring;
pub mod store;

pub use error::{PlannrError, Result};
