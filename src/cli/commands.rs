//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - week/today: generate a plan for the next 7 days or a single day
//! - sessions/complete: inspect and complete persisted sessions
//! - add/set-hours: ingest users, subjects, topics, exams, preferences

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plannr - a study-time allocation planner
#[derive(Parser, Debug)]
#[command(name = "plannr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a seven-day study plan
    Week {
        /// Username to plan for
        #[arg(short, long)]
        user: String,

        /// Start date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        start: Option<String>,

        /// Write the plan's sessions to storage as pending
        #[arg(short, long)]
        persist: bool,
    },

    /// Generate a plan for a single day
    Today {
        /// Username to plan for
        #[arg(short, long)]
        user: String,

        /// Plan date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Write the plan's sessions to storage as pending
        #[arg(short, long)]
        persist: bool,
    },

    /// List a user's persisted sessions
    Sessions {
        /// Username to list sessions for
        #[arg(short, long)]
        user: String,
    },

    /// Mark a persisted session as completed
    Complete {
        /// Session ID to complete
        session_id: i64,
    },

    /// Add users, subjects, topics, or exams
    Add {
        #[command(subcommand)]
        command: AddCommands,
    },

    /// Set a user's daily study hours preference
    SetHours {
        /// Username to update
        #[arg(short, long)]
        user: String,

        /// Daily study hours
        hours: f64,
    },
}

/// Ingestion subcommands
#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Create a user
    User {
        /// Username
        username: String,
    },

    /// Create a subject owned by a user
    Subject {
        /// Owning username
        #[arg(short, long)]
        user: String,

        /// Subject name
        name: String,
    },

    /// Create a topic under a subject
    Topic {
        /// Subject ID the topic belongs to
        #[arg(short, long)]
        subject: i64,

        /// Topic name
        name: String,

        /// Difficulty rating, expected 1-5
        #[arg(short, long)]
        difficulty: u8,

        /// Importance rating, expected 1-5
        #[arg(short, long)]
        importance: u8,

        /// Self-rated confidence, expected 1-5
        #[arg(short = 'C', long)]
        confidence: u8,

        /// Required effort in hours
        #[arg(short = 'H', long)]
        hours: f64,
    },

    /// Record an exam date for a subject
    Exam {
        /// Subject ID the exam belongs to
        #[arg(short, long)]
        subject: i64,

        /// Exam date (YYYY-MM-DD)
        date: String,
    },
}
