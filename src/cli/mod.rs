//! CLI module for plannr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for planning runs,
//! session management, and data ingestion.

pub mod commands;

pub use commands::Cli;
