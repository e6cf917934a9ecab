use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::Cli;
use cli::commands::{AddCommands, Commands};
use plannr::config::Config;
use plannr::domain::WeekPlan;
use plannr::scheduler::WeeklyScheduler;
use plannr::store::SqliteStore;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plannr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("plannr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Week {
            user,
            start,
            persist,
        } => handle_plan_command(user, start.as_deref(), *persist, true, config),
        Commands::Today {
            user,
            date,
            persist,
        } => handle_plan_command(user, date.as_deref(), *persist, false, config),
        Commands::Sessions { user } => handle_sessions_command(user, config),
        Commands::Complete { session_id } => handle_complete_command(*session_id, config),
        Commands::Add { command } => handle_add_command(command, config),
        Commands::SetHours { user, hours } => handle_set_hours_command(user, *hours, config),
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    SqliteStore::open(&config.storage.db_path).with_context(|| {
        format!(
            "Failed to open store at {}",
            config.storage.db_path.display()
        )
    })
}

fn resolve_user(store: &SqliteStore, username: &str) -> Result<i64> {
    store
        .find_user(username)?
        .ok_or_else(|| eyre!("Unknown user: {}", username))
}

fn parse_date_arg(arg: Option<&str>) -> Result<Option<NaiveDate>> {
    match arg {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", s)),
    }
}

fn handle_plan_command(
    username: &str,
    start: Option<&str>,
    persist: bool,
    full_week: bool,
    config: &Config,
) -> Result<()> {
    info!(
        "Planning for user {} (week: {}, persist: {})",
        username, full_week, persist
    );

    let mut store = open_store(config)?;
    let user_id = resolve_user(&store, username)?;
    let start = parse_date_arg(start)?;

    let mut scheduler = WeeklyScheduler::with_params(&mut store, config.scheduling.params());
    let plan = if full_week {
        scheduler.plan_week(user_id, start, persist)?
    } else {
        scheduler.plan_today(user_id, start, persist)?
    };

    print_plan(&plan);

    if persist {
        if plan.persisted {
            println!("{}", "Sessions saved as pending.".green());
        } else {
            println!("{}", "Warning: sessions were NOT saved.".red());
        }
    }
    Ok(())
}

fn print_plan(plan: &WeekPlan) {
    for day in &plan.days {
        println!(
            "{}  {}",
            day.date.format("%a %Y-%m-%d").to_string().cyan().bold(),
            format!(
                "budget {}min, leftover {}min",
                day.budget_minutes, day.minutes_left
            )
            .dimmed()
        );

        for session in &day.sessions {
            let exam = match session.days_until_exam {
                Some(days) if days >= 0 => format!(" (exam in {}d)", days).red().to_string(),
                _ => String::new(),
            };
            println!(
                "  {:>3}min  {} / {}{}",
                session.duration_minutes,
                session.subject_name.green(),
                session.topic_name,
                exam
            );
        }

        if let Some(note) = &day.note {
            println!("  {}", note.yellow());
        }
    }

    println!(
        "{}",
        format!(
            "Total: {} session(s), {} minute(s)",
            plan.session_count(),
            plan.total_allocated_minutes()
        )
        .bold()
    );
}

fn handle_sessions_command(username: &str, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let user_id = resolve_user(&store, username)?;

    let sessions = store.list_sessions(user_id)?;
    if sessions.is_empty() {
        println!("{}", "No sessions recorded.".yellow());
        return Ok(());
    }

    for s in &sessions {
        let status = match s.status {
            plannr::domain::SessionStatus::Completed => s.status.as_str().green(),
            plannr::domain::SessionStatus::Pending => s.status.as_str().yellow(),
        };
        println!(
            "{:>5}  {} {}  {:>3}min  {}  [{}]",
            s.session_id,
            s.scheduled_date,
            s.scheduled_time.format("%H:%M"),
            s.duration_minutes,
            s.topic_name,
            status
        );
    }
    Ok(())
}

fn handle_complete_command(session_id: i64, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    store.complete_session(session_id)?;
    println!("{} {}", "Completed session".green(), session_id);
    Ok(())
}

fn handle_add_command(command: &AddCommands, config: &Config) -> Result<()> {
    let store = open_store(config)?;

    match command {
        AddCommands::User { username } => {
            let user_id = store.create_user(username)?;
            println!("{} {} (id {})", "Added user".green(), username, user_id);
        }
        AddCommands::Subject { user, name } => {
            let user_id = resolve_user(&store, user)?;
            let subject_id = store.create_subject(user_id, name)?;
            println!("{} {} (id {})", "Added subject".green(), name, subject_id);
        }
        AddCommands::Topic {
            subject,
            name,
            difficulty,
            importance,
            confidence,
            hours,
        } => {
            let topic_id = store.create_topic(
                *subject,
                name,
                *difficulty,
                *importance,
                *confidence,
                *hours,
            )?;
            println!("{} {} (id {})", "Added topic".green(), name, topic_id);
        }
        AddCommands::Exam { subject, date } => {
            let exam_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", date))?;
            let exam_id = store.create_exam(*subject, exam_date)?;
            println!("{} {} (id {})", "Added exam".green(), exam_date, exam_id);
        }
    }
    Ok(())
}

fn handle_set_hours_command(username: &str, hours: f64, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let user_id = resolve_user(&store, username)?;
    store.set_daily_hours(user_id, hours)?;
    println!("{} {} -> {}h/day", "Updated".green(), username, hours);
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
