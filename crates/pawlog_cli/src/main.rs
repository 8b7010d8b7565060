//! Operator CLI over a pawlog snapshot database.
//!
//! # Responsibility
//! - Map command-line flags onto `pawlog_core` configuration (database
//!   path, logging level and directory).
//! - Drive `TrackerService` operations and print results as JSON or text.
//!
//! # Invariants
//! - Every mutation goes through `TrackerService`; the CLI never writes the
//!   snapshot table directly.
//! - Persist failures are printed as warnings and do not change the exit
//!   status; validation and storage-open failures do.
//! - Deleting an unknown id succeeds without writing.

use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use log::info;
use pawlog_core::db::open_db;
use pawlog_core::{
    default_log_level, init_logging, Category, CategoryFilter, Coordinate, EntryId,
    FilterCriteria, PersistOutcome, RecordEntryRequest, Size, Smell, SqliteSnapshotRepository,
    StoolColor, TrackerService,
};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

/// pawlog - dog health event log
#[derive(Parser)]
#[command(name = "pawlog")]
#[command(about = "Record and review a dog's bathroom events")]
#[command(version)]
struct Cli {
    /// SQLite database holding the snapshot
    #[arg(long, value_name = "PATH", default_value = "pawlog.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print core linkage and version
    Ping,
    /// Record a new event
    Add(AddArgs),
    /// Delete one event by id
    Delete {
        id: i64,
    },
    /// Delete every event
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List events matching the filter
    Entries(FilterArgs),
    /// Counters, daily histogram and food correlation
    Dashboard(FilterArgs),
    /// Upcoming care reminders
    Reminders,
    /// Printable health report
    Report {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
    /// healthy|soft|diarrhea|hard|blood|mucus
    #[arg(long, value_parser = parse_category)]
    category: Category,
    #[arg(long, value_parser = parse_size)]
    size: Option<Size>,
    #[arg(long, value_parser = parse_color)]
    color: Option<StoolColor>,
    #[arg(long, value_parser = parse_smell)]
    smell: Option<Smell>,
    #[arg(long)]
    food: Option<String>,
    #[arg(long)]
    hours_since_meal: Option<f64>,
    #[arg(long)]
    notes: Option<String>,
    /// Keep the note in the saved-notes list
    #[arg(long)]
    save_note: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// all|today|yesterday|week|month
    #[arg(long, default_value = "all")]
    period: String,
    /// all or a category key
    #[arg(long, default_value = "all")]
    category: String,
    /// all or an exact food value
    #[arg(long, default_value = "all")]
    food: String,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        let criteria = FilterCriteria::from_keys(&self.period, &self.category, &self.food);
        if let CategoryFilter::Unmatched(key) = &criteria.category {
            eprintln!("warning: unknown category `{key}`; no entry will match");
        }
        criteria
    }
}

#[derive(Debug)]
enum CliError {
    Storage(String),
    Invalid(String),
    Output(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(message) => write!(f, "storage error: {message}"),
            Self::Invalid(message) => write!(f, "{message}"),
            Self::Output(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) {
    let Some(log_dir) = cli.log_dir.as_deref() else {
        return;
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Ping = cli.command {
        println!("pawlog_core ping={}", pawlog_core::ping());
        println!("pawlog_core version={}", pawlog_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db).map_err(|err| CliError::Storage(err.to_string()))?;
    let repo =
        SqliteSnapshotRepository::try_new(&conn).map_err(|err| CliError::Storage(err.to_string()))?;
    let (mut service, issues) = TrackerService::open(repo);
    for issue in &issues {
        eprintln!("warning: {issue}");
    }
    info!(
        "event=cli_command module=cli status=start entries={}",
        service.entries().len()
    );

    match cli.command {
        Command::Ping => {}
        Command::Add(args) => {
            let request = RecordEntryRequest {
                requested: Coordinate::new(args.lat, args.lng),
                category: Some(args.category),
                size: args.size,
                color: args.color,
                smell: args.smell,
                food: args.food,
                hours_since_meal: args.hours_since_meal,
                notes: args.notes,
                save_note: args.save_note,
            };
            let recorded = service
                .record_entry(request, Utc::now())
                .map_err(|err| CliError::Invalid(err.to_string()))?;
            report_persist(&recorded.persist);
            print_json(&recorded.entry)?;
        }
        Command::Delete { id } => match service.delete_entry(EntryId(id)) {
            Some(outcome) => {
                report_persist(&outcome);
                println!("deleted {id}");
            }
            None => println!("no entry with id {id}"),
        },
        Command::Clear { yes } => {
            if !yes {
                return Err(CliError::Invalid(
                    "refusing to delete every entry without --yes".to_string(),
                ));
            }
            match service.clear_entries() {
                Some(outcome) => {
                    report_persist(&outcome);
                    println!("cleared");
                }
                None => println!("nothing to clear"),
            }
        }
        Command::Entries(filter) => {
            print_json(&service.filtered(&filter.criteria(), &Local::now()))?;
        }
        Command::Dashboard(filter) => {
            print_json(&service.dashboard(&filter.criteria(), &Local::now()))?;
        }
        Command::Reminders => {
            print_json(&service.reminders(Local::now().date_naive()))?;
        }
        Command::Report { json } => {
            let report = service
                .report(Local::now().date_naive())
                .map_err(|err| CliError::Invalid(err.to_string()))?;
            if json {
                print_json(&report)?;
            } else {
                print!("{report}");
            }
        }
    }
    Ok(())
}

fn report_persist(outcome: &PersistOutcome) {
    if let Some(message) = outcome.warning() {
        eprintln!("warning: changes kept in memory only: {message}");
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::parse(value).ok_or_else(|| format!("unknown category `{value}`"))
}

fn parse_size(value: &str) -> Result<Size, String> {
    Size::parse(value).ok_or_else(|| format!("unknown size `{value}`"))
}

fn parse_color(value: &str) -> Result<StoolColor, String> {
    StoolColor::parse(value).ok_or_else(|| format!("unknown color `{value}`"))
}

fn parse_smell(value: &str) -> Result<Smell, String> {
    Smell::parse(value).ok_or_else(|| format!("unknown smell `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command};
    use chrono::Utc;
    use clap::{CommandFactory, Parser};
    use pawlog_core::db::open_db;
    use pawlog_core::{
        Category, Coordinate, RecordEntryRequest, SqliteSnapshotRepository, TrackerService,
    };

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_category_and_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "pawlog", "--db", "/tmp/p.db", "add", "--lat", "-33.9", "--lng", "18.4",
            "--category", "diarrhea",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.category, Category::Diarrhea);
                assert_eq!(args.lat, -33.9);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn unknown_category_is_rejected_at_parse_time() {
        let parsed = Cli::try_parse_from([
            "pawlog", "add", "--lat", "1", "--lng", "2", "--category", "purple",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn deleting_same_id_twice_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("pawlog.db");
        let db_arg = db.to_str().unwrap().to_string();

        let id = {
            let conn = open_db(&db).unwrap();
            let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
            let (mut service, _) = TrackerService::open(repo);
            let request =
                RecordEntryRequest::new(Coordinate::new(45.0, 9.0), Some(Category::Healthy));
            service.record_entry(request, Utc::now()).unwrap().entry.id
        };

        let id_arg = id.to_string();
        for _ in 0..2 {
            let cli = Cli::try_parse_from([
                "pawlog",
                "--db",
                db_arg.as_str(),
                "delete",
                id_arg.as_str(),
            ])
            .unwrap();
            assert!(run(cli).is_ok());
        }

        let conn = open_db(&db).unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        let (service, _) = TrackerService::open(repo);
        assert!(service.entries().is_empty());
    }
}
