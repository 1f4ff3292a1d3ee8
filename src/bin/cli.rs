//! jsontable CLI
//!
//! Runs a single table operation against a data directory and prints the
//! result as JSON.

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use jsontable::{Command, Config, LockWait, Record, Response, TableError, TableRegistry};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// jsontable CLI
#[derive(Parser, Debug)]
#[command(name = "jsontable-cli")]
#[command(about = "CLI for the jsontable file-backed record store")]
#[command(version)]
struct Args {
    /// Data directory (one file per table)
    #[arg(short, long, default_value = ".")]
    data_dir: String,

    /// Table file extension
    #[arg(short, long, default_value = ".json")]
    extension: String,

    /// Create missing tables on first access
    #[arg(short, long)]
    create: bool,

    /// Give up waiting for a table lock after this many milliseconds
    #[arg(short, long)]
    lock_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select records whose field loosely equals a value
    Select {
        table: String,
        key: String,
        /// JSON value, or a plain string
        value: String,
    },

    /// Print every record
    SelectAll { table: String },

    /// Append a record (JSON object)
    Insert { table: String, record: String },

    /// Replace the first matching record (JSON object)
    Update {
        table: String,
        key: String,
        value: String,
        record: String,
    },

    /// Replace the whole table (JSON array of objects)
    UpdateAll { table: String, records: String },

    /// Delete every matching record
    Delete {
        table: String,
        key: String,
        value: String,
    },

    /// Delete every record
    DeleteAll { table: String },

    /// Create an empty table
    CreateTable { table: String },

    /// Run a command given as JSON, e.g. '{"op":"select_all"}'
    Exec { table: String, command: String },
}

impl Commands {
    /// Split into table name and typed command
    fn into_command(self) -> jsontable::Result<(String, Command)> {
        let parsed = match self {
            Commands::Select { table, key, value } => (
                table,
                Command::Select {
                    key,
                    value: parse_value(&value),
                },
            ),
            Commands::SelectAll { table } => (table, Command::SelectAll),
            Commands::Insert { table, record } => (
                table,
                Command::Insert {
                    record: parse_json::<Record>(&record)?,
                },
            ),
            Commands::Update {
                table,
                key,
                value,
                record,
            } => (
                table,
                Command::Update {
                    key,
                    value: parse_value(&value),
                    record: parse_json::<Record>(&record)?,
                },
            ),
            Commands::UpdateAll { table, records } => (
                table,
                Command::UpdateAll {
                    records: parse_json::<Vec<Record>>(&records)?,
                },
            ),
            Commands::Delete { table, key, value } => (
                table,
                Command::Delete {
                    key,
                    value: parse_value(&value),
                },
            ),
            Commands::DeleteAll { table } => (table, Command::DeleteAll),
            Commands::CreateTable { table } => (table, Command::CreateTable),
            Commands::Exec { table, command } => (table, parse_json::<Command>(&command)?),
        };
        Ok(parsed)
    }
}

/// Operand values: JSON if it parses, otherwise the raw string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> jsontable::Result<T> {
    serde_json::from_str(raw).map_err(|e| TableError::Serialization(e.to_string()))
}

fn run(args: Args) -> jsontable::Result<Response> {
    let lock_wait = match args.lock_timeout_ms {
        Some(ms) => LockWait::timeout(Duration::from_millis(ms)),
        None => LockWait::Blocking,
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .extension(&args.extension)
        .create_if_missing(args.create)
        .lock_wait(lock_wait)
        .build();

    let (table, command) = args.command.into_command()?;

    let registry = TableRegistry::open(config)?;
    let response = registry.execute(&table, command);

    // Persist before reporting, even if the command failed
    let closed = registry.close();
    let response = response?;
    closed?;

    Ok(response)
}

fn main() {
    // Logs go to stderr so stdout stays valid JSON
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,jsontable=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("jsontable CLI v{}", jsontable::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir);

    match run(args) {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                tracing::error!("Failed to encode result: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    }
}
