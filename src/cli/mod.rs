//! Command-line surface: argument definitions, database loading and the
//! `list` / `show` commands
//!
//! Commands write to caller-supplied writers and judge dates against a
//! caller-supplied [`Clock`], so they run the same in tests and in `main`.

pub mod filter;
pub mod show;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cli::filter::{Implementation, Mode};
use crate::cli::show::Report;
use crate::config::{self, Config};
use crate::database::cache::{HttpCache, ResponseStore};
use crate::database::fetch::Fetcher;
use crate::database::{DataSource, VersionDatabase};
use crate::version::{Clock, Level, Version, VersionError};

/// Prefix of every error message printed by the binary
pub const PROGRAM: &str = "pyversion-info";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("'{0}' only applies to CPython versions")]
    CPythonOnly(Mode),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Errors caused by the user's request rather than by the environment
    pub fn is_user_error(&self) -> bool {
        matches!(self, CommandError::Version(_) | CommandError::CPythonOnly(_))
    }
}

#[derive(Debug, Parser)]
#[command(name = "pyversion-info")]
#[command(version, about = "Show details about Python versions")]
pub struct Cli {
    /// Fetch version information from the given database
    #[arg(short, long, value_name = "FILE|URL")]
    pub database: Option<String>,

    /// Do not read or write the HTTP cache
    #[arg(long)]
    pub no_cache: bool,

    /// Directory holding the HTTP cache
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List known versions at the given version level
    List(ListArgs),
    /// Show information about a Python version
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ImplementationArgs {
    /// Show information about CPython versions [default]
    #[arg(long, overrides_with = "pypy")]
    pub cpython: bool,

    /// Show information about PyPy versions
    #[arg(long, overrides_with = "cpython")]
    pub pypy: bool,
}

impl ImplementationArgs {
    pub fn implementation(&self) -> Implementation {
        if self.pypy {
            Implementation::PyPy
        } else {
            Implementation::CPython
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub implementation: ImplementationArgs,

    /// List all known versions
    #[arg(short, long, overrides_with_all = ["not_eol", "released", "supported"])]
    pub all: bool,

    /// List only versions that are not EOL (supported versions + unreleased versions)
    #[arg(short, long, overrides_with_all = ["all", "released", "supported"])]
    pub not_eol: bool,

    /// List only released versions [default]
    #[arg(short, long, overrides_with_all = ["all", "not_eol", "supported"])]
    pub released: bool,

    /// List only supported versions
    #[arg(short, long, overrides_with_all = ["all", "not_eol", "released"])]
    pub supported: bool,

    #[arg(
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(["major", "minor", "micro"])
            .try_map(|s| s.parse::<Level>())
    )]
    pub level: Level,
}

impl ListArgs {
    pub fn mode(&self) -> Mode {
        if self.all {
            Mode::All
        } else if self.not_eol {
            Mode::NotEol
        } else if self.supported {
            Mode::Supported
        } else {
            Mode::Released
        }
    }
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub implementation: ImplementationArgs,

    /// Output JSON
    #[arg(short = 'J', long)]
    pub json: bool,

    /// Which subversions to list
    #[arg(short = 'S', long, value_enum, default_value_t = Mode::Released)]
    pub subversions: Mode,

    pub version: String,
}

/// Load the database named on the command line, or the configured one
pub async fn load_database(cli: &Cli, config: &Config) -> anyhow::Result<VersionDatabase> {
    let source = DataSource::parse(cli.database.as_deref().unwrap_or(&config.database_url));
    debug!("Loading version database from {:?}", source);

    let store = match &source {
        DataSource::Url(_) if !cli.no_cache && config.cache.enabled => {
            let dir = cli.cache_dir.clone().unwrap_or_else(config::cache_dir);
            match HttpCache::new(&config::http_cache_path(&dir)) {
                Ok(cache) => Some(Box::new(cache) as Box<dyn ResponseStore>),
                Err(e) => {
                    warn!("HTTP cache unavailable, fetching without it: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    let fetcher = Fetcher::new(
        Duration::from_millis(config.http.timeout),
        Duration::from_secs(config.cache.default_max_age),
        store,
    )?;
    Ok(VersionDatabase::load(&source, &fetcher).await?)
}

fn list(
    args: &ListArgs,
    db: &VersionDatabase,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let info = args.implementation.implementation().select(db);
    for version in info.filter(args.mode(), info.versions_at(args.level), clock)? {
        writeln!(out, "{version}")?;
    }
    Ok(())
}

fn show(
    args: &ShowArgs,
    db: &VersionDatabase,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let version: Version = args.version.parse()?;
    let info = args.implementation.implementation().select(db);
    let report = Report::build(info, &version, args.subversions, clock)?;
    if args.json {
        report.write_json(out)
    } else {
        report.write_text(out)
    }
}

pub fn execute(
    command: &Command,
    db: &VersionDatabase,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match command {
        Command::List(args) => list(args, db, clock, out),
        Command::Show(args) => show(args, db, clock, out),
    }
}

/// Run `command`, reporting user errors on `err`
///
/// Returns the process exit code. Failures to write output are returned as
/// errors instead.
pub fn run(
    command: &Command,
    db: &VersionDatabase,
    clock: &dyn Clock,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<u8> {
    match execute(command, db, clock, out) {
        Ok(()) => Ok(0),
        Err(e) if e.is_user_error() => {
            writeln!(err, "{PROGRAM}: {e}")?;
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
