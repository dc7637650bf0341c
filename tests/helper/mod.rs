//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use pyversion_info::cli::{self, Cli};
use pyversion_info::config::Config;
use pyversion_info::database::VersionDatabase;
use pyversion_info::version::{Clock, FixedClock};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pyversion-info-data.json")
}

pub fn load_fixture() -> VersionDatabase {
    VersionDatabase::from_file(&fixture_path()).unwrap()
}

/// 2019-04-23
pub fn april_2019() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2019, 4, 23).unwrap())
}

/// 2021-11-04
pub fn november_2021() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2021, 11, 4).unwrap())
}

pub struct Output {
    pub code: u8,
    pub stdout: String,
    pub stderr: String,
}

/// Run the command line `args` against the fixture database
pub async fn run_cli(args: &[&str], clock: &dyn Clock) -> Output {
    let fixture = fixture_path();
    let mut argv = vec!["pyversion-info", "-d", fixture.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let db = cli::load_database(&cli, &Config::default()).await.unwrap();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(&cli.command, &db, clock, &mut stdout, &mut stderr).unwrap();

    Output {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

pub fn lines(versions: &[&str]) -> String {
    versions.iter().map(|v| format!("{v}\n")).collect()
}
