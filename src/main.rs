use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use pyversion_info::cli::{self, Cli};
use pyversion_info::config::{self, Config};
use pyversion_info::logging;
use pyversion_info::version::SystemClock;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;
    let config = Config::load(&config::config_path())?;

    let db = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(cli::load_database(&cli, &config))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = cli::run(
        &cli.command,
        &db,
        &SystemClock,
        &mut out,
        &mut std::io::stderr(),
    )?;
    out.flush()?;

    Ok(ExitCode::from(code))
}
