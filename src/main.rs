mod config;
mod db;
mod error;
mod import;
mod models;
mod month;
mod report;
mod run;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = run::Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::Settings::load(config::Overrides {
        db_path: cli.db.clone(),
        user: cli.user.clone(),
    })?;
    let mut db = db::Database::open(&settings.db_path)?;

    let output = run::dispatch(cli.command, &mut db, &settings)?;
    run::print(&output, cli.json)
}

/// `SPENDO_LOG` wins; otherwise `-v` / `-vv` raise the default `warn` level.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("SPENDO_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
