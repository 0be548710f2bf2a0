use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tk_cli::commands::{hours, start, status, stop};
use tk_cli::{Action, Cli, Config};
use tk_core::Month;

/// Open the store at the configured path, creating it if necessary.
fn open_database(config: &Config) -> Result<tk_db::Database> {
    tk_db::Database::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database at {}",
            config.database_path.display()
        )
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    // Arguments are validated before the store is touched.
    let action = Action::resolve(&cli.command, &config, Month::current()).context("invalid arguments")?;
    tracing::debug!(?action, "resolved command");

    let mut db = open_database(&config)?;
    let mut stdout = std::io::stdout().lock();

    match action {
        Action::Start(label) => start::run(&mut stdout, &mut db, &label)?,
        Action::Stop(label) => stop::run(&mut stdout, &mut db, &label)?,
        Action::Hours { query, json } => hours::run(&mut stdout, &db, query, json)?,
        Action::Status => status::run(&mut stdout, &db, &config.database_path)?,
    }

    Ok(())
}
