use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

mod cli;

use channelctl::{Config, ConfigStore};
use cli::{dispatch, Cli};

fn main() -> ExitCode {
    // Only show warnings and errors unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = match cli.db {
        Some(ref path) => path.clone(),
        None => {
            let config = Config::load().context("failed to load configuration")?;
            PathBuf::from(config.db_path)
        }
    };

    let store = ConfigStore::open(&db_path)
        .with_context(|| format!("cannot open database at {}", db_path.display()))?;

    dispatch(&store, cli.command)?;

    store.close()?;
    Ok(())
}
