// Entrypoint for the CLI.
// - Keeps `main` small: parse flags, set up logging, hand off to `dispatch`.
// - The API client is only built once the flags are known to be usable.

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tubeman_cli::{
    api::ApiClient,
    cli::Cli,
    config,
    dispatch::{dispatch, FAILURE_STATUS},
    ui::Console,
};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut console = Console::stdout();
    let connect = || -> anyhow::Result<ApiClient> {
        if let Some(path) = config::load_env_file(cli.env_file.as_deref())? {
            debug!(path = %path.display(), "loaded env file");
        }
        ApiClient::from_env()
    };

    match dispatch(&cli, connect, &mut console) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            console.error(&err);
            ExitCode::from(FAILURE_STATUS)
        }
    }
}
