use book_ledger_rust::cli::{self, Cli};
use book_ledger_rust::clock::SystemClock;
use book_ledger_rust::storage::file::JsonFileStorage;
use book_ledger_rust::{configs, storage, AppError};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = Cli::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<(), AppError> {
    configs::load_dotenv();
    let config = configs::load_config()?;

    let _guard = match config.logger() {
        Some(logger) => Some(configs::logging::set_global_logging_config(logger)?),
        None => {
            configs::logging::set_default_logging()?;
            None
        }
    };

    let path = args.storage.unwrap_or_else(|| config.storage().path().to_path_buf());
    let storage = storage::shared(JsonFileStorage::new(path));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::execute(args.command, storage, SystemClock, &mut out)
}
