use weather::cli::Cli;
use weather::error::AppError;
use weather::logger::initialize as LoggerInitialize;
use weather::runner::{report_failure, run};

use weather_core::config::load_dotenv;

use common::ErrorLocation;

use std::io::{stderr, stdout};
use std::panic::Location;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use tokio::runtime::Builder;

fn main() -> ExitCode {
    // Before parsing, so WEATHER_* values in .env reach clap
    let dotenv_path = load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = LoggerInitialize(cli.log_level(), cli.log_dir.as_deref()) {
        report_failure(&e, &mut stderr());
        return ExitCode::FAILURE;
    }

    match dotenv_path {
        Some(path) => info!("Loaded .env from: {}", path.display()),
        None => debug!("No .env file found - using process environment only"),
    }

    // One request, one thread
    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            let e = AppError::Runtime {
                message: format!("Failed to build async runtime: {e}"),
                location: ErrorLocation::from(Location::caller()),
            };
            report_failure(&e, &mut stderr());
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(&cli, &mut stdout().lock(), &mut stderr()))
}
