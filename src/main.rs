use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Log filter; falls back to warnings from this crate only.
const LOG_ENV: &str = "BROADSIDE_LOG";

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("broadside=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let code = broadside::cli::run_with_args(&args);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
