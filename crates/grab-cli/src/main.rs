use grab_core::logging;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::debug!("file logging unavailable: {:#}", err);
    }

    match cli::run_from_args() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("grab error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
