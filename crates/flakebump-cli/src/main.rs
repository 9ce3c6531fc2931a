use flakebump_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    let file_logging = match logging::init_logging() {
        Ok(()) => true,
        Err(e) => {
            logging::init_logging_stderr();
            tracing::debug!("file logging unavailable: {:#}", e);
            false
        }
    };

    if let Err(err) = cli::run_from_args() {
        // On the stderr fallback the eprintln below is the only line the user should see.
        if file_logging {
            tracing::error!("{:#}", err);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
