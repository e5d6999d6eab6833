//! cmdcomplete - grammar-driven command-line completion
//!
//! Reference host for the completion engine: loads a command description and
//! prints the candidates for a partially typed command line.
//!
//! # Usage
//!
//! ```bash
//! # Candidates at the end of the buffer
//! cmdcomplete complete -g grammars/zoxide.json "zoxide query --"
//!
//! # Walker trace for debugging a grammar
//! cmdcomplete explain -g grammars/zoxide.json "zoxide import --from z "
//!
//! # Validate a grammar file
//! cmdcomplete check -g grammars/zoxide.json
//! ```

use tracing_subscriber::EnvFilter;

use cmdcomplete::cli::CliInterface;
use cmdcomplete::error::Result;

/// Environment variable holding a `tracing` filter that replaces the configured level
const LOG_ENV: &str = "CMDCOMPLETE_LOG";

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Run the subcommand and print its output
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    let output = cli.execute()?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr so stdout carries only candidates.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
