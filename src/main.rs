//! Shortcuts - keyboard shortcut expression toolkit
//!
//! Command-line front end for the `shortcuts_parser` library.
//!
//! # Usage
//!
//! ```bash
//! # Canonical form of a shortcut
//! shortcuts parse "ctrl-shift+k"
//!
//! # Completions at the end of an unfinished shortcut
//! shortcuts suggest "ctrl+" --key k --key x
//!
//! # Check key names against the configured key list
//! shortcuts validate "ctrl+foo"
//! ```

use clap::CommandFactory;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use shortcuts_parser::cli::{CliArgs, CliInterface};
use shortcuts_parser::error::Result;

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
/// 4. Handle the subcommand, or print help when none was given
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    CliArgs::command().print_help()?;
    println!();
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
