//! `shelf`: an interactive session over an in-memory lending library.
//!
//! Commands are read one per line from stdin (see `help`), replies go to
//! stdout and errors to stderr. Nothing is persisted between sessions.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use exn::ResultExt;
use shelf_config::Loader;

use crate::error::{ErrorKind, Result};
use crate::session::Session;

mod command;
mod error;
mod logging;
mod session;

/// Lend, return and find books in an in-memory library.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// Configuration file, merged over the user configuration.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shelf: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let loader = match cli.config {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    let config = loader.load().or_raise(|| ErrorKind::Config)?;
    logging::init(&config.log, cli.verbose)?;
    tracing::info!(verify = %config.store.verify, capacity = config.store.capacity, "session started");

    let mut session = Session::new(config.store.build());
    session.run(io::stdin().lock(), &mut io::stdout().lock(), &mut io::stderr().lock())?;

    tracing::info!(stats = %session.store().stats(), "session ended");
    Ok(())
}
