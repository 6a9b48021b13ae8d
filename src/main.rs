//! CLI entry point for scimon.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod app_config;
mod cli;

use cli::Args;

/// Process outcome mapped to the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::FAILURE,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = app::terminal::resolve_default_log_level(args.quiet, args.verbose);
    let no_color = app::terminal::should_disable_color(
        args.no_color,
        app::terminal::no_color_env_requested(),
        app::terminal::is_dumb_terminal(),
    );
    app::terminal::init_tracing(default_level, no_color);

    debug!(?args, "CLI arguments parsed");

    let exit = app::run(args).await?;
    Ok(exit.into())
}
