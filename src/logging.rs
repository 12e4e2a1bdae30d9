//! Tracing subscriber setup for the `fitment` and `fitment-proxy` binaries.
//!
//! Filter priority: `FITMENT_LOG`, then `RUST_LOG`, then the CLI verbosity
//! default. Output goes to stderr so stdout stays clean for JSON.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "FITMENT_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(verbosity: Verbosity) {
    let filter = build_env_filter(verbosity, std::env::var(LOG_ENV).ok());
    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(verbosity == Verbosity::Verbose)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

fn build_env_filter(verbosity: Verbosity, project_directives: Option<String>) -> EnvFilter {
    if let Some(directives) = project_directives
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = verbosity.default_level().as_str().to_ascii_lowercase();
    EnvFilter::try_new(format!("{level},fitment={level}"))
        .unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
#[path = "tests/logging_tests.rs"]
mod tests;
