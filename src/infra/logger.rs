// src/infra/logger.rs — Log setup for the chain runner
//
// Logs go to stderr; stdout is reserved for the final artifact list.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, EnvFilter};

/// Overrides the default directive, e.g. `COLLAPSER_LOG=collapser=debug`.
pub const LOG_ENV: &str = "COLLAPSER_LOG";

/// Directive used when `COLLAPSER_LOG` is unset. Dependencies (reqwest, hyper)
/// stay at `warn` even in verbose mode.
pub fn default_directive(verbose: bool) -> String {
    let ours = if verbose { "info" } else { "warn" };
    format!("warn,collapser={ours}")
}

pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
