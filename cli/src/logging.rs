//! Diagnostic logging on stderr.
//!
//! Report output owns stdout; everything emitted through `tracing` goes to
//! stderr. `RUST_LOG` wins over `-v` and the configured level.

use tracing_subscriber::EnvFilter;

/// Level filter for a `-v` count, falling back to the configured level.
pub fn level_for(verbosity: u8, configured: Option<&str>) -> &str {
    match verbosity {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber.
pub fn init(verbosity: u8, configured: Option<&str>) -> Result<(), String> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = level_for(verbosity, configured);
            EnvFilter::try_new(level)
                .map_err(|err| format!("Invalid log level '{level}': {err}"))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| format!("Failed to initialize logging: {err}"))
}
