//! Logging setup.
//!
//! All output goes to stderr so stdout stays clean for JSON and piping.
//! `RUST_LOG` takes precedence over the configured levels.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter directive string from configuration.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.default.clone()];
    for (target, level) in &config.modules {
        directives.push(format!("{target}={level}"));
    }
    directives.join(",")
}

pub fn init_with_config(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    // A second init (tests, embedding) keeps the existing subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
