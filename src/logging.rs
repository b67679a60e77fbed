//! Logging setup for taskpulse.
//!
//! Events go to stderr so they never mix with command output on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Pick the filter directive: `RUST_LOG` wins, then `-v`, then the config level.
fn directive(config: &LoggingConfig, verbose: bool, env: Option<&str>) -> String {
    match env.filter(|v| !v.trim().is_empty()) {
        Some(env) => env.to_string(),
        None if verbose => "debug".to_string(),
        None => config.level.clone(),
    }
}

/// Initialize the logging system.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = directive(config, verbose, env.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!(%directive, "Logging initialized");
    }
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_precedence() {
        let config = LoggingConfig {
            level: "info".to_string(),
        };

        assert_eq!(directive(&config, false, None), "info");
        assert_eq!(directive(&config, true, None), "debug");
        assert_eq!(directive(&config, true, Some("taskpulse=trace")), "taskpulse=trace");
        assert_eq!(directive(&config, false, Some("  ")), "info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_test();
        init(&LoggingConfig::default(), false);
    }
}
