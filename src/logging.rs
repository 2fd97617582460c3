//! Tracing subscriber setup for the binary.
//!
//! Log lines go to stderr so command output on stdout stays clean. The filter
//! honors `RUST_LOG` and otherwise defaults to `info` (`debug` when verbose).

use crate::config::LogFormat;
use crate::constants::{DEFAULT_LOG_LEVEL, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use std::io::IsTerminal;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Builds the level filter, preferring `RUST_LOG` when it parses.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global subscriber. Does nothing if one is already set.
pub fn init(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// The span every invocation runs inside, tagged with a fresh correlation id.
pub fn root_span(command: &str) -> Span {
    let correlation_id = Uuid::new_v4();
    tracing::info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id,
        command = command,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_span_has_expected_name() {
        let span = root_span("list");
        if let Some(metadata) = span.metadata() {
            assert_eq!(metadata.name(), TRACING_ROOT_SPAN_NAME);
        }
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(LogFormat::Text, false);
        init(LogFormat::Json, true);
    }
}
