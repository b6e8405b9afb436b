//! Structured logging on stderr.
//!
//! Reports go to stdout; every log line goes to stderr so the two never mix.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Install the global subscriber.
///
/// Fails if the filter does not parse or a subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_level)?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parse a filter directive without looking at the environment.
pub fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Standard log event names.
pub mod events {
    /// A suite run is starting.
    pub const SUITE_STARTED: &str = "suite_started";

    /// All routes of an entry point were registered with its router.
    pub const ENTRY_MOUNTED: &str = "entry_mounted";

    /// The correctness gate passed for an entry point.
    pub const ENTRY_VERIFIED: &str = "entry_verified";

    /// An entry point finished its timed loop.
    pub const ENTRY_COMPLETED: &str = "entry_completed";

    /// An entry point was aborted (configuration error or failed gate).
    pub const ENTRY_FAILED: &str = "entry_failed";

    /// A suite run finished.
    pub const SUITE_FINISHED: &str = "suite_finished";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_suite_started {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SUITE_STARTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_entry_mounted {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::ENTRY_MOUNTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_entry_verified {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::ENTRY_VERIFIED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_entry_completed {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::ENTRY_COMPLETED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_entry_failed {
    ($($field:tt)*) => {
        tracing::error!(
            event = $crate::logging::events::ENTRY_FAILED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_suite_finished {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SUITE_FINISHED,
            $($field)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Subscriber initialization is process-global, so only the parsing
    // side is tested here.

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("invalid"), None);
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("warn,routebench=debug").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_bad_level() {
        let err = build_filter("routebench=loud").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }
}
