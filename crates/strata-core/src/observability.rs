//! Logging and tracing setup.
//!
//! [`init_logging`] installs the global `tracing` subscriber. Output format
//! is chosen by the caller: JSON lines for deployments that ship logs to a
//! collector, pretty output for local development. The filter honours
//! `RUST_LOG` and defaults to `info`.
//!
//! The span constructors give catalog operations a consistent set of
//! structured fields.

use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::Error;
use crate::table::TableName;

static INIT: Once = Once::new();

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Machine-readable JSON lines.
    Json,
    /// Human-readable output for local development.
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(Error::invalid_input(format!(
                "log format must be json or pretty, got {other:?}"
            ))),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Span covering one lineage traversal.
#[must_use]
pub fn lineage_span(operation: &str, table: &TableName) -> tracing::Span {
    tracing::info_span!("lineage", op = operation, table = %table)
}

/// Span covering one sample-query operation.
#[must_use]
pub fn sample_span(operation: &str, table: &TableName) -> tracing::Span {
    tracing::info_span!("sample", op = operation, table = %table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Json);
    }

    #[test]
    fn test_log_format_parses() {
        assert_eq!("json".parse::<LogFormat>().expect("json"), LogFormat::Json);
        assert_eq!(
            " Pretty ".parse::<LogFormat>().expect("pretty"),
            LogFormat::Pretty
        );
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_spans_enter_cleanly() {
        let table = TableName::new("shop", "orders").expect("valid");
        let touched = lineage_span("closure", &table).in_scope(|| 1)
            + sample_span("sample", &table).in_scope(|| 1);
        assert_eq!(touched, 2);
    }
}
