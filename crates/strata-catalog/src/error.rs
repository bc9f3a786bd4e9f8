//! Catalog error types.

use thiserror::Error;

/// Convenience alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A referenced table has no record in the backing store.
    ///
    /// Raised for unknown roots and for edges that point at tables the
    /// store knows nothing about. An in-progress traversal aborts with
    /// this error instead of returning a partial closure.
    #[error("table not found: {table}")]
    TableNotFound {
        /// Fully-qualified name of the missing table.
        table: String,
    },

    /// A sample query could not be executed.
    #[error("sample query failed for {table}: {message}")]
    ExecutionFailed {
        /// Fully-qualified name of the sampled table.
        table: String,
        /// Details from the executor.
        message: String,
        /// Underlying cause, when available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration value could not be read.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details of the offending setting.
        message: String,
    },
}

impl CatalogError {
    /// Builds a [`CatalogError::TableNotFound`] for the given table.
    #[must_use]
    pub fn table_not_found(table: impl std::fmt::Display) -> Self {
        Self::TableNotFound {
            table: table.to_string(),
        }
    }

    /// Builds a [`CatalogError::ExecutionFailed`] without an underlying
    /// cause.
    #[must_use]
    pub fn execution_failed(table: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            table: table.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`CatalogError::ExecutionFailed`] wrapping an underlying
    /// cause.
    #[must_use]
    pub fn execution_failed_with_source(
        table: impl std::fmt::Display,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ExecutionFailed {
            table: table.to_string(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Builds a [`CatalogError::Configuration`] with the given message.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
