//! Lineage traversal and sample caching for a Hive-style table catalog.
//!
//! The crate models the hot path of a warehouse metadata service:
//!
//! - [`lineage`]: the directed lineage graph and transitive dependency /
//!   successor closures with deterministic discovery order
//! - [`metastore`]: an in-memory registry implementing the lookup seams
//!   ([`EdgeSource`](lineage::EdgeSource), [`TableStore`](metastore::TableStore)),
//!   plus tags, owners, taxonomy, parameter values, and view counters
//! - [`cache`] and [`sample`]: a bounded, time-expiring result cache and
//!   the sampling service that loads through an opaque
//!   [`QueryExecutor`](sample::QueryExecutor)
//!
//! # Example
//!
//! ```rust
//! use strata_catalog::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryMetastore::new();
//! let raw = TableName::new("shop", "raw_events")?;
//! let orders = TableName::new("shop", "orders")?;
//! store.register_table(TableRecord::new(raw.clone()));
//! store.register_table(TableRecord::new(orders.clone()));
//! store.link(&raw, &orders);
//!
//! let resolver = LineageResolver::new(&store);
//! let closure = resolver.transitive_dependencies(&orders)?;
//! assert_eq!(closure.len(), 1);
//! assert_eq!(closure[0].source, raw);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod error;
pub mod lineage;
pub mod metastore;
pub mod metrics;
pub mod parameters;
pub mod sample;
pub mod table;
pub mod taxonomy;

pub use error::{CatalogError, Result};

/// Curated re-exports for embedding the catalog.
pub mod prelude {
    pub use crate::cache::{CacheConfig, CacheStats, ResultCache};
    pub use crate::error::{CatalogError, Result};
    pub use crate::lineage::{EdgeDirection, EdgeSource, LineageEdge, LineageResolver};
    pub use crate::metastore::{MemoryMetastore, TableStore};
    pub use crate::parameters::ParameterValue;
    pub use crate::sample::{
        FailingExecutor, QueryExecutor, QueryResult, SampleQuery, SampleService, StaticExecutor,
    };
    pub use crate::table::{FieldSchema, TableRecord};
    pub use crate::taxonomy::{CategoryObject, TaxonomyGroup};
    pub use strata_core::{EdgeId, TableName};
}
