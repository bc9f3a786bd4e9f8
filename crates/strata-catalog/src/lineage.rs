//! Lineage edges and transitive closure traversal.
//!
//! Tables form a directed graph: an edge `source → target` records that
//! data produced by `source` feeds `target`. A table's dependencies lie
//! upstream (walk edges against the data flow), its successors downstream.
//! [`LineageResolver`] walks either direction transitively and returns the
//! edge sequence in discovery order.
//!
//! Traversal rules:
//!
//! - Depth-first expansion: a newly discovered table's own edges are
//!   walked before the next sibling edge.
//! - Each table is discovered through at most one edge. Later edges that
//!   reach an already-seen table, the walk root included, are dropped.
//! - The seen-set is the only cycle guard; cyclic graphs terminate without
//!   cooperation from the edge source.
//! - A lookup failure aborts the walk with
//!   [`CatalogError::TableNotFound`](crate::error::CatalogError::TableNotFound)
//!   instead of producing a partial closure.

use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strata_core::observability::lineage_span;
use strata_core::{EdgeId, TableName};

use crate::error::Result;
use crate::metrics::record_lineage_walk;

/// Traversal direction over the lineage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeDirection {
    /// Towards producers: the frontier endpoint of each edge is its source.
    Upstream,
    /// Towards consumers: the frontier endpoint of each edge is its target.
    Downstream,
}

impl EdgeDirection {
    /// Stable lowercase label, used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One edge of the lineage graph. Data flows `source → target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEdge {
    /// Edge identifier.
    pub id: EdgeId,
    /// Producing table.
    pub source: TableName,
    /// Consuming table.
    pub target: TableName,
    /// When the edge was recorded.
    pub created_at: DateTime<Utc>,
}

impl LineageEdge {
    /// Builds an edge with a fresh id.
    #[must_use]
    pub fn new(source: TableName, target: TableName) -> Self {
        Self {
            id: EdgeId::generate(),
            source,
            target,
            created_at: Utc::now(),
        }
    }

    /// The endpoint the traversal moves to when walking `direction`.
    #[must_use]
    pub const fn frontier(&self, direction: EdgeDirection) -> &TableName {
        match direction {
            EdgeDirection::Upstream => &self.source,
            EdgeDirection::Downstream => &self.target,
        }
    }
}

/// Capability to list the edges attached to one table.
///
/// The direction selects which endpoint must match the queried table:
/// upstream lists edges whose target is the table, downstream lists edges
/// whose source is the table. Implementations return edges in a stable
/// order; closure results follow it.
pub trait EdgeSource: Send + Sync {
    /// Lists the edges attached to `table` in `direction`.
    ///
    /// # Errors
    ///
    /// An unknown table is a
    /// [`CatalogError::TableNotFound`](crate::error::CatalogError::TableNotFound)
    /// failure, never an empty listing.
    fn edges(&self, table: &TableName, direction: EdgeDirection) -> Result<Vec<LineageEdge>>;
}

/// Walks the lineage graph transitively in either direction.
pub struct LineageResolver<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: EdgeSource + ?Sized> LineageResolver<'a, S> {
    /// Creates a resolver over `source`.
    #[must_use]
    pub const fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Edges directly upstream of `table`: its dependencies.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures from the edge source.
    pub fn dependencies(&self, table: &TableName) -> Result<Vec<LineageEdge>> {
        self.source.edges(table, EdgeDirection::Upstream)
    }

    /// Edges directly downstream of `table`: its successors.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures from the edge source.
    pub fn successors(&self, table: &TableName) -> Result<Vec<LineageEdge>> {
        self.source.edges(table, EdgeDirection::Downstream)
    }

    /// Transitive closure of dependencies, in discovery order.
    ///
    /// # Errors
    ///
    /// Propagates the first lookup failure and discards the partial walk.
    pub fn transitive_dependencies(&self, root: &TableName) -> Result<Vec<LineageEdge>> {
        self.closure(root, EdgeDirection::Upstream)
    }

    /// Transitive closure of successors, in discovery order.
    ///
    /// # Errors
    ///
    /// Propagates the first lookup failure and discards the partial walk.
    pub fn transitive_successors(&self, root: &TableName) -> Result<Vec<LineageEdge>> {
        self.closure(root, EdgeDirection::Downstream)
    }

    /// Computes the transitive closure from `root` in `direction`.
    ///
    /// The result lists one edge per table reachable from `root`, in the
    /// order the walk first discovered it. Edges leading back to `root` or
    /// to an already-discovered table are dropped. Every discovered
    /// table's edge list is fetched exactly once, so the cost is linear in
    /// visited nodes and edges.
    ///
    /// # Errors
    ///
    /// Propagates the first lookup failure and discards the partial walk.
    pub fn closure(&self, root: &TableName, direction: EdgeDirection) -> Result<Vec<LineageEdge>> {
        let span = lineage_span("closure", root);
        let _guard = span.enter();
        let started = Instant::now();

        let mut seen = HashSet::new();
        seen.insert(root.clone());
        let mut result = Vec::new();
        self.expand(root, direction, &mut seen, &mut result)?;

        record_lineage_walk(direction, result.len(), started.elapsed());
        tracing::debug!(
            root = %root,
            direction = %direction,
            edges = result.len(),
            "computed lineage closure"
        );
        Ok(result)
    }

    fn expand(
        &self,
        table: &TableName,
        direction: EdgeDirection,
        seen: &mut HashSet<TableName>,
        result: &mut Vec<LineageEdge>,
    ) -> Result<()> {
        for edge in self.source.edges(table, direction)? {
            let next = edge.frontier(direction).clone();
            if !seen.insert(next.clone()) {
                continue;
            }
            result.push(edge);
            self.expand(&next, direction, seen, result)?;
        }
        Ok(())
    }
}
