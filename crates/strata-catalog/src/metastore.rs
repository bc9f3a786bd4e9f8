//! Table registry and in-memory lineage graph.
//!
//! [`MemoryMetastore`] keeps table records and lineage edges in process
//! memory behind a read-write lock. It backs the traversal and sampling
//! services in tests and embedded deployments; production deployments put
//! their own store behind the same traits.
//!
//! Edge listings are deterministic: edges come back in the order they were
//! linked, so closure results are reproducible run to run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;
use parking_lot::RwLock;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use strata_core::{EdgeId, TableName};

use crate::error::{CatalogError, Result};
use crate::lineage::{EdgeDirection, EdgeSource, LineageEdge};
use crate::parameters::{self, ParameterValue};
use crate::table::TableRecord;
use crate::taxonomy::{self, CategoryObject, TaxonomyGroup};

/// Capability to look up one table's record.
pub trait TableStore: Send + Sync {
    /// Fetches the record for `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    fn table(&self, name: &TableName) -> Result<TableRecord>;
}

struct State {
    tables: HashMap<TableName, TableRecord>,
    graph: DiGraph<TableName, usize>,
    index: HashMap<TableName, NodeIndex>,
    edges: Vec<LineageEdge>,
    parameter_values: HashMap<TableName, Vec<ParameterValue>>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            graph: DiGraph::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            parameter_values: HashMap::new(),
        }
    }
}

impl State {
    /// Returns the graph node for `name`, creating it on first sight.
    fn node(&mut self, name: &TableName) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.index.insert(name.clone(), idx);
        idx
    }
}

/// In-memory table registry and lineage graph.
///
/// All methods take `&self`; interior locking makes the store safe to
/// share behind an [`Arc`](std::sync::Arc).
#[derive(Default)]
pub struct MemoryMetastore {
    state: RwLock<State>,
}

impl MemoryMetastore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `record`, replacing any previous record with the same
    /// name.
    pub fn register_table(&self, record: TableRecord) {
        let mut state = self.state.write();
        let name = record.name.clone();
        state.node(&name);
        state.tables.insert(name.clone(), record);
        drop(state);
        tracing::debug!(table = %name, "registered table");
    }

    /// Records a lineage edge from producer `source` to consumer `target`.
    ///
    /// Endpoints need not be registered yet; a traversal that expands an
    /// endpoint which never gets registered fails with
    /// [`CatalogError::TableNotFound`].
    pub fn link(&self, source: &TableName, target: &TableName) -> EdgeId {
        let mut state = self.state.write();
        let edge = LineageEdge::new(source.clone(), target.clone());
        let id = edge.id;
        let weight = state.edges.len();
        let from = state.node(source);
        let to = state.node(target);
        state.edges.push(edge);
        state.graph.add_edge(from, to, weight);
        drop(state);
        tracing::debug!(source = %source, target = %target, "linked lineage edge");
        id
    }

    /// Fetches `name` if registered.
    #[must_use]
    pub fn get(&self, name: &TableName) -> Option<TableRecord> {
        self.state.read().tables.get(name).cloned()
    }

    /// Registered table names, sorted.
    #[must_use]
    pub fn table_names(&self) -> Vec<TableName> {
        let state = self.state.read();
        let mut names: Vec<_> = state.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().tables.len()
    }

    /// Whether the store holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().tables.is_empty()
    }

    /// Replaces the tag set for `name`. Empty tags are dropped.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn set_tags(&self, name: &TableName, tags: Vec<String>) -> Result<()> {
        self.update(name, |record| {
            record.tags = tags
                .into_iter()
                .filter(|tag| !tag.trim().is_empty())
                .collect();
        })?;
        tracing::info!(table = %name, "updated table tags");
        Ok(())
    }

    /// Sets the owner for `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn set_owner(&self, name: &TableName, owner: impl Into<String>) -> Result<()> {
        let owner = owner.into();
        self.update(name, |record| {
            record.owner = Some(owner);
        })?;
        tracing::info!(table = %name, "updated table owner");
        Ok(())
    }

    /// Replaces the taxonomy assignments for `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn set_categories(&self, name: &TableName, categories: Vec<CategoryObject>) -> Result<()> {
        self.update(name, |record| {
            record.categories = categories;
        })?;
        tracing::info!(table = %name, "updated table categories");
        Ok(())
    }

    /// Distinct owners across all registered tables, sorted.
    #[must_use]
    pub fn owners(&self) -> BTreeSet<String> {
        self.state
            .read()
            .tables
            .values()
            .filter_map(|record| record.owner.clone())
            .collect()
    }

    /// Increments and returns the view counter for `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn increment_view_count(&self, name: &TableName) -> Result<u64> {
        self.update(name, |record| {
            record.view_count += 1;
            record.view_count
        })
    }

    /// The `n` most viewed tables, view count descending, name ascending
    /// on ties.
    #[must_use]
    pub fn most_viewed(&self, n: usize) -> Vec<TableRecord> {
        let state = self.state.read();
        let mut records: Vec<_> = state.tables.values().cloned().collect();
        drop(state);
        records.sort_by(|a, b| {
            b.view_count
                .cmp(&a.view_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        records.truncate(n);
        records
    }

    /// Records one observed partition-parameter value for `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn record_parameter_value(
        &self,
        name: &TableName,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let mut state = self.state.write();
        if !state.tables.contains_key(name) {
            return Err(CatalogError::table_not_found(name));
        }
        state
            .parameter_values
            .entry(name.clone())
            .or_default()
            .push(ParameterValue::new(key, value));
        Ok(())
    }

    /// Distinct observed parameter values for `name`, grouped per key.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn parameter_values(&self, name: &TableName) -> Result<BTreeMap<String, Vec<String>>> {
        let state = self.state.read();
        if !state.tables.contains_key(name) {
            return Err(CatalogError::table_not_found(name));
        }
        let rows = state
            .parameter_values
            .get(name)
            .map_or(&[][..], Vec::as_slice);
        Ok(parameters::distinct_values(rows))
    }

    /// First observed value for `key` on `name`, if any.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn first_parameter_value(&self, name: &TableName, key: &str) -> Result<Option<String>> {
        let state = self.state.read();
        if !state.tables.contains_key(name) {
            return Err(CatalogError::table_not_found(name));
        }
        let rows = state
            .parameter_values
            .get(name)
            .map_or(&[][..], Vec::as_slice);
        Ok(parameters::first_value(rows, key).map(ToString::to_string))
    }

    /// Groups `name`'s taxonomy assignments by taxonomy.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] when the table is not registered.
    pub fn taxonomies(&self, name: &TableName) -> Result<Vec<TaxonomyGroup>> {
        let state = self.state.read();
        let record = state
            .tables
            .get(name)
            .ok_or_else(|| CatalogError::table_not_found(name))?;
        Ok(taxonomy::group_by_taxonomy(&record.categories))
    }

    fn update<R>(&self, name: &TableName, apply: impl FnOnce(&mut TableRecord) -> R) -> Result<R> {
        let mut state = self.state.write();
        let record = state
            .tables
            .get_mut(name)
            .ok_or_else(|| CatalogError::table_not_found(name))?;
        let value = apply(record);
        record.updated_at = Utc::now();
        Ok(value)
    }
}

impl TableStore for MemoryMetastore {
    fn table(&self, name: &TableName) -> Result<TableRecord> {
        self.get(name)
            .ok_or_else(|| CatalogError::table_not_found(name))
    }
}

impl EdgeSource for MemoryMetastore {
    fn edges(&self, table: &TableName, direction: EdgeDirection) -> Result<Vec<LineageEdge>> {
        let state = self.state.read();
        if !state.tables.contains_key(table) {
            return Err(CatalogError::table_not_found(table));
        }
        let Some(&idx) = state.index.get(table) else {
            return Ok(Vec::new());
        };
        let petgraph_direction = match direction {
            EdgeDirection::Upstream => Direction::Incoming,
            EdgeDirection::Downstream => Direction::Outgoing,
        };
        // petgraph iterates adjacency most-recent-first; the weight is the
        // insertion sequence, so sorting restores link order.
        let mut weights: Vec<usize> = state
            .graph
            .edges_directed(idx, petgraph_direction)
            .map(|edge| *edge.weight())
            .collect();
        weights.sort_unstable();
        Ok(weights
            .into_iter()
            .map(|weight| state.edges[weight].clone())
            .collect())
    }
}
