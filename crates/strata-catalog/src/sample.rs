//! Sample-query execution and caching.
//!
//! A sample is a small tabular excerpt of one table, produced by an opaque
//! query executor (Hive in production deployments). Unparameterized
//! samples are cached per table; parameterized requests always execute
//! directly. [`SampleService::spawn_sample`] submits a load as a task on
//! the runtime and hands back its join handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::Instrument;

use strata_core::observability::sample_span;
use strata_core::TableName;

use crate::cache::ResultCache;
use crate::error::{CatalogError, Result};
use crate::metastore::TableStore;
use crate::metrics::{record_sample_bypass, record_sample_load_failure};
use crate::table::FieldSchema;

/// Tabular result of one sample query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Column headers, in projection order.
    pub columns: Vec<String>,
    /// Row values, one inner vector per row.
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    /// Builds a result from headers and rows.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Request handed to a [`QueryExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleQuery {
    /// Table to sample.
    pub table: TableName,
    /// Fields to project, in schema order.
    pub fields: Vec<String>,
    /// Partition-parameter schema of the table.
    pub parameters: Vec<FieldSchema>,
    /// Concrete parameter values to filter on; empty means unfiltered.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub overrides: BTreeMap<String, String>,
}

/// Capability to run one sample query against the warehouse.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes `query` and returns its tabular result.
    ///
    /// # Errors
    ///
    /// Implementations surface failures as
    /// [`CatalogError::ExecutionFailed`].
    async fn execute(&self, query: &SampleQuery) -> Result<QueryResult>;
}

/// Executor answering every query with a fixed result. Useful in tests and
/// wiring checks.
#[derive(Debug, Clone, Default)]
pub struct StaticExecutor {
    result: QueryResult,
}

impl StaticExecutor {
    /// Creates an executor that always answers with `result`.
    #[must_use]
    pub fn new(result: QueryResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl QueryExecutor for StaticExecutor {
    async fn execute(&self, _query: &SampleQuery) -> Result<QueryResult> {
        Ok(self.result.clone())
    }
}

/// Executor that fails every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingExecutor;

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn execute(&self, query: &SampleQuery) -> Result<QueryResult> {
        Err(CatalogError::execution_failed(&query.table, "executor configured to fail"))
    }
}

/// Serves table samples, caching unparameterized results.
///
/// Wired explicitly from a record store, a query executor, and a result
/// cache. Clones share the cache and can be moved onto tasks.
#[derive(Clone)]
pub struct SampleService {
    store: Arc<dyn TableStore>,
    executor: Arc<dyn QueryExecutor>,
    cache: Arc<ResultCache<QueryResult>>,
}

impl SampleService {
    /// Wires a service from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn TableStore>,
        executor: Arc<dyn QueryExecutor>,
        cache: Arc<ResultCache<QueryResult>>,
    ) -> Self {
        Self {
            store,
            executor,
            cache,
        }
    }

    /// Returns the sample for `table`, serving the cached copy when fresh.
    ///
    /// On a miss the query runs through the executor and the result is
    /// stored before returning. A failed execution propagates and leaves
    /// no cache entry, so the next request retries.
    ///
    /// # Errors
    ///
    /// [`CatalogError::TableNotFound`] for unregistered tables;
    /// [`CatalogError::ExecutionFailed`] when the executor fails.
    pub async fn sample(&self, table: &TableName) -> Result<QueryResult> {
        let span = sample_span("sample", table);
        self.cached_sample(table).instrument(span).await
    }

    /// Returns a sample filtered by `overrides`.
    ///
    /// Non-empty overrides bypass the cache in both directions: nothing is
    /// read from it and nothing is stored. Empty overrides behave exactly
    /// like [`SampleService::sample`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SampleService::sample`].
    pub async fn sample_with(
        &self,
        table: &TableName,
        overrides: BTreeMap<String, String>,
    ) -> Result<QueryResult> {
        if overrides.is_empty() {
            return self.sample(table).await;
        }
        record_sample_bypass();
        let span = sample_span("sample_with", table);
        self.load(table, overrides).instrument(span).await
    }

    /// Submits a sample load to the runtime and returns its handle.
    ///
    /// The load proceeds even if the handle is dropped; any number of
    /// callers may spawn concurrently.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn_sample(
        &self,
        table: TableName,
        overrides: BTreeMap<String, String>,
    ) -> JoinHandle<Result<QueryResult>> {
        let service = self.clone();
        tokio::spawn(async move { service.sample_with(&table, overrides).await })
    }

    /// Drops the cached sample for `table`; the next request recomputes.
    /// Returns whether a cached sample was present.
    pub fn invalidate(&self, table: &TableName) -> bool {
        self.cache.invalidate(&table.to_string())
    }

    async fn cached_sample(&self, table: &TableName) -> Result<QueryResult> {
        let key = table.to_string();
        if let Some(result) = self.cache.get(&key) {
            tracing::debug!(table = %table, "sample served from cache");
            return Ok(result);
        }
        let result = self.load(table, BTreeMap::new()).await?;
        self.cache.insert(key, result.clone());
        Ok(result)
    }

    async fn load(
        &self,
        table: &TableName,
        overrides: BTreeMap<String, String>,
    ) -> Result<QueryResult> {
        let record = self.store.table(table)?;
        let query = SampleQuery {
            table: table.clone(),
            fields: record.field_names(),
            parameters: record.parameters,
            overrides,
        };
        match self.executor.execute(&query).await {
            Ok(result) => {
                tracing::debug!(
                    table = %table,
                    rows = result.row_count(),
                    "sample query completed"
                );
                Ok(result)
            }
            Err(err) => {
                record_sample_load_failure();
                tracing::warn!(table = %table, error = %err, "sample query failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::metastore::MemoryMetastore;
    use crate::table::TableRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingExecutor {
        calls: AtomicUsize,
        result: QueryResult,
    }

    impl CountingExecutor {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: QueryResult::new(
                    vec!["id".into()],
                    vec![vec!["1".into()], vec!["2".into()]],
                ),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueryExecutor for CountingExecutor {
        async fn execute(&self, _query: &SampleQuery) -> Result<QueryResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn table_name() -> TableName {
        TableName::new("shop", "orders").expect("valid")
    }

    fn store() -> Arc<MemoryMetastore> {
        let store = MemoryMetastore::new();
        store.register_table(
            TableRecord::new(table_name())
                .with_fields(vec![FieldSchema::new("id", "bigint")])
                .with_parameters(vec![FieldSchema::new("day", "string")]),
        );
        Arc::new(store)
    }

    fn service(executor: Arc<dyn QueryExecutor>, config: CacheConfig) -> SampleService {
        SampleService::new(store(), executor, Arc::new(ResultCache::new(config)))
    }

    #[tokio::test]
    async fn executor_runs_once_for_repeated_samples() {
        let executor = Arc::new(CountingExecutor::new());
        let service = service(executor.clone(), CacheConfig::default());
        let table = table_name();
        let first = service.sample(&table).await.expect("load");
        let second = service.sample(&table).await.expect("cached");
        assert_eq!(first, second);
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn expired_sample_reloads() {
        let executor = Arc::new(CountingExecutor::new());
        let config = CacheConfig {
            capacity: 10,
            ttl: Duration::from_millis(40),
        };
        let service = service(executor.clone(), config);
        let table = table_name();
        service.sample(&table).await.expect("load");
        tokio::time::sleep(Duration::from_millis(60)).await;
        service.sample(&table).await.expect("reload");
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn overrides_bypass_cache() {
        let executor = Arc::new(CountingExecutor::new());
        let service = service(executor.clone(), CacheConfig::default());
        let table = table_name();
        let overrides = BTreeMap::from([("day".to_string(), "2026-08-01".to_string())]);
        service
            .sample_with(&table, overrides.clone())
            .await
            .expect("direct");
        service
            .sample_with(&table, overrides)
            .await
            .expect("direct again");
        assert_eq!(executor.calls(), 2);
        // Nothing was stored: the unparameterized path still loads.
        service.sample(&table).await.expect("load");
        assert_eq!(executor.calls(), 3);
    }

    #[tokio::test]
    async fn empty_overrides_use_the_cache() {
        let executor = Arc::new(CountingExecutor::new());
        let service = service(executor.clone(), CacheConfig::default());
        let table = table_name();
        service
            .sample_with(&table, BTreeMap::new())
            .await
            .expect("load");
        service
            .sample_with(&table, BTreeMap::new())
            .await
            .expect("cached");
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_leaves_no_entry() {
        let cache = Arc::new(ResultCache::new(CacheConfig::default()));
        let failing = SampleService::new(store(), Arc::new(FailingExecutor), cache.clone());
        let table = table_name();
        let err = failing.sample(&table).await.unwrap_err();
        assert!(matches!(err, CatalogError::ExecutionFailed { .. }));
        assert!(cache.is_empty());

        // A later service sharing the cache retries and succeeds.
        let executor = Arc::new(CountingExecutor::new());
        let retrying = SampleService::new(store(), executor.clone(), cache);
        retrying.sample(&table).await.expect("retry succeeds");
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let executor = Arc::new(CountingExecutor::new());
        let service = service(executor.clone(), CacheConfig::default());
        let table = table_name();
        service.sample(&table).await.expect("load");
        assert!(service.invalidate(&table));
        assert!(!service.invalidate(&table));
        service.sample(&table).await.expect("reload");
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_table_is_not_found() {
        let service = service(Arc::new(CountingExecutor::new()), CacheConfig::default());
        let ghost = TableName::new("shop", "ghost").expect("valid");
        let err = service.sample(&ghost).await.unwrap_err();
        assert!(matches!(err, CatalogError::TableNotFound { .. }));
    }

    #[tokio::test]
    async fn spawned_sample_joins_with_result() {
        let executor = Arc::new(CountingExecutor::new());
        let service = service(executor, CacheConfig::default());
        let handle = service.spawn_sample(table_name(), BTreeMap::new());
        let result = handle.await.expect("join").expect("sample");
        assert_eq!(result.row_count(), 2);
    }
}
