//! Metric names and recording helpers.
//!
//! All metrics go through the `metrics` facade; without an installed
//! recorder every call is a no-op. Names follow Prometheus conventions.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::lineage::EdgeDirection;

/// Counter: cache lookups served from a fresh entry.
pub const RESULT_CACHE_HITS_TOTAL: &str = "strata_result_cache_hits_total";
/// Counter: cache lookups that found nothing or only an expired entry.
pub const RESULT_CACHE_MISSES_TOTAL: &str = "strata_result_cache_misses_total";
/// Counter: cache entries displaced by capacity pressure.
pub const RESULT_CACHE_EVICTIONS_TOTAL: &str = "strata_result_cache_evictions_total";
/// Counter: parameterized sample requests that bypassed the cache.
pub const SAMPLE_BYPASS_TOTAL: &str = "strata_sample_bypass_total";
/// Counter: sample loads that failed in the executor.
pub const SAMPLE_LOAD_FAILURES_TOTAL: &str = "strata_sample_load_failures_total";
/// Counter: lineage closure walks, labelled by direction.
pub const LINEAGE_WALKS_TOTAL: &str = "strata_lineage_walks_total";
/// Histogram: edges discovered per closure walk, labelled by direction.
pub const LINEAGE_WALK_EDGES: &str = "strata_lineage_walk_edges";
/// Histogram: wall-clock seconds per closure walk, labelled by direction.
pub const LINEAGE_WALK_DURATION_SECONDS: &str = "strata_lineage_walk_duration_seconds";

/// Registers descriptions for all catalog metrics with the installed
/// recorder. Optional, but exporters surface the help text.
pub fn register_metrics() {
    describe_counter!(
        RESULT_CACHE_HITS_TOTAL,
        "Cache lookups served from a fresh entry"
    );
    describe_counter!(
        RESULT_CACHE_MISSES_TOTAL,
        "Cache lookups that found nothing or only an expired entry"
    );
    describe_counter!(
        RESULT_CACHE_EVICTIONS_TOTAL,
        "Cache entries displaced by capacity pressure"
    );
    describe_counter!(
        SAMPLE_BYPASS_TOTAL,
        "Parameterized sample requests that bypassed the cache"
    );
    describe_counter!(
        SAMPLE_LOAD_FAILURES_TOTAL,
        "Sample loads that failed in the executor"
    );
    describe_counter!(LINEAGE_WALKS_TOTAL, "Lineage closure walks");
    describe_histogram!(LINEAGE_WALK_EDGES, "Edges discovered per closure walk");
    describe_histogram!(
        LINEAGE_WALK_DURATION_SECONDS,
        "Wall-clock duration of closure walks in seconds"
    );
}

pub(crate) fn record_cache_hit() {
    counter!(RESULT_CACHE_HITS_TOTAL).increment(1);
}

pub(crate) fn record_cache_miss() {
    counter!(RESULT_CACHE_MISSES_TOTAL).increment(1);
}

pub(crate) fn record_cache_eviction() {
    counter!(RESULT_CACHE_EVICTIONS_TOTAL).increment(1);
}

pub(crate) fn record_sample_bypass() {
    counter!(SAMPLE_BYPASS_TOTAL).increment(1);
}

pub(crate) fn record_sample_load_failure() {
    counter!(SAMPLE_LOAD_FAILURES_TOTAL).increment(1);
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn record_lineage_walk(direction: EdgeDirection, edges: usize, elapsed: Duration) {
    let labels = [("direction", direction.as_str().to_string())];
    counter!(LINEAGE_WALKS_TOTAL, &labels).increment(1);
    histogram!(LINEAGE_WALK_EDGES, &labels).record(edges as f64);
    histogram!(LINEAGE_WALK_DURATION_SECONDS, &labels).record(elapsed.as_secs_f64());
}
