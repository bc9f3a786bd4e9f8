//! Partition-parameter value observations.
//!
//! Partitioned tables expose their partition keys as parameters (`year`,
//! `month`, ...). Each materialized partition contributes one observed
//! value per key; the helpers here collapse those observations into the
//! grouped views the catalog serves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One observed `key = value` partition parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValue {
    /// Parameter name.
    pub key: String,
    /// Observed value.
    pub value: String,
}

impl ParameterValue {
    /// Builds one observation.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Groups distinct values per parameter key.
///
/// Keys come out sorted; values keep first-observation order with
/// duplicates dropped.
#[must_use]
pub fn distinct_values(rows: &[ParameterValue]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows {
        let values = grouped.entry(row.key.clone()).or_default();
        if !values.contains(&row.value) {
            values.push(row.value.clone());
        }
    }
    grouped
}

/// First observed value for `key`, if any.
#[must_use]
pub fn first_value<'a>(rows: &'a [ParameterValue], key: &str) -> Option<&'a str> {
    rows.iter()
        .find(|row| row.key == key)
        .map(|row| row.value.as_str())
}
