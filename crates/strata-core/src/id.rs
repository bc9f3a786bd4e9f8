//! Strongly-typed identifiers.
//!
//! Identifiers are ULIDs: unique without coordination, lexicographically
//! sortable, and carrying their creation time in the leading bits. Each
//! entity kind gets its own newtype so ids cannot be mixed up at call
//! sites.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Identifier for a lineage edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(Ulid);

impl EdgeId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Wraps an existing ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// Returns the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> Ulid {
        self.0
    }

    /// Timestamp embedded in the identifier, when representable.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(i64::try_from(self.0.timestamp_ms()).ok()?)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EdgeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|err| Error::invalid_id(format!("{s:?}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_roundtrip() {
        let id = EdgeId::generate();
        let parsed: EdgeId = id.to_string().parse().expect("roundtrip");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_edge_ids_are_unique() {
        let first = EdgeId::generate();
        let second = EdgeId::generate();
        assert_ne!(first, second);
    }

    #[test]
    fn test_edge_ids_order_by_timestamp() {
        // The random suffix must not outweigh the timestamp bits.
        let earlier = EdgeId::from_ulid(Ulid::from_parts(1_000, u128::MAX));
        let later = EdgeId::from_ulid(Ulid::from_parts(2_000, 0));
        assert!(earlier < later);
        assert!(earlier.to_string() < later.to_string());
    }

    #[test]
    fn test_edge_id_carries_timestamp() {
        let id = EdgeId::generate();
        let created = id.created_at().expect("recent ulid");
        let age = Utc::now().signed_duration_since(created);
        assert!(age.num_seconds().abs() < 60);
    }

    #[test]
    fn test_invalid_edge_id_rejected() {
        let err = "definitely-not-a-ulid".parse::<EdgeId>().unwrap_err();
        assert!(err.to_string().contains("invalid id"));
    }

    #[test]
    fn test_edge_id_serializes_transparently() {
        let id = EdgeId::generate();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{id}\""));
    }
}
