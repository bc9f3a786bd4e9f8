//! Fully-qualified table naming.
//!
//! Tables are addressed as `database.table`. Both segments follow the
//! warehouse identifier rules: non-empty, at most [`MAX_SEGMENT_LEN`]
//! characters, starting with a lowercase letter, and containing only
//! lowercase letters, digits, and underscores. Names validate once at
//! construction; everything downstream can treat a [`TableName`] as
//! well-formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a database or table segment.
pub const MAX_SEGMENT_LEN: usize = 128;

/// Validation failures for [`TableName`] segments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableNameError {
    /// A segment was empty.
    #[error("name segment must not be empty")]
    Empty,

    /// A segment exceeded [`MAX_SEGMENT_LEN`] characters.
    #[error("name segment exceeds {MAX_SEGMENT_LEN} characters: {0}")]
    TooLong(String),

    /// A segment did not start with a lowercase letter.
    #[error("name segment must start with a lowercase letter: {0}")]
    InvalidStart(String),

    /// A segment contained a character outside `[a-z0-9_]`.
    #[error("name segment {0} contains invalid character {1:?}")]
    InvalidCharacter(String, char),

    /// A qualified name was not of the form `database.table`.
    #[error("expected `database.table`, got: {0}")]
    MalformedQualifiedName(String),
}

/// Fully-qualified table name.
///
/// Ordered and hashable so it can key maps and sort listings; the
/// `database.table` string form is the canonical rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName {
    database: String,
    name: String,
}

impl TableName {
    /// Builds a name from validated segments.
    ///
    /// # Errors
    ///
    /// Returns a [`TableNameError`] when either segment violates the
    /// identifier rules.
    pub fn new(
        database: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, TableNameError> {
        let database = database.into();
        let name = name.into();
        validate_segment(&database)?;
        validate_segment(&name)?;
        Ok(Self { database, name })
    }

    /// Parses a `database.table` string.
    ///
    /// # Errors
    ///
    /// Returns [`TableNameError::MalformedQualifiedName`] when the input
    /// does not contain exactly one dot, or a segment error otherwise.
    pub fn parse(input: &str) -> Result<Self, TableNameError> {
        let Some((database, name)) = input.split_once('.') else {
            return Err(TableNameError::MalformedQualifiedName(input.to_string()));
        };
        if name.contains('.') {
            return Err(TableNameError::MalformedQualifiedName(input.to_string()));
        }
        Self::new(database, name)
    }

    /// Database segment.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Table segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical `database.table` form.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.name)
    }
}

impl FromStr for TableName {
    type Err = TableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_segment(segment: &str) -> Result<(), TableNameError> {
    if segment.is_empty() {
        return Err(TableNameError::Empty);
    }
    if segment.len() > MAX_SEGMENT_LEN {
        return Err(TableNameError::TooLong(segment.to_string()));
    }
    let first = segment.chars().next().ok_or(TableNameError::Empty)?;
    if !first.is_ascii_lowercase() {
        return Err(TableNameError::InvalidStart(segment.to_string()));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '_')
    {
        return Err(TableNameError::InvalidCharacter(segment.to_string(), bad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        let name = TableName::new("warehouse", "orders_daily").expect("valid");
        assert_eq!(name.database(), "warehouse");
        assert_eq!(name.name(), "orders_daily");
        assert_eq!(name.qualified(), "warehouse.orders_daily");
        assert_eq!(name.to_string(), "warehouse.orders_daily");
    }

    #[test]
    fn test_parse_roundtrip() {
        let name = TableName::parse("shop.orders").expect("valid");
        assert_eq!(name, TableName::new("shop", "orders").expect("valid"));
        let parsed: TableName = "shop.orders".parse().expect("fromstr");
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert_eq!(TableName::new("", "orders"), Err(TableNameError::Empty));
        assert_eq!(TableName::new("shop", ""), Err(TableNameError::Empty));
    }

    #[test]
    fn test_uppercase_start_rejected() {
        assert_eq!(
            TableName::new("Shop", "orders"),
            Err(TableNameError::InvalidStart("Shop".to_string()))
        );
    }

    #[test]
    fn test_invalid_character_rejected() {
        assert_eq!(
            TableName::new("shop", "orders-daily"),
            Err(TableNameError::InvalidCharacter("orders-daily".to_string(), '-'))
        );
    }

    #[test]
    fn test_digit_start_rejected() {
        assert!(matches!(
            TableName::new("shop", "2024_orders"),
            Err(TableNameError::InvalidStart(_))
        ));
    }

    #[test]
    fn test_too_long_segment_rejected() {
        let long = "a".repeat(MAX_SEGMENT_LEN + 1);
        assert!(matches!(
            TableName::new(long, "orders"),
            Err(TableNameError::TooLong(_))
        ));
    }

    #[test]
    fn test_malformed_qualified_name_rejected() {
        assert!(matches!(
            TableName::parse("no_dot_here"),
            Err(TableNameError::MalformedQualifiedName(_))
        ));
        assert!(matches!(
            TableName::parse("a.b.c"),
            Err(TableNameError::MalformedQualifiedName(_))
        ));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = TableName::parse("shop.a").expect("valid");
        let b = TableName::parse("shop.b").expect("valid");
        let other_db = TableName::parse("warehouse.a").expect("valid");
        assert!(a < b);
        assert!(b < other_db);
    }
}
