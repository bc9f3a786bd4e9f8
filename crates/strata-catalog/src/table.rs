//! Table records and field schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strata_core::TableName;

use crate::taxonomy::CategoryObject;

/// Schema entry for one table field or partition parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Warehouse type name, e.g. `string` or `bigint`.
    pub data_type: String,
    /// Optional human description.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl FieldSchema {
    /// Builds a schema entry without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Catalog metadata for one table.
///
/// Records are plain data: registries hand out clones, and mutation goes
/// through the store so timestamps stay accurate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    /// Fully-qualified name.
    pub name: TableName,
    /// Optional human description.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Owning person or team.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<String>,
    /// Projected fields, in schema order.
    pub fields: Vec<FieldSchema>,
    /// Partition parameters, in schema order.
    pub parameters: Vec<FieldSchema>,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    /// Taxonomy assignments.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub categories: Vec<CategoryObject>,
    /// Number of times the table was viewed.
    pub view_count: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TableRecord {
    /// Creates an empty record for `name`.
    #[must_use]
    pub fn new(name: TableName) -> Self {
        let now = Utc::now();
        Self {
            name,
            description: None,
            owner: None,
            fields: Vec::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the projected fields.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldSchema>) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the partition parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<FieldSchema>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Names of the projected fields, in schema order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}
