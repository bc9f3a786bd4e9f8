//! Taxonomy tagging and grouped views.
//!
//! A taxonomy is a named family of categories (`Business domain`,
//! `Sensitivity`, ...); a [`CategoryObject`] attaches one category member to
//! a table. [`group_by_taxonomy`] collapses a table's assignments into one
//! group per taxonomy for display.

use serde::{Deserialize, Serialize};

/// One taxonomy assignment on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryObject {
    /// Taxonomy the category belongs to.
    pub taxonomy: String,
    /// Category within the taxonomy.
    pub category: String,
    /// Object name within the category.
    pub name: String,
}

impl CategoryObject {
    /// Builds one assignment.
    #[must_use]
    pub fn new(
        taxonomy: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            category: category.into(),
            name: name.into(),
        }
    }
}

/// Categories and objects of one taxonomy, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyGroup {
    /// Taxonomy name.
    pub taxonomy: String,
    /// Distinct category names.
    pub categories: Vec<String>,
    /// Distinct object names.
    pub objects: Vec<String>,
}

impl TaxonomyGroup {
    fn push(&mut self, object: &CategoryObject) {
        if !self.categories.contains(&object.category) {
            self.categories.push(object.category.clone());
        }
        if !self.objects.contains(&object.name) {
            self.objects.push(object.name.clone());
        }
    }
}

/// Groups category objects by taxonomy.
///
/// Taxonomies, categories, and objects all keep first-seen order with
/// duplicates dropped.
#[must_use]
pub fn group_by_taxonomy(objects: &[CategoryObject]) -> Vec<TaxonomyGroup> {
    let mut groups: Vec<TaxonomyGroup> = Vec::new();
    for object in objects {
        match groups.iter_mut().find(|g| g.taxonomy == object.taxonomy) {
            Some(group) => group.push(object),
            None => {
                let mut group = TaxonomyGroup {
                    taxonomy: object.taxonomy.clone(),
                    ..TaxonomyGroup::default()
                };
                group.push(object);
                groups.push(group);
            }
        }
    }
    groups
}
