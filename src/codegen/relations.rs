//! Relation Resolver
//!
//! Derives, per collection, the relation references that the schema map at
//! the end of the type-declaration artifact lists:
//!
//! - **Forward**: `author?: Users` on the collection owning the relation field
//! - **Back**: `posts_via_author?: Posts` on the target collection
//!
//! A back relation is singular only when the owner has a single-column UNIQUE
//! index on the relation column. Otherwise it would be an array, which a
//! relation-aware query layer infers on its own, so it is emitted commented out.
//!
//! Entries keep insertion order (collection order, then field order); that
//! order is the output order.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use super::names::to_pascal_case;
use crate::error::{Result, SchemaError};
use crate::schema::{Collection, FieldKind};

// =============================================================================
// Relation Reference
// =============================================================================

/// One line of a collection's `relations` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef {
    /// Property name (`author` or `posts_via_author`)
    pub name: String,
    /// Rendered with `?`
    pub optional: bool,
    /// Target type identifier
    pub target: String,
    /// Rendered with `[]`
    pub array: bool,
    /// Rendered behind `// `
    pub commented: bool,
}

impl RelationRef {
    fn forward(name: &str, required: bool, target_name: &str, multiple: bool) -> Self {
        Self {
            name: name.to_string(),
            optional: !required,
            target: to_pascal_case(target_name),
            array: multiple,
            commented: false,
        }
    }

    fn back(owner_name: &str, field_name: &str, unique: bool) -> Self {
        Self {
            name: format!("{}_via_{}", owner_name, field_name),
            optional: true,
            target: to_pascal_case(owner_name),
            array: !unique,
            commented: !unique,
        }
    }
}

impl fmt::Display for RelationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}: {}{}",
            if self.commented { "// " } else { "" },
            self.name,
            if self.optional { "?" } else { "" },
            self.target,
            if self.array { "[]" } else { "" },
        )
    }
}

// =============================================================================
// Relation Map
// =============================================================================

/// Collection name -> ordered relation references
#[derive(Debug, Clone, Default)]
pub struct RelationMap {
    entries: IndexMap<String, Vec<RelationRef>>,
    unique_columns: HashMap<String, HashSet<String>>,
}

impl RelationMap {
    /// Resolve relations between the collections that `include` keeps.
    ///
    /// Relation targets are looked up across the whole snapshot; a target id
    /// missing from it is an error, while a target that exists but is filtered
    /// out is skipped.
    pub fn build(collections: &[Collection], include: impl Fn(&Collection) -> bool) -> Result<Self> {
        let by_id: HashMap<&str, &Collection> =
            collections.iter().map(|c| (c.id.as_str(), c)).collect();

        let included: Vec<&Collection> = collections.iter().filter(|c| include(*c)).collect();

        let mut map = Self::default();
        for collection in &included {
            map.entries.insert(collection.name.clone(), Vec::new());
            map.unique_columns
                .insert(collection.name.clone(), unique_index_columns(&collection.indexes));
        }

        for collection in &included {
            for field in &collection.fields {
                let FieldKind::Relation(opts) = &field.kind else {
                    continue;
                };

                let target = by_id.get(opts.collection_id.as_str()).ok_or_else(|| {
                    SchemaError::UnresolvedRelation {
                        collection: collection.name.clone(),
                        field: field.name.clone(),
                        target: opts.collection_id.clone(),
                    }
                })?;

                if !map.entries.contains_key(&target.name) {
                    tracing::warn!(
                        collection = %collection.name,
                        field = %field.name,
                        target = %target.name,
                        "relation target is excluded, leaving it out of the relation map"
                    );
                    continue;
                }

                let unique = map.has_unique_index(&collection.name, &field.name);

                let forward =
                    RelationRef::forward(&field.name, field.required, &target.name, opts.is_multiple());
                let back = RelationRef::back(&collection.name, &field.name, unique);

                if let Some(refs) = map.entries.get_mut(&collection.name) {
                    refs.push(forward);
                }
                if let Some(refs) = map.entries.get_mut(&target.name) {
                    refs.push(back);
                }
            }
        }

        Ok(map)
    }

    /// Relation references of a collection
    pub fn get(&self, collection_name: &str) -> Option<&[RelationRef]> {
        self.entries.get(collection_name).map(Vec::as_slice)
    }

    /// Whether `column` of `collection_name` carries a single-column UNIQUE index
    pub fn has_unique_index(&self, collection_name: &str, column: &str) -> bool {
        self.unique_columns
            .get(collection_name)
            .map(|cols| cols.contains(column))
            .unwrap_or(false)
    }

    /// Entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RelationRef])> {
        self.entries.iter().map(|(name, refs)| (name.as_str(), refs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unique Index Detection
// =============================================================================

fn unique_index_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // trailing sort order or collation after the column is allowed
        Regex::new(r"^CREATE UNIQUE.+?\(\s*`?([^`\s),]+)`?[^),]*\)").expect("valid unique index pattern")
    })
}

/// Columns covered by single-column UNIQUE indexes.
///
/// Multi-column indexes are skipped, and so is any definition that does not
/// match the expected shape; both leave the back relation array-typed.
pub fn unique_index_columns(indexes: &[String]) -> HashSet<String> {
    indexes
        .iter()
        .filter(|index| index.contains("UNIQUE") && !index.contains(','))
        .filter_map(|index| {
            let column = unique_index_regex()
                .captures(index)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            if column.is_none() {
                tracing::debug!(index = %index, "unrecognized unique index definition");
            }
            column
        })
        .collect()
}
