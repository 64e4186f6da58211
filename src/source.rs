//! Collection Sources
//!
//! The generator consumes a fully materialized snapshot of collection
//! metadata. A source is anything that can produce one:
//!
//! - in-memory collections (tests, embedding hosts)
//! - a JSON export file, either the plain array written by the admin UI's
//!   "Export collections" or a paginated list response (`{ "items": [...] }`)

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::schema::Collection;

/// Produces the collection snapshot for one generation run
pub trait CollectionSource {
    fn list_collections(&self) -> Result<Vec<Collection>>;
}

impl CollectionSource for [Collection] {
    fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.to_vec())
    }
}

impl CollectionSource for Vec<Collection> {
    fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.clone())
    }
}

/// Collections read from a JSON export on disk
#[derive(Debug, Clone)]
pub struct JsonExportSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportShape {
    List(Vec<Collection>),
    Page { items: Vec<Collection> },
}

impl JsonExportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an export document already in memory
    pub fn parse(json: &str) -> Result<Vec<Collection>> {
        let collections = match serde_json::from_str(json)? {
            ExportShape::List(collections) => collections,
            ExportShape::Page { items } => items,
        };
        Ok(collections)
    }
}

impl CollectionSource for JsonExportSource {
    fn list_collections(&self) -> Result<Vec<Collection>> {
        let json = std::fs::read_to_string(&self.path)?;
        let collections = Self::parse(&json)?;
        tracing::debug!(
            path = %self.path.display(),
            count = collections.len(),
            "loaded collection export"
        );
        Ok(collections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    const EXPORT: &str = r#"[
        {
            "id": "pbc_1",
            "name": "posts",
            "type": "base",
            "system": false,
            "fields": [
                { "name": "title", "type": "text", "required": true, "min": 0, "max": 0, "pattern": "" }
            ],
            "indexes": []
        }
    ]"#;

    #[test]
    fn test_parse_array_export() {
        let collections = JsonExportSource::parse(EXPORT).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "posts");
        assert!(collections[0].fields[0].required);
    }

    #[test]
    fn test_parse_paginated_response() {
        let page = format!(r#"{{ "page": 1, "perPage": 30, "items": {} }}"#, EXPORT);
        let collections = JsonExportSource::parse(&page).unwrap();
        assert_eq!(collections[0].id, "pbc_1");
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collections.json");
        std::fs::write(&path, EXPORT).unwrap();

        let source = JsonExportSource::new(&path);
        assert_eq!(source.list_collections().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = JsonExportSource::new("/nonexistent/collections.json");
        assert!(matches!(source.list_collections(), Err(SchemaError::Io(_))));
    }

    #[test]
    fn test_in_memory_source() {
        let collections = vec![Collection::new("1", "a")];
        assert_eq!(collections.list_collections().unwrap().len(), 1);
        assert_eq!(collections.as_slice().list_collections().unwrap().len(), 1);
    }
}
