//! Codegen Configuration
//!
//! One options struct per target artifact:
//! - TsSchemaConfig: type declarations + relation map
//! - ZodSchemaConfig: runtime validators
//!
//! Synthesis itself is config-free apart from these knobs; where and whether to
//! write is decided by the generator.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Collection name -> field name -> literal replacement for a json field
pub type FieldOverrides = BTreeMap<String, BTreeMap<String, String>>;

// =============================================================================
// Type Declarations
// =============================================================================

/// Options for the type-declaration artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsSchemaConfig {
    /// Write the artifact to `output_path`
    #[serde(default = "default_true")]
    pub generate_file: bool,

    /// Destination file
    #[serde(default = "default_ts_output_path")]
    pub output_path: PathBuf,

    /// Embed option tables above every field
    #[serde(default = "default_true")]
    pub include_docs: bool,

    /// Keep collections flagged `system`
    #[serde(default)]
    pub include_system_collections: bool,

    /// Lines prepended verbatim
    #[serde(default)]
    pub banner: Vec<String>,

    /// Literal TypeScript types for json fields
    #[serde(default)]
    pub overrides: FieldOverrides,
}

impl Default for TsSchemaConfig {
    fn default() -> Self {
        Self {
            generate_file: true,
            output_path: default_ts_output_path(),
            include_docs: true,
            include_system_collections: false,
            banner: Vec::new(),
            overrides: FieldOverrides::new(),
        }
    }
}

impl TsSchemaConfig {
    /// Override for a json field, if configured
    pub fn override_for(&self, collection: &str, field: &str) -> Option<&str> {
        lookup(&self.overrides, collection, field)
    }
}

// =============================================================================
// Validators
// =============================================================================

/// Options for the validator artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZodSchemaConfig {
    /// Write the artifact to `output_path`
    #[serde(default = "default_true")]
    pub generate_file: bool,

    /// Destination file
    #[serde(default = "default_zod_output_path")]
    pub output_path: PathBuf,

    /// Keep collections flagged `system`
    #[serde(default)]
    pub include_system_collections: bool,

    /// Lines prepended verbatim
    #[serde(default)]
    pub banner: Vec<String>,

    /// Import lines emitted after the zod import (for types used by overrides)
    #[serde(default)]
    pub import_statements: Vec<String>,

    /// Literal validator expressions for json fields
    #[serde(default)]
    pub overrides: FieldOverrides,
}

impl Default for ZodSchemaConfig {
    fn default() -> Self {
        Self {
            generate_file: true,
            output_path: default_zod_output_path(),
            include_system_collections: false,
            banner: Vec::new(),
            import_statements: Vec::new(),
            overrides: FieldOverrides::new(),
        }
    }
}

impl ZodSchemaConfig {
    /// Override for a json field, if configured
    pub fn override_for(&self, collection: &str, field: &str) -> Option<&str> {
        lookup(&self.overrides, collection, field)
    }
}

fn lookup<'a>(overrides: &'a FieldOverrides, collection: &str, field: &str) -> Option<&'a str> {
    overrides
        .get(collection)
        .and_then(|fields| fields.get(field))
        .map(String::as_str)
}

fn default_true() -> bool {
    true
}

fn default_ts_output_path() -> PathBuf {
    PathBuf::from("tsSchema.ts")
}

fn default_zod_output_path() -> PathBuf {
    PathBuf::from("zodSchema.ts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_lookup() {
        let mut config = TsSchemaConfig::default();
        config
            .overrides
            .entry("posts".to_string())
            .or_default()
            .insert("meta".to_string(), "{ tags: string[] }".to_string());

        assert_eq!(config.override_for("posts", "meta"), Some("{ tags: string[] }"));
        assert_eq!(config.override_for("posts", "body"), None);
        assert_eq!(config.override_for("users", "meta"), None);
    }

    #[test]
    fn test_defaults() {
        let ts = TsSchemaConfig::default();
        assert!(ts.generate_file && ts.include_docs && !ts.include_system_collections);
        let zod: ZodSchemaConfig = toml::from_str("").unwrap();
        assert_eq!(zod.output_path, PathBuf::from("zodSchema.ts"));
        assert!(zod.import_statements.is_empty());
    }
}
