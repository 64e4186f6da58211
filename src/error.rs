//! Error types for schema generation

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema generation errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Relation field {collection}.{field} points at unknown collection id {target}")]
    UnresolvedRelation {
        collection: String,
        field: String,
        target: String,
    },

    #[error("Collection {collection} has no id field to build a relation target schema from")]
    MissingPrimaryKey { collection: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
