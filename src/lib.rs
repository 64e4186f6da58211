//! Collection Typegen
//!
//! Generates TypeScript artifacts from a backend's collection metadata:
//!
//! - **Type declarations** (`tsSchema.ts`): one interface per collection,
//!   optional per-field option tables, and a `Schema` map of forward and back
//!   relations for relation-aware query builders
//! - **Validators** (`zodSchema.ts`): one zod object per collection mirroring
//!   the backend's own field validation rules
//!
//! ## Architecture
//!
//! ```text
//! CollectionSource ──> Vec<Collection>
//!                          │
//!            ┌─────────────┴─────────────┐
//!            ▼                           ▼
//!   codegen::typescript          codegen::zod
//!   + codegen::relations         (id-schema cache)
//!   + codegen::docs
//!            │                           │
//!            └──── codegen (assembler) ──┘
//!                          │
//!                      generator ──> write / check drift
//! ```
//!
//! Generation is pure and deterministic: the same snapshot and config always
//! produce byte-identical output.

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod generator;
pub mod schema;
pub mod source;

pub use checksum::Checksum;
pub use codegen::config::{TsSchemaConfig, ZodSchemaConfig};
pub use codegen::{generate_ts_schema, generate_zod_schema, reindent, GeneratedOutput};
pub use config::GeneratorConfig;
pub use error::{Result, SchemaError};
pub use generator::{write_artifact, Artifacts, Drift, DriftKind, Generator};
pub use schema::{Collection, CollectionKind, Field, FieldKind};
pub use source::{CollectionSource, JsonExportSource};
