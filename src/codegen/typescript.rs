//! TypeScript Emitter
//!
//! Renders collections as `export interface` blocks followed by a `Schema`
//! type mapping every collection to its interface and relations.
//!
//! Two collections whose field signatures (`name: type` lines) are set-equal
//! would be interchangeable to a structurally-typed consumer. Every member of
//! such a group gets a `unique symbol` marker property, and the symbol's
//! declaration is hoisted once to the top of the output.
//!
//! Text is emitted flat; the assembler re-indents it afterwards.

use std::collections::{BTreeSet, HashMap};

use super::config::TsSchemaConfig;
use super::docs::{doc_rows, render_table};
use super::names::to_pascal_case;
use super::relations::RelationMap;
use crate::error::{Result, SchemaError};
use crate::schema::{Collection, Field, FieldKind};

/// Hoisted declaration of the disambiguation symbol
pub const UNIQUE_IDENTIFIER_DECLARATION: &str = "declare const uniqueIdentifier: unique symbol";

/// Marker property appended to structurally-identical interfaces
pub const UNIQUE_IDENTIFIER_MARKER: &str = "readonly [uniqueIdentifier]: unique symbol";

const UNIQUE_IDENTIFIER_DOC: &str = "\
/**
 * This is a unique identifier to help TypeScript differentiate this interface from others sharing the same properties.
 * Refer to https://github.com/satohshi/pocketbase-ts#dealing-with-tables-with-exactly-the-same-properties for more information.
 */";

const SCHEMA_MAP_DOC: &str = "\
/**
 * Commented-out back-relations are what will be inferred by pocketbase-ts from the forward relations.
 *
 * The \"UNIQUE index constraint\" case is automatically handled by this generator,
 * but if you want to make a back-relation non-nullable, you can uncomment it and remove the \"?\".
 *
 * See [here](https://github.com/satohshi/pocketbase-ts#back-relations) for more information.
 */";

// =============================================================================
// Field Handlers
// =============================================================================

/// Per-field inputs that come from outside the field itself
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldContext<'a> {
    /// Render the doc table
    pub include_docs: bool,
    /// Name of the collection a relation field points at
    pub relation_target: Option<&'a str>,
    /// Literal type replacing `any` for a json field
    pub json_override: Option<&'a str>,
}

/// Render a field as `(name: type, doc block)`; the doc block is empty when docs are off
pub fn field_schema(field: &Field, ctx: &FieldContext<'_>) -> (String, String) {
    let type_def = format!("{}: {}", field.name, field_type(field, ctx.json_override));
    if !ctx.include_docs {
        return (type_def, String::new());
    }
    let docs = render_table(&doc_rows(field, ctx.relation_target));
    (type_def, docs)
}

/// The TypeScript type of a field
pub fn field_type(field: &Field, json_override: Option<&str>) -> String {
    match &field.kind {
        FieldKind::Text(_)
        | FieldKind::Password(_)
        | FieldKind::Editor(_)
        | FieldKind::Email(_)
        | FieldKind::Url(_)
        | FieldKind::Date(_)
        | FieldKind::Autodate(_) => "string".to_string(),
        FieldKind::Number(_) => "number".to_string(),
        FieldKind::Bool => {
            if field.required {
                "true".to_string()
            } else {
                "boolean".to_string()
            }
        }
        FieldKind::Select(opts) => {
            let union = if opts.values.is_empty() {
                "string".to_string()
            } else {
                opts.values.iter().map(|v| quote_literal(v)).collect::<Vec<_>>().join(" | ")
            };
            cardinality(&union, true, field.is_multiple(), field.required)
        }
        FieldKind::File(_) | FieldKind::Relation(_) => {
            cardinality("string", false, field.is_multiple(), field.required)
        }
        FieldKind::Json(_) => json_override.unwrap_or("any").to_string(),
        FieldKind::GeoPoint => "{ lon: number; lat: number }".to_string(),
    }
}

/// Single -> bare, multiple+required -> non-empty tuple, multiple+optional -> array
fn cardinality(element: &str, union: bool, multiple: bool, required: bool) -> String {
    if !multiple {
        return element.to_string();
    }
    let grouped = if union {
        format!("({})", element)
    } else {
        element.to_string()
    };
    if required {
        format!("[{}, ...{}[]]", element, grouped)
    } else {
        format!("{}[]", grouped)
    }
}

/// Single-quoted string literal type with `\` and `'` escaped
fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

// =============================================================================
// Interface Synthesis
// =============================================================================

/// One rendered interface before disambiguation
struct Interface {
    name: String,
    body: String,
    signatures: BTreeSet<String>,
}

/// Render the interface section for the included collections.
///
/// `collections` is the whole snapshot so relation docs can name targets
/// that are filtered out.
pub fn render_interfaces(
    collections: &[Collection],
    include: impl Fn(&Collection) -> bool,
    config: &TsSchemaConfig,
) -> Result<String> {
    let id_to_name: HashMap<&str, &str> = collections
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut interfaces = Vec::new();
    for collection in collections.iter().filter(|c| include(*c)) {
        tracing::debug!(collection = %collection.name, "synthesizing interface");

        let mut body = String::new();
        let mut signatures = BTreeSet::new();

        for field in &collection.fields {
            let relation_target = match &field.kind {
                FieldKind::Relation(opts) => Some(
                    id_to_name
                        .get(opts.collection_id.as_str())
                        .copied()
                        .ok_or_else(|| SchemaError::UnresolvedRelation {
                            collection: collection.name.clone(),
                            field: field.name.clone(),
                            target: opts.collection_id.clone(),
                        })?,
                ),
                _ => None,
            };

            let ctx = FieldContext {
                include_docs: config.include_docs,
                relation_target,
                json_override: config.override_for(&collection.name, &field.name),
            };
            let (type_def, docs) = field_schema(field, &ctx);

            if !docs.is_empty() {
                body.push_str(&docs);
                body.push('\n');
            }
            body.push_str(&type_def);
            body.push('\n');

            signatures.insert(type_def);
        }

        interfaces.push(Interface {
            name: to_pascal_case(&collection.name),
            body,
            signatures,
        });
    }

    let needs_marker: Vec<bool> = interfaces
        .iter()
        .enumerate()
        .map(|(i, iface)| {
            interfaces
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other.signatures == iface.signatures)
        })
        .collect();

    let mut output = String::new();
    if needs_marker.iter().any(|m| *m) {
        output.push_str(UNIQUE_IDENTIFIER_DECLARATION);
        output.push_str("\n\n");
    }

    for (iface, marker) in interfaces.iter().zip(needs_marker) {
        output.push_str(&format!("export interface {} {{\n", iface.name));
        output.push_str(&iface.body);
        if marker {
            output.push('\n');
            output.push_str(UNIQUE_IDENTIFIER_DOC);
            output.push('\n');
            output.push_str(UNIQUE_IDENTIFIER_MARKER);
            output.push('\n');
        }
        output.push_str("}\n\n");
    }

    Ok(output)
}

/// Render the `Schema` type from a resolved relation map
pub fn render_schema_map(relations: &RelationMap) -> String {
    let mut output = String::new();
    output.push_str(SCHEMA_MAP_DOC);
    output.push('\n');
    output.push_str("export type Schema = {\n");

    for (collection, refs) in relations.iter() {
        output.push_str(&format!("{}: {{\n", collection));
        output.push_str(&format!("type: {}\n", to_pascal_case(collection)));

        if !refs.is_empty() {
            output.push_str("relations: {\n");
            for relation in refs {
                output.push_str(&relation.to_string());
                output.push('\n');
            }
            output.push_str("}\n");
        }

        output.push_str("}\n");
    }

    output.push_str("}\n");
    output
}
