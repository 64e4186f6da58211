//! Zod Emitter
//!
//! Renders one `z.object({...})` validator per collection. The per-kind rules
//! mirror the host's own record validation:
//!
//! - numeric limits of 0 and empty strings mean "unset" and never become
//!   constraints, except number bounds where 0 is real
//! - `required` on a number means non-zero, on a bool means `true`, on a
//!   geoPoint means not `(0, 0)`
//! - multi-valued select/file/relation fields become arrays, non-empty when
//!   required
//!
//! Relation fields validate against the target collection's id rules, taken
//! from a per-run cache keyed by collection id.

use std::collections::HashMap;

use super::config::ZodSchemaConfig;
use super::format_number;
use super::names::to_camel_case;
use crate::error::{Result, SchemaError};
use crate::schema::{
    Collection, DateOptions, DomainOptions, Field, FieldKind, NumberOptions, SelectOptions,
    TextOptions,
};

/// Datetime format of the host's date and autodate values
pub const DATETIME_REGEX: &str = r"/^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(\.\d+)?Z$/";

/// Max length applied to password fields without a configured max
pub const PASSWORD_DEFAULT_MAX: u32 = 71;

const ZOD_IMPORT: &str = "import { z } from 'zod'";

// =============================================================================
// Field Handlers
// =============================================================================

/// Per-field inputs that come from outside the field itself
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorContext<'a> {
    /// Id validator of the collection a relation field points at
    pub target_id_schema: Option<&'a str>,
    /// Literal validator replacing `z.unknown()` for a json field
    pub json_override: Option<&'a str>,
}

/// Render a field as `name: <validator>` (without `.optional()`)
pub fn field_schema(field: &Field, ctx: &ValidatorContext<'_>) -> String {
    format!("{}: {}", field.name, field_validator(field, ctx))
}

/// The validator expression of a field
pub fn field_validator(field: &Field, ctx: &ValidatorContext<'_>) -> String {
    let required = field.required;
    let multiple = field.is_multiple();

    match &field.kind {
        FieldKind::Text(opts) => text_validator(opts, required),
        FieldKind::Password(opts) => {
            let max = if opts.max > 0 { opts.max } else { PASSWORD_DEFAULT_MAX };
            let rules = TextOptions {
                min: opts.min,
                max,
                pattern: opts.pattern.clone(),
                ..Default::default()
            };
            text_validator(&rules, required)
        }
        FieldKind::Editor(_) => {
            if required {
                "z.string().min(1)".to_string()
            } else {
                "z.string()".to_string()
            }
        }
        FieldKind::Number(opts) => number_validator(opts, required),
        FieldKind::Bool => {
            if required {
                "z.literal(true)".to_string()
            } else {
                "z.boolean()".to_string()
            }
        }
        FieldKind::Email(opts) => email_validator(opts),
        FieldKind::Url(opts) => url_validator(opts),
        FieldKind::Date(opts) => date_validator(opts),
        FieldKind::Autodate(_) => "z.string().regex(DATETIME_REGEX)".to_string(),
        FieldKind::Select(opts) => {
            let base = enum_validator(opts);
            with_cardinality(base, multiple, required, 0, opts.max_select)
        }
        FieldKind::File(opts) => {
            with_cardinality("z.string()".to_string(), multiple, required, 0, opts.max_select)
        }
        FieldKind::Relation(opts) => {
            let base = ctx.target_id_schema.unwrap_or("z.string()").to_string();
            with_cardinality(base, multiple, required, opts.min_select, opts.max_select)
        }
        FieldKind::Json(_) => ctx.json_override.unwrap_or("z.unknown()").to_string(),
        FieldKind::GeoPoint => {
            let mut schema = "z.object({ lon: z.number(), lat: z.number() })".to_string();
            if required {
                schema.push_str(".refine(({ lon, lat }) => !(lon === 0 && lat === 0))");
            }
            schema
        }
    }
}

/// String rules shared by text and password fields
pub fn text_validator(opts: &TextOptions, required: bool) -> String {
    let mut schema = "z.string()".to_string();

    if !opts.pattern.is_empty() {
        schema.push_str(&format!(".regex({})", regex_literal(&opts.pattern)));
    }

    if opts.min > 0 && opts.min == opts.max {
        schema.push_str(&format!(".length({})", opts.min));
    } else {
        if opts.min > 0 {
            schema.push_str(&format!(".min({})", opts.min));
        } else if required {
            schema.push_str(".min(1)");
        }
        if opts.max > 0 {
            schema.push_str(&format!(".max({})", opts.max));
        }
    }

    schema
}

fn number_validator(opts: &NumberOptions, required: bool) -> String {
    let mut schema = "z.number()".to_string();
    if opts.only_int {
        schema.push_str(".int()");
    }
    if let Some(min) = opts.min {
        schema.push_str(&format!(".min({})", format_number(min)));
    }
    if let Some(max) = opts.max {
        schema.push_str(&format!(".max({})", format_number(max)));
    }
    // required means non-zero
    if required {
        schema.push_str(".refine((n) => n !== 0)");
    }
    schema
}

fn email_validator(opts: &DomainOptions) -> String {
    let mut schema = "z.string().email()".to_string();
    if !opts.only_domains.is_empty() {
        schema.push_str(&format!(
            ".refine((v) => {}.includes(v.split('@')[1]))",
            string_array(&opts.only_domains)
        ));
    } else if !opts.except_domains.is_empty() {
        schema.push_str(&format!(
            ".refine((v) => !{}.includes(v.split('@')[1]))",
            string_array(&opts.except_domains)
        ));
    }
    schema
}

fn url_validator(opts: &DomainOptions) -> String {
    let mut schema = "z.string().url()".to_string();
    if !opts.only_domains.is_empty() {
        schema.push_str(&format!(
            ".refine((v) => {}.some((domain) => v.includes(domain)))",
            string_array(&opts.only_domains)
        ));
    } else if !opts.except_domains.is_empty() {
        schema.push_str(&format!(
            ".refine((v) => {}.every((domain) => !v.includes(domain)))",
            string_array(&opts.except_domains)
        ));
    }
    schema
}

fn date_validator(opts: &DateOptions) -> String {
    let mut schema = "z.string().regex(DATETIME_REGEX)".to_string();
    if opts.min.is_empty() && opts.max.is_empty() {
        return schema;
    }

    let mut body = vec!["const date = new Date(v)".to_string()];
    let mut conditions = Vec::new();
    if !opts.min.is_empty() {
        body.push(format!("const minDate = new Date('{}')", opts.min));
        conditions.push("date >= minDate");
    }
    if !opts.max.is_empty() {
        body.push(format!("const maxDate = new Date('{}')", opts.max));
        conditions.push("date <= maxDate");
    }
    body.push(format!("return {}", conditions.join(" && ")));

    schema.push_str(".refine((v) => {\n");
    for line in body {
        schema.push_str("        ");
        schema.push_str(&line);
        schema.push('\n');
    }
    schema.push_str("    })");
    schema
}

fn enum_validator(opts: &SelectOptions) -> String {
    format!("z.enum({})", string_array(&opts.values))
}

/// `.array()` with non-empty/min/max refinements for multi-valued fields
fn with_cardinality(
    mut schema: String,
    multiple: bool,
    required: bool,
    min_select: u32,
    max_select: u32,
) -> String {
    if !multiple {
        return schema;
    }
    schema.push_str(".array()");
    if required {
        schema.push_str(".nonempty()");
    }
    if min_select > 0 {
        schema.push_str(&format!(".min({})", min_select));
    }
    if max_select > 0 {
        schema.push_str(&format!(".max({})", max_select));
    }
    schema
}

/// `["a", "b"]` with JSON string escaping
fn string_array(values: &[String]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| serde_json::Value::String(v.clone()).to_string())
        .collect();
    format!("[{}]", items.join(", "))
}

/// `/pattern/` with unescaped slashes escaped
fn regex_literal(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('/');
    let mut escaped = false;
    for c in pattern.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out.push('/');
    out
}

// =============================================================================
// Validator Synthesis
// =============================================================================

/// Id validator per collection id, built from each collection's primary key
pub fn id_schema_cache(collections: &[Collection]) -> HashMap<&str, String> {
    collections
        .iter()
        .filter_map(|c| {
            c.primary_key()
                .map(|(field, opts)| (c.id.as_str(), text_validator(opts, field.required)))
        })
        .collect()
}

/// Render the validator artifact body (imports, shared regex, one object per collection)
pub fn render_validators(
    collections: &[Collection],
    include: impl Fn(&Collection) -> bool,
    config: &ZodSchemaConfig,
) -> Result<String> {
    let id_schemas = id_schema_cache(collections);
    let known_ids: HashMap<&str, &str> = collections
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut uses_datetime = false;
    let mut objects = String::new();

    for collection in collections.iter().filter(|c| include(*c)) {
        tracing::debug!(collection = %collection.name, "synthesizing validator");
        uses_datetime |= collection.has_datetime_fields();

        objects.push_str(&format!(
            "export const {}Schema = z.object({{\n",
            to_camel_case(&collection.name)
        ));

        for field in &collection.fields {
            let target_id_schema = match &field.kind {
                FieldKind::Relation(opts) => {
                    let target = opts.collection_id.as_str();
                    let schema = id_schemas.get(target).ok_or_else(|| match known_ids.get(target) {
                        Some(name) => SchemaError::MissingPrimaryKey {
                            collection: name.to_string(),
                        },
                        None => SchemaError::UnresolvedRelation {
                            collection: collection.name.clone(),
                            field: field.name.clone(),
                            target: opts.collection_id.clone(),
                        },
                    })?;
                    Some(schema.as_str())
                }
                _ => None,
            };

            let ctx = ValidatorContext {
                target_id_schema,
                json_override: config.override_for(&collection.name, &field.name),
            };

            // autogenerated values may be left out by the caller even when required
            let optional = !field.required || field.autogenerate_pattern().is_some();

            objects.push_str("    ");
            objects.push_str(&field_schema(field, &ctx));
            if optional {
                objects.push_str(".optional()");
            }
            objects.push_str(",\n");
        }

        objects.push_str("})\n\n");
    }

    let mut output = String::new();
    output.push_str(ZOD_IMPORT);
    output.push('\n');
    for statement in &config.import_statements {
        output.push_str(statement);
        output.push('\n');
    }
    output.push('\n');

    if uses_datetime {
        output.push_str(&format!("const DATETIME_REGEX = {}\n\n", DATETIME_REGEX));
    }

    output.push_str(&objects);
    Ok(output)
}
