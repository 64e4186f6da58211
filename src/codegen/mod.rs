//! Code Generation
//!
//! Turns a collection snapshot into two TypeScript artifacts.
//!
//! Architecture:
//! - Field handlers: one pure function per field kind and target (`typescript`,
//!   `zod`, `docs`), each an exhaustive match over `FieldKind`
//! - Synthesizers: per-collection iteration in snapshot order (`typescript`,
//!   `zod`), with relations resolved once up front (`relations`)
//! - Assembler (this module): banners, concatenation, indentation
//!
//! Synthesis never touches the filesystem; `crate::generator` decides what to
//! write where.

pub mod config;
pub mod docs;
pub mod names;
pub mod relations;
pub mod typescript;
pub mod zod;

use crate::error::Result;
use crate::schema::Collection;

use self::config::{TsSchemaConfig, ZodSchemaConfig};
use self::relations::RelationMap;

const INDENT: &str = "    ";

/// Output from code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Generated code as a string
    pub code: String,
    /// Number of collections rendered
    pub collection_count: usize,
}

// =============================================================================
// Public API
// =============================================================================

/// Generate the type-declaration artifact: one interface per collection plus
/// the `Schema` relation map
pub fn generate_ts_schema(
    collections: &[Collection],
    config: &TsSchemaConfig,
) -> Result<GeneratedOutput> {
    let include = |c: &Collection| config.include_system_collections || !c.system;

    let relations = RelationMap::build(collections, include)?;
    let mut body = typescript::render_interfaces(collections, include, config)?;
    body.push_str(&typescript::render_schema_map(&relations));

    let mut code = banner(&config.banner);
    code.push_str(&reindent(&body));

    Ok(GeneratedOutput {
        code,
        collection_count: relations.len(),
    })
}

/// Generate the validator artifact: one zod object per collection
pub fn generate_zod_schema(
    collections: &[Collection],
    config: &ZodSchemaConfig,
) -> Result<GeneratedOutput> {
    let include = |c: &Collection| config.include_system_collections || !c.system;

    let body = zod::render_validators(collections, include, config)?;

    let mut code = banner(&config.banner);
    code.push_str(body.trim_end());
    code.push('\n');

    Ok(GeneratedOutput {
        code,
        collection_count: collections.iter().filter(|c| include(*c)).count(),
    })
}

fn banner(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    if !lines.is_empty() {
        out.push('\n');
    }
    out
}

// =============================================================================
// Formatting
// =============================================================================

/// Re-indent brace-nested text with four spaces per level.
///
/// Depth drops before a line ending in `}` and rises after a line ending in
/// `{`, counting only lines whose braces are unbalanced. Existing leading
/// whitespace is discarded; doc-comment continuation lines (`* ...`) keep their
/// one-space offset under `/**`. Blank lines stay empty and the result ends with
/// a single newline. Text without any newline is returned as-is.
pub fn reindent(code: &str) -> String {
    if !code.contains('\n') {
        return code.to_string();
    }

    let mut out = String::with_capacity(code.len() + code.len() / 4);
    let mut depth: usize = 0;

    for line in code.trim_end().lines() {
        let line = line.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }

        let opens = line.matches('{').count();
        let closes = line.matches('}').count();

        if line.ends_with('}') && closes > opens {
            depth = depth.saturating_sub(closes - opens);
        }

        for _ in 0..depth {
            out.push_str(INDENT);
        }
        if line.starts_with('*') {
            out.push(' ');
        }
        out.push_str(line);
        out.push('\n');

        if line.ends_with('{') && opens > closes {
            depth += opens - closes;
        }
    }

    out
}

/// Numbers as JavaScript prints them (`5`, not `5.0`; `1e+21`, not 22 digits)
pub(crate) fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let sci = format!("{:e}", n);
        return match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => sci,
        };
    }

    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind, RelationOptions, TextOptions};

    #[test]
    fn test_reindent_nesting() {
        let input = "export type Schema = {\nposts: {\ntype: Posts\n}\n}\n";
        let expected = "export type Schema = {\n    posts: {\n        type: Posts\n    }\n}\n";
        assert_eq!(reindent(input), expected);
    }

    #[test]
    fn test_reindent_balanced_lines_keep_depth() {
        let input = "export interface A {\ngeo: { lon: number; lat: number }\nname: string\n}\n";
        let expected =
            "export interface A {\n    geo: { lon: number; lat: number }\n    name: string\n}\n";
        assert_eq!(reindent(input), expected);
    }

    #[test]
    fn test_reindent_doc_comments_and_blank_lines() {
        let input = "export interface A {\n/**\n * | x |\n */\nx: string\n\n}\n\n\n";
        let expected = "export interface A {\n    /**\n     * | x |\n     */\n    x: string\n\n}\n";
        assert_eq!(reindent(input), expected);
    }

    #[test]
    fn test_reindent_is_idempotent() {
        let input = "a {\n      b {\n c\n}\n   }\n";
        let once = reindent(input);
        assert_eq!(once, "a {\n    b {\n        c\n    }\n}\n");
        assert_eq!(reindent(&once), once);
    }

    #[test]
    fn test_reindent_single_line_untouched() {
        assert_eq!(reindent("  x: string  "), "  x: string  ");
        assert_eq!(reindent(""), "");
    }

    #[test]
    fn test_reindent_never_underflows() {
        assert_eq!(reindent("}\n}\nx\n"), "}\n}\nx\n");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_format_number_large_and_tiny() {
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e21), "-1.5e+21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(9007199254740993.0), "9007199254740992");
    }

    fn snapshot() -> Vec<Collection> {
        let id = Field::new(
            "id",
            FieldKind::Text(TextOptions {
                min: 15,
                max: 15,
                autogenerate_pattern: "[a-z0-9]{15}".into(),
                primary_key: true,
                ..Default::default()
            }),
        )
        .required();

        vec![
            Collection::new("s1", "_superusers").system().with_field(id.clone()),
            Collection::new("u1", "users").with_field(id.clone()),
            Collection::new("p1", "posts").with_field(id).with_field(Field::new(
                "author",
                FieldKind::Relation(RelationOptions {
                    collection_id: "u1".into(),
                    max_select: 1,
                    ..Default::default()
                }),
            )),
        ]
    }

    #[test]
    fn test_generate_ts_schema() {
        let config = TsSchemaConfig {
            include_docs: false,
            banner: vec!["// generated".to_string()],
            ..Default::default()
        };
        let out = generate_ts_schema(&snapshot(), &config).unwrap();

        assert_eq!(out.collection_count, 2);
        assert!(out.code.starts_with("// generated\n\n"));
        assert!(!out.code.contains("Superusers"));
        assert!(out.code.contains("export interface Posts {\n    id: string\n    author: string\n"));
        assert!(out.code.contains("    posts: {\n        type: Posts\n        relations: {\n            author?: Users\n"));
        assert!(out.code.contains("            // posts_via_author?: Posts[]\n"));
        assert!(out.code.ends_with("}\n"));
        assert!(!out.code.ends_with("\n\n"));
    }

    #[test]
    fn test_generate_ts_schema_with_system_collections() {
        let config = TsSchemaConfig {
            include_system_collections: true,
            ..Default::default()
        };
        let out = generate_ts_schema(&snapshot(), &config).unwrap();
        assert_eq!(out.collection_count, 3);
        assert!(out.code.contains("export interface Superusers {"));
    }

    #[test]
    fn test_generate_zod_schema() {
        let out = generate_zod_schema(&snapshot(), &ZodSchemaConfig::default()).unwrap();
        assert_eq!(out.collection_count, 2);
        assert!(out.code.starts_with("import { z } from 'zod'\n\n"));
        assert!(out.code.contains("export const postsSchema = z.object({\n"));
        assert!(out.code.contains("    author: z.string().length(15).optional(),\n"));
        assert!(out.code.ends_with("})\n"));
    }
}
