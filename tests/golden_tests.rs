//! Golden Tests for Generated Artifacts
//!
//! Runs both synthesizers over a realistic collection export and checks the
//! exact text of the parts downstream tooling depends on.

use collection_typegen::codegen::typescript::UNIQUE_IDENTIFIER_MARKER;
use collection_typegen::{
    generate_ts_schema, generate_zod_schema, Collection, DriftKind, Generator, GeneratorConfig,
    JsonExportSource, SchemaError, TsSchemaConfig, ZodSchemaConfig,
};

fn fixture() -> Vec<Collection> {
    JsonExportSource::parse(include_str!("fixtures/collections.json")).unwrap()
}

fn ts_without_docs() -> String {
    let config = TsSchemaConfig {
        include_docs: false,
        ..Default::default()
    };
    generate_ts_schema(&fixture(), &config).unwrap().code
}

fn zod() -> String {
    generate_zod_schema(&fixture(), &ZodSchemaConfig::default()).unwrap().code
}

// =============================================================================
// Type Declarations
// =============================================================================

#[test]
fn test_fixture_parses() {
    let collections = fixture();
    assert_eq!(collections.len(), 7);
    assert!(collections[0].system);
    assert_eq!(collections[2].fields.len(), 14);
}

#[test]
fn test_users_interface() {
    let ts = ts_without_docs();
    let expected = "\
export interface Users {
    id: string
    password: string
    tokenKey: string
    email: string
    emailVisibility: boolean
    verified: boolean
    name: string
    avatar: string
    created: string
    updated: string
}
";
    assert!(ts.contains(expected), "{}", ts);
}

#[test]
fn test_posts_interface() {
    let ts = ts_without_docs();
    let expected = "\
export interface Posts {
    id: string
    title: string
    slug: string
    body: string
    status: 'draft' | 'published'
    tags: ('news' | 'tech' | 'life')[]
    author: string
    attachments: string[]
    published_at: string
    views: number
    location: { lon: number; lat: number }
    meta: any
    website: string
    created: string
}
";
    assert!(ts.contains(expected), "{}", ts);
}

#[test]
fn test_system_collections_excluded_by_default() {
    let ts = ts_without_docs();
    assert!(!ts.contains("Superusers"));

    let config = TsSchemaConfig {
        include_docs: false,
        include_system_collections: true,
        ..Default::default()
    };
    let out = generate_ts_schema(&fixture(), &config).unwrap();
    assert_eq!(out.collection_count, 7);
    assert!(out.code.contains("export interface Superusers {"));
    assert!(out.code.contains("    _superusers: {\n        type: Superusers\n    }\n"));
}

#[test]
fn test_identical_collections_are_disambiguated() {
    let ts = ts_without_docs();
    assert!(ts.starts_with("declare const uniqueIdentifier: unique symbol\n\nexport interface Users {"));
    assert_eq!(ts.matches("declare const uniqueIdentifier").count(), 1);
    assert_eq!(ts.matches(UNIQUE_IDENTIFIER_MARKER).count(), 2);

    let draft = "\
export interface DraftTags {
    id: string
    label: string

    /**
     * This is a unique identifier";
    assert!(ts.contains(draft), "{}", ts);
    assert!(ts.contains("    label: string\n    id: string\n\n    /**"));
    assert!(ts.contains("    readonly [uniqueIdentifier]: unique symbol\n}\n"));
}

#[test]
fn test_schema_map() {
    let ts = ts_without_docs();
    let expected = "\
export type Schema = {
    users: {
        type: Users
        relations: {
            // posts_via_author?: Posts[]
            profiles_via_user?: Profiles
            // likes_via_user?: Likes[]
        }
    }
    posts: {
        type: Posts
        relations: {
            author: Users
            // likes_via_post?: Likes[]
        }
    }
    profiles: {
        type: Profiles
        relations: {
            user: Users
        }
    }
    likes: {
        type: Likes
        relations: {
            post?: Posts
            user?: Users
        }
    }
    draft_tags: {
        type: DraftTags
    }
    archived_tags: {
        type: ArchivedTags
    }
}
";
    assert!(ts.ends_with(expected), "{}", ts);
    assert!(ts.contains(" * Commented-out back-relations"));
}

#[test]
fn test_doc_tables() {
    let out = generate_ts_schema(&fixture(), &TsSchemaConfig::default()).unwrap();
    let ts = out.code;

    assert!(ts.contains("    /**\n     * |                |                     |\n"));
    assert!(ts.contains("     * | type           | `relation (single)` |\n"));
    assert!(ts.contains("     * | collectionName | `users`             |\n"));
    assert!(ts.contains("     * | cascadeDelete  | `true`              |\n"));
    assert!(ts.contains("     */\n    author: string\n"));

    assert!(ts.contains("`select (multiple)`"));
    assert!(ts.contains("| onlyDomains | `example.com` |"));
    assert!(ts.contains("| thumbs    | `100x100`         |"));
}

#[test]
fn test_json_override() {
    let mut config = TsSchemaConfig {
        include_docs: false,
        ..Default::default()
    };
    config
        .overrides
        .entry("posts".to_string())
        .or_default()
        .insert("meta".to_string(), "{ tags: string[] }".to_string());

    let ts = generate_ts_schema(&fixture(), &config).unwrap().code;
    assert!(ts.contains("    meta: { tags: string[] }\n"));
}

#[test]
fn test_banner() {
    let config = TsSchemaConfig {
        banner: vec!["// Generated file, do not edit".to_string(), "/* eslint-disable */".to_string()],
        ..Default::default()
    };
    let ts = generate_ts_schema(&fixture(), &config).unwrap().code;
    assert!(ts.starts_with("// Generated file, do not edit\n/* eslint-disable */\n\ndeclare const"));
}

// =============================================================================
// Validators
// =============================================================================

#[test]
fn test_zod_prelude() {
    let zod = zod();
    assert!(zod.starts_with(
        "import { z } from 'zod'\n\nconst DATETIME_REGEX = /^\\d{4}-\\d{2}-\\d{2} \\d{2}:\\d{2}:\\d{2}(\\.\\d+)?Z$/\n\nexport const usersSchema = z.object({\n"
    ));
    assert!(!zod.contains("superusersSchema"));
    assert!(zod.ends_with("})\n"));
}

#[test]
fn test_users_validator() {
    let zod = zod();
    let expected = "\
export const usersSchema = z.object({
    id: z.string().regex(/^[a-z0-9]+$/).length(15).optional(),
    password: z.string().min(8).max(71),
    tokenKey: z.string().min(30).max(60).optional(),
    email: z.string().email(),
    emailVisibility: z.boolean().optional(),
    verified: z.boolean().optional(),
    name: z.string().max(255).optional(),
    avatar: z.string().optional(),
    created: z.string().regex(DATETIME_REGEX).optional(),
    updated: z.string().regex(DATETIME_REGEX).optional(),
})
";
    assert!(zod.contains(expected), "{}", zod);
}

#[test]
fn test_posts_validator() {
    let zod = zod();
    let expected = "\
export const postsSchema = z.object({
    id: z.string().regex(/^[a-z0-9]+$/).length(15).optional(),
    title: z.string().min(3).max(120),
    slug: z.string().regex(/^[a-z0-9-]+$/).min(1),
    body: z.string().optional(),
    status: z.enum([\"draft\", \"published\"]),
    tags: z.enum([\"news\", \"tech\", \"life\"]).array().max(3).optional(),
    author: z.string().regex(/^[a-z0-9]+$/).length(15),
    attachments: z.string().array().max(5).optional(),
    published_at: z.string().regex(DATETIME_REGEX).refine((v) => {
        const date = new Date(v)
        const minDate = new Date('2020-01-01 00:00:00.000Z')
        return date >= minDate
    }).optional(),
    views: z.number().int().min(0).optional(),
    location: z.object({ lon: z.number(), lat: z.number() }).optional(),
    meta: z.unknown().optional(),
    website: z.string().url().refine((v) => [\"example.com\"].some((domain) => v.includes(domain))).optional(),
    created: z.string().regex(DATETIME_REGEX).optional(),
})
";
    assert!(zod.contains(expected), "{}", zod);
}

#[test]
fn test_relation_validators_use_target_id_rules() {
    let zod = zod();
    assert!(zod.contains("export const likesSchema = z.object({\n"));
    assert!(zod.contains("    post: z.string().regex(/^[a-z0-9]+$/).length(15).optional(),\n"));
    assert!(zod.contains("    user: z.string().regex(/^[a-z0-9]+$/).length(15).optional(),\n"));
    assert!(zod.contains("export const draftTagsSchema = z.object({\n"));
    assert!(zod.contains("export const archivedTagsSchema = z.object({\n"));
}

#[test]
fn test_zod_imports_and_overrides() {
    let mut config = ZodSchemaConfig::default();
    config.import_statements = vec!["import { postMetaSchema } from './meta'".to_string()];
    config
        .overrides
        .entry("posts".to_string())
        .or_default()
        .insert("meta".to_string(), "postMetaSchema".to_string());

    let zod = generate_zod_schema(&fixture(), &config).unwrap().code;
    assert!(zod.starts_with("import { z } from 'zod'\nimport { postMetaSchema } from './meta'\n\n"));
    assert!(zod.contains("    meta: postMetaSchema.optional(),\n"));
}

// =============================================================================
// Errors & Determinism
// =============================================================================

#[test]
fn test_unresolved_relation() {
    let json = include_str!("fixtures/collections.json").replace("pbc_1125843985\", \"cascadeDelete\"", "pbc_missing\", \"cascadeDelete\"");
    let collections = JsonExportSource::parse(&json).unwrap();

    let err = generate_ts_schema(&collections, &TsSchemaConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnresolvedRelation { ref collection, ref field, ref target }
            if collection == "likes" && field == "post" && target == "pbc_missing"
    ));

    let err = generate_zod_schema(&collections, &ZodSchemaConfig::default()).unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvedRelation { .. }));
}

#[test]
fn test_output_is_deterministic() {
    let collections = fixture();
    let config = TsSchemaConfig::default();
    let first = generate_ts_schema(&collections, &config).unwrap();
    let second = generate_ts_schema(&collections, &config).unwrap();
    assert_eq!(first, second);

    assert_eq!(zod(), zod());
}

// =============================================================================
// Generator
// =============================================================================

#[test]
fn test_generate_and_check_from_export_file() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("pb_schema.json");
    std::fs::write(&export, include_str!("fixtures/collections.json")).unwrap();

    let mut config = GeneratorConfig::default();
    config.ts_schema.output_path = dir.path().join("src/lib/tsSchema.ts");
    config.zod_schema.output_path = dir.path().join("src/lib/zodSchema.ts");

    let generator = Generator::new(config).unwrap();
    let source = JsonExportSource::new(&export);

    let written = generator.run(&source).unwrap();
    assert_eq!(written.len(), 2);

    let on_disk = std::fs::read_to_string(dir.path().join("src/lib/zodSchema.ts")).unwrap();
    assert_eq!(on_disk, zod());
    assert!(generator.check(&source).unwrap().is_empty());

    // a new collection makes both artifacts stale
    let mut collections = fixture();
    collections.push(Collection::new("pbc_new", "comments"));
    let drift = generator.check(&collections).unwrap();
    assert_eq!(drift.len(), 2);
    assert!(drift.iter().all(|d| d.kind == DriftKind::Stale));
    assert!(drift[0].expected.contains("export interface Comments {\n}\n"));
}
