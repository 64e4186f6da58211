//! Identifier Derivation
//!
//! Collection names become TypeScript identifiers in two shapes:
//! - PascalCase for interface names (`user_details` -> `UserDetails`)
//! - camelCase for validator variables (`user_details` -> `userDetails`)
//!
//! Only `_` separates words. The first character of every word is upper-cased
//! and the rest is kept as written, so `dateTime` stays `DateTime` rather than
//! being flattened to `Datetime`.

/// Convert a collection name to a PascalCase type identifier
pub fn to_pascal_case(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// Convert a collection name to a camelCase variable identifier
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
