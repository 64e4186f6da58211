//! Documentation Renderer
//!
//! Renders a field's meaningful options as an aligned table inside a doc
//! comment, placed above the field in the type-declaration artifact:
//!
//! ```text
//! /**
//!  * |          |         |
//!  * | -------- | ------- |
//!  * | type     | `text`  |
//!  * | required | `false` |
//!  */
//! ```
//!
//! Output is byte-stable for a given row list so regenerated files stay
//! diff-clean.

use crate::schema::{Field, FieldKind};

use super::format_number;

/// A `(label, value)` pair; the renderer wraps the value in backticks
pub type DocRow = (String, String);

/// Render rows as an aligned comment block, or `""` when there are no rows
pub fn render_table(rows: &[DocRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let rows: Vec<(&str, String)> = rows
        .iter()
        .map(|(label, value)| (label.as_str(), format!("`{}`", value)))
        .collect();

    let left = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let right = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push("/**".to_string());
    lines.push(format!(" * | {} | {} |", " ".repeat(left), " ".repeat(right)));
    lines.push(format!(" * | {} | {} |", "-".repeat(left), "-".repeat(right)));
    for (label, value) in &rows {
        lines.push(format!(" * | {} | {} |", pad(label, left), pad(value, right)));
    }
    lines.push(" */".to_string());

    lines.join("\n")
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Doc rows for a field.
///
/// `relation_target` is the resolved name of the collection a relation field
/// points at; other kinds ignore it.
pub fn doc_rows(field: &Field, relation_target: Option<&str>) -> Vec<DocRow> {
    let mut rows = DocRows::default();
    let multiple = field.is_multiple();

    match &field.kind {
        FieldKind::Text(opts) => {
            rows.push("type", "text");
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push_nonzero("min", opts.min);
            rows.push_nonzero("max", opts.max);
            rows.push_nonempty("pattern", &opts.pattern);
            rows.push_nonempty("autogeneratePattern", &opts.autogenerate_pattern);
        }
        FieldKind::Password(opts) => {
            rows.push("type", "password");
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push_nonzero("min", opts.min);
            rows.push_nonzero("max", opts.max);
            rows.push_nonempty("pattern", &opts.pattern);
        }
        FieldKind::Editor(opts) => {
            rows.push("type", "editor");
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push("convertURLs", opts.convert_urls);
            rows.push_nonzero("maxSize", opts.max_size);
        }
        FieldKind::Number(opts) => {
            rows.push("type", "number");
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push("onlyInt", opts.only_int);
            // 0 is a real bound for numbers
            if let Some(min) = opts.min {
                rows.push("min", format_number(min));
            }
            if let Some(max) = opts.max {
                rows.push("max", format_number(max));
            }
        }
        FieldKind::Bool => {
            rows.push("type", "bool");
            rows.push("hidden", field.hidden);
        }
        FieldKind::Email(opts) | FieldKind::Url(opts) => {
            rows.push("type", field.kind.tag());
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push_list("exceptDomains", &opts.except_domains);
            rows.push_list("onlyDomains", &opts.only_domains);
        }
        FieldKind::Date(opts) => {
            rows.push("type", "date");
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push_nonempty("min", &opts.min);
            rows.push_nonempty("max", &opts.max);
        }
        FieldKind::Autodate(opts) => {
            rows.push("type", "autodate");
            rows.push("hidden", field.hidden);
            rows.push("onCreate", opts.on_create);
            rows.push("onUpdate", opts.on_update);
        }
        FieldKind::Select(opts) => {
            rows.push("type", multiplicity_label("select", multiple));
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            if multiple {
                rows.push_nonzero("maxSelect", opts.max_select);
            }
        }
        FieldKind::File(opts) => {
            rows.push("type", multiplicity_label("file", multiple));
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push("protected", opts.protected);
            rows.push_nonzero("maxSize", opts.max_size);
            if multiple {
                rows.push_nonzero("maxSelect", opts.max_select);
            }
            rows.push_list("mimeTypes", &opts.mime_types);
            rows.push_list("thumbs", &opts.thumbs);
        }
        FieldKind::Relation(opts) => {
            rows.push("type", multiplicity_label("relation", multiple));
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
            rows.push("collectionId", &opts.collection_id);
            if let Some(target) = relation_target {
                rows.push("collectionName", target);
            }
            rows.push("cascadeDelete", opts.cascade_delete);
            rows.push_nonzero("minSelect", opts.min_select);
            if multiple {
                rows.push_nonzero("maxSelect", opts.max_select);
            }
        }
        FieldKind::Json(opts) => {
            rows.push("type", "json");
            rows.push("hidden", field.hidden);
            rows.push_nonzero("maxSize", opts.max_size);
            rows.push("required", field.required);
        }
        FieldKind::GeoPoint => {
            rows.push("type", "geoPoint");
            rows.push("hidden", field.hidden);
            rows.push("required", field.required);
        }
    }

    rows.0
}

fn multiplicity_label(kind: &str, multiple: bool) -> String {
    format!("{} ({})", kind, if multiple { "multiple" } else { "single" })
}

/// Row accumulator that drops sentinel values
#[derive(Default)]
struct DocRows(Vec<DocRow>);

impl DocRows {
    fn push(&mut self, label: &str, value: impl ToString) {
        self.0.push((label.to_string(), value.to_string()));
    }

    fn push_nonzero<N: Into<u64>>(&mut self, label: &str, value: N) {
        let value = value.into();
        if value > 0 {
            self.push(label, value);
        }
    }

    fn push_nonempty(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.push(label, value);
        }
    }

    /// Lists render as "`a`, `b`" once wrapped by the table
    fn push_list(&mut self, label: &str, values: &[String]) {
        if !values.is_empty() {
            self.push(label, values.join("`, `"));
        }
    }
}
