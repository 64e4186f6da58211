//! Collection and field metadata
//!
//! The read-only snapshot handed over by the host's introspection API. Field
//! kinds form a closed set: every per-kind rendering in `codegen` is an
//! exhaustive `match` on [`FieldKind`], so a new kind cannot be added without
//! every target learning about it.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    #[default]
    Base,
    Auth,
    View,
}

/// A named set of typed records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Opaque collection id (relation fields point at this)
    pub id: String,
    /// Display name, source of the type and variable identifiers
    pub name: String,
    /// Collection kind
    #[serde(rename = "type", default)]
    pub kind: CollectionKind,
    /// Reserved by the host application
    #[serde(default)]
    pub system: bool,
    /// Ordered field definitions
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<Field>,
    /// Raw index definitions (`CREATE [UNIQUE] INDEX ...`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub indexes: Vec<String>,
}

impl Collection {
    /// Create an empty base collection
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CollectionKind::Base,
            system: false,
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a raw index definition
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.indexes.push(index.into());
        self
    }

    /// Mark as a system collection
    pub fn system(mut self) -> Self {
        self.system = true;
        self
    }

    /// The primary-key field: the text field flagged `primaryKey`, else the one named `id`
    pub fn primary_key(&self) -> Option<(&Field, &TextOptions)> {
        let text_fields = || {
            self.fields.iter().filter_map(|f| match &f.kind {
                FieldKind::Text(opts) => Some((f, opts)),
                _ => None,
            })
        };
        text_fields()
            .find(|(_, opts)| opts.primary_key)
            .or_else(|| text_fields().find(|(f, _)| f.name == "id"))
    }

    /// Whether any field renders against the shared datetime regex
    pub fn has_datetime_fields(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.kind, FieldKind::Date(_) | FieldKind::Autodate(_)))
    }
}

/// A typed column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field id (unused by rendering)
    #[serde(default)]
    pub id: String,
    /// Name, unique within the owning collection
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub presentable: bool,
    /// Kind tag and kind-specific options
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    /// Create an optional, visible field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            hidden: false,
            required: false,
            system: false,
            presentable: false,
            kind,
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Multiplicity of select, file and relation fields; `false` for all others
    pub fn is_multiple(&self) -> bool {
        match &self.kind {
            FieldKind::Select(opts) => opts.is_multiple(),
            FieldKind::File(opts) => opts.is_multiple(),
            FieldKind::Relation(opts) => opts.is_multiple(),
            _ => false,
        }
    }

    /// Non-empty autogenerate pattern (text fields only)
    pub fn autogenerate_pattern(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Text(opts) if !opts.autogenerate_pattern.is_empty() => {
                Some(opts.autogenerate_pattern.as_str())
            }
            _ => None,
        }
    }
}

/// Closed set of field kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text(TextOptions),
    Password(PasswordOptions),
    Editor(EditorOptions),
    Number(NumberOptions),
    Bool,
    Email(DomainOptions),
    Url(DomainOptions),
    Date(DateOptions),
    Autodate(AutodateOptions),
    Select(SelectOptions),
    File(FileOptions),
    Relation(RelationOptions),
    Json(JsonOptions),
    GeoPoint,
}

impl FieldKind {
    /// The host's kind tag
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Password(_) => "password",
            FieldKind::Editor(_) => "editor",
            FieldKind::Number(_) => "number",
            FieldKind::Bool => "bool",
            FieldKind::Email(_) => "email",
            FieldKind::Url(_) => "url",
            FieldKind::Date(_) => "date",
            FieldKind::Autodate(_) => "autodate",
            FieldKind::Select(_) => "select",
            FieldKind::File(_) => "file",
            FieldKind::Relation(_) => "relation",
            FieldKind::Json(_) => "json",
            FieldKind::GeoPoint => "geoPoint",
        }
    }
}

// =============================================================================
// Kind Options
// =============================================================================
//
// Numeric limits use 0 and strings use "" for "unset", except number bounds
// which are nullable because 0 is a legitimate bound there.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub min: u32,
    pub max: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub pattern: String,
    #[serde(deserialize_with = "null_as_default")]
    pub autogenerate_pattern: String,
    pub primary_key: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordOptions {
    pub min: u32,
    pub max: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub pattern: String,
    pub cost: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    pub max_size: u64,
    #[serde(rename = "convertURLs")]
    pub convert_urls: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberOptions {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub only_int: bool,
}

/// Options shared by email and url fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub except_domains: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub only_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub min: String,
    #[serde(deserialize_with = "null_as_default")]
    pub max: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutodateOptions {
    pub on_create: bool,
    pub on_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub values: Vec<String>,
    pub max_select: u32,
}

impl SelectOptions {
    pub fn is_multiple(&self) -> bool {
        cardinality_is_multiple(self.max_select)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileOptions {
    pub max_select: u32,
    pub max_size: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub mime_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbs: Vec<String>,
    pub protected: bool,
}

impl FileOptions {
    pub fn is_multiple(&self) -> bool {
        cardinality_is_multiple(self.max_select)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationOptions {
    pub collection_id: String,
    pub cascade_delete: bool,
    pub min_select: u32,
    pub max_select: u32,
}

impl RelationOptions {
    pub fn is_multiple(&self) -> bool {
        cardinality_is_multiple(self.max_select)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonOptions {
    pub max_size: u64,
}

/// Multiple iff the cardinality limit is configured and not exactly 1
fn cardinality_is_multiple(max_select: u32) -> bool {
    max_select > 1
}

/// Hosts export unset lists and strings as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
