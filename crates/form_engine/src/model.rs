//! Form definition data model.
//!
//! This module defines the declarative pieces of the form system:
//! - `FieldKind`: closed set of supported field types (inputs + layout-only headings)
//! - `SelectOption`: one `{value, label}` pair of a select field
//! - `FieldConstraints`: numeric / length / pattern hints passed through untouched
//! - `FieldDescriptor`: one schema entry
//! - `FieldDefinition`: the ordered sequence of descriptors that makes up a form
//!
//! Everything here is pure data. Mutation of a definition happens in
//! `editor.rs`, rendering in `render.rs` / `generator.rs`.
//!
//! The JSON form keeps the camelCase keys front-ends already exchange:
//! ```json
//! [
//!   { "id": "1", "name": "contact", "type": "header", "label": "Contact" },
//!   { "id": "2", "name": "email", "type": "text", "required": true },
//!   { "id": "3", "name": "color", "type": "select",
//!     "options": [{ "value": "red", "label": "Red" }] }
//! ]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{DefinitionError, FormError};

/// Opaque, stable identifier of a descriptor. Assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single field kind supported by the form system.
///
/// Notes:
/// - `Header` / `Subheader` are layout-only: no value, no validation, no response entry
/// - `Textarea` is a multi-line text input
/// - `Select` is the only kind that uses `options`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Textarea,
    Select,
    Header,
    Subheader,
}

impl FieldKind {
    /// Human readable name used by the authoring form's kind picker.
    pub fn title(self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Number => "Number",
            FieldKind::Boolean => "Boolean",
            FieldKind::Textarea => "Text area",
            FieldKind::Select => "Select",
            FieldKind::Header => "Header",
            FieldKind::Subheader => "Subheader",
        }
    }

    pub fn is_layout_only(self) -> bool {
        matches!(self, FieldKind::Header | FieldKind::Subheader)
    }
}

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value (what the authoring form produces).
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

/// Numeric / length constraints. Carried through to rendering without any
/// validation semantics of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldConstraints {
    pub fn is_empty(&self) -> bool {
        *self == FieldConstraints::default()
    }
}

/// Declarative description of one form field (or heading).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_options"
    )]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub constraints: FieldConstraints,
}

impl FieldDescriptor {
    /// Create a bare descriptor; everything optional starts absent / false.
    pub fn new(id: impl Into<FieldId>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: None,
            kind,
            required: false,
            hidden: false,
            disabled: false,
            default_value: None,
            options: Vec::new(),
            description: None,
            constraints: FieldConstraints::default(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Explicit label if non-empty, else the field name.
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.name,
        }
    }

    /// True for every kind that produces a value in the response map.
    pub fn is_input(&self) -> bool {
        !self.kind.is_layout_only()
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionRepr {
    Pair(SelectOption),
    Plain(String),
}

/// Accept both `[{value,label}]` and the older plain `["a", "b"]` form.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<SelectOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<OptionRepr>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|repr| match repr {
            OptionRepr::Pair(option) => option,
            OptionRepr::Plain(value) => SelectOption::same(value),
        })
        .collect())
}

/// Ordered sequence of descriptors. Order defines display order and the
/// header/pairing layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDefinition(Vec<FieldDescriptor>);

impl FieldDefinition {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self(fields)
    }

    pub fn into_inner(self) -> Vec<FieldDescriptor> {
        self.0
    }

    pub fn find(&self, id: &FieldId) -> Option<&FieldDescriptor> {
        self.0.iter().find(|f| &f.id == id)
    }

    pub fn position(&self, id: &FieldId) -> Option<usize> {
        self.0.iter().position(|f| &f.id == id)
    }

    /// Whether any descriptor already uses `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.0.iter().any(|f| f.name == name)
    }

    /// New definition with `field` appended.
    pub fn appended(&self, field: FieldDescriptor) -> Self {
        let mut fields = self.0.clone();
        fields.push(field);
        Self(fields)
    }

    /// New definition where the descriptor with `field.id` is replaced.
    /// Returns `None` if no descriptor carries that id.
    pub fn replaced(&self, field: FieldDescriptor) -> Option<Self> {
        let idx = self.position(&field.id)?;
        let mut fields = self.0.clone();
        fields[idx] = field;
        Some(Self(fields))
    }

    /// New definition without the descriptor `id`, if present.
    pub fn removed(&self, id: &FieldId) -> Option<Self> {
        let idx = self.position(id)?;
        let mut fields = self.0.clone();
        fields.remove(idx);
        Some(Self(fields))
    }

    /// Check the invariants the editor maintains: unique ids across the
    /// whole sequence, unique names among input fields, unique option values
    /// within a select.
    pub fn check_invariants(&self) -> Result<(), DefinitionError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for field in &self.0 {
            if !ids.insert(&field.id) {
                return Err(DefinitionError::DuplicateId(field.id.clone()));
            }
            if field.is_input() && !names.insert(field.name.as_str()) {
                return Err(DefinitionError::DuplicateName(field.name.clone()));
            }
            let mut values = HashSet::new();
            for option in &field.options {
                if !values.insert(option.value.as_str()) {
                    return Err(DefinitionError::DuplicateOption {
                        field: field.name.clone(),
                        value: option.value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, FormError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Deref for FieldDefinition {
    type Target = [FieldDescriptor];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<FieldDescriptor>> for FieldDefinition {
    fn from(fields: Vec<FieldDescriptor>) -> Self {
        Self(fields)
    }
}

impl FromIterator<FieldDescriptor> for FieldDefinition {
    fn from_iter<T: IntoIterator<Item = FieldDescriptor>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldDefinition {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
