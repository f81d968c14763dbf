//! Descriptor -> renderable field.
//!
//! `render_field` turns one [`FieldDescriptor`] into a [`RenderedField`]: a
//! plain view model a front-end can draw with whatever widgets it has. Input
//! fields register themselves with the [`FieldRegistry`] on the way, so the
//! current value and error come from the live form state.
//!
//! | kind      | control      | default                           | rule when required   |
//! |-----------|--------------|-----------------------------------|----------------------|
//! | header    | Heading      | -                                 | -                    |
//! | subheader | SubHeading   | -                                 | -                    |
//! | boolean   | Toggle       | `"true"` (any case) -> checked    | must be checked      |
//! | select    | Dropdown     | default if it names an option     | option selected      |
//! | number    | NumberInput  | parsed number                     | defined, numeric     |
//! | text      | TextInput    | literal                           | non-empty            |
//! | textarea  | TextArea     | literal                           | non-empty            |

use crate::model::{FieldConstraints, FieldDescriptor, FieldId, FieldKind, SelectOption};
use crate::registry::{FieldError, FieldRegistry, FieldRules, FieldValue};

pub const SELECT_PLACEHOLDER: &str = "Choose...";
pub const TEXTAREA_ROWS: u16 = 3;

/// Control to draw for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Heading(String),
    SubHeading(String),
    Toggle {
        checked: bool,
    },
    /// `selected` indexes into `options`; `None` means the (disabled)
    /// placeholder entry is showing.
    Dropdown {
        placeholder: String,
        options: Vec<SelectOption>,
        selected: Option<usize>,
    },
    NumberInput {
        value: String,
    },
    TextInput {
        value: String,
    },
    TextArea {
        value: String,
        rows: u16,
    },
}

/// View model of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    pub id: FieldId,
    pub name: String,
    pub kind: FieldKind,
    pub label: String,
    /// Show an asterisk next to the label.
    pub required_marker: bool,
    pub description: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    pub error: Option<FieldError>,
    pub constraints: FieldConstraints,
    pub control: Control,
}

impl RenderedField {
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}

/// Initial value of an input field derived from its `default_value`.
/// Headings have none.
pub fn derive_default(field: &FieldDescriptor) -> Option<FieldValue> {
    let raw = field.default_value.as_deref().unwrap_or("");
    match field.kind {
        FieldKind::Header | FieldKind::Subheader => None,
        FieldKind::Boolean => Some(FieldValue::Bool(raw.eq_ignore_ascii_case("true"))),
        FieldKind::Number => Some(match raw.trim().parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => FieldValue::text(raw),
        }),
        FieldKind::Select => {
            let known = field.options.iter().any(|o| o.value == raw);
            Some(FieldValue::text(if known { raw } else { "" }))
        }
        FieldKind::Text | FieldKind::Textarea => Some(FieldValue::text(raw)),
    }
}

/// Render one descriptor, registering it with `registry` if it is an input.
pub fn render_field(field: &FieldDescriptor, registry: &mut dyn FieldRegistry) -> RenderedField {
    let label = field.display_label().to_string();
    let control = match field.kind {
        FieldKind::Header => Control::Heading(label.clone()),
        FieldKind::Subheader => Control::SubHeading(label.clone()),
        kind => {
            registry.register(
                &field.name,
                FieldRules {
                    kind,
                    required: field.required,
                },
            );
            let value = registry
                .value(&field.name)
                .cloned()
                .or_else(|| derive_default(field))
                .unwrap_or(FieldValue::Null);
            input_control(field, &value)
        }
    };

    let description = field
        .description
        .as_ref()
        .filter(|d| !d.is_empty())
        .cloned();

    RenderedField {
        id: field.id.clone(),
        name: field.name.clone(),
        kind: field.kind,
        label,
        required_marker: field.required && field.is_input(),
        description,
        hidden: field.hidden,
        disabled: field.disabled,
        error: if field.is_input() {
            registry.error(&field.name).copied()
        } else {
            None
        },
        constraints: field.constraints.clone(),
        control,
    }
}

fn input_control(field: &FieldDescriptor, value: &FieldValue) -> Control {
    match field.kind {
        FieldKind::Boolean => Control::Toggle {
            checked: match value {
                FieldValue::Bool(b) => *b,
                FieldValue::Text(s) => s.eq_ignore_ascii_case("true"),
                _ => false,
            },
        },
        FieldKind::Select => {
            let current = value.as_input_text();
            Control::Dropdown {
                placeholder: SELECT_PLACEHOLDER.to_string(),
                options: field
                    .options
                    .iter()
                    .map(|o| SelectOption::new(o.value.clone(), o.display_label()))
                    .collect(),
                selected: field.options.iter().position(|o| o.value == current),
            }
        }
        FieldKind::Number => Control::NumberInput {
            value: value.as_input_text(),
        },
        FieldKind::Textarea => Control::TextArea {
            value: value.as_input_text(),
            rows: TEXTAREA_ROWS,
        },
        _ => Control::TextInput {
            value: value.as_input_text(),
        },
    }
}
