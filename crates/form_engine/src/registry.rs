//! Field registration capability and the form state store behind it.
//!
//! A rendered form does not own its values. Each input field registers
//! itself by name with a [`FieldRegistry`], which holds the current value,
//! the validation rules and the error collection. [`FormState`] is the
//! in-crate implementation; front-ends may bring their own.
//!
//! Validation timing:
//! - `blur` marks a field as touched and validates it
//! - `set_value` re-validates touched fields, and every field once a submit
//!   has been attempted
//! - `validate_all` validates everything and arms re-validation
//!
//! Keep this module free of UI concerns so it can be tested in isolation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::FieldKind;

/// A field value as stored in the form state and in the response map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// String shown inside a textual input.
    pub fn as_input_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::Bool(_) => false,
        }
    }
}

/// Rules a field registers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub kind: FieldKind,
    pub required: bool,
}

/// Per-field validation failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,
    #[error("Must be a number")]
    NotANumber,
}

/// Field name -> error, sorted by name.
pub type FieldErrors = BTreeMap<String, FieldError>;

/// Field name -> submitted value, sorted by name.
pub type ResponseMap = BTreeMap<String, FieldValue>;

/// Capability a rendered field uses to bind itself to the form state.
pub trait FieldRegistry {
    /// Register (or re-register) `name` with `rules`.
    fn register(&mut self, name: &str, rules: FieldRules);

    /// Current value, if any has been set.
    fn value(&self, name: &str) -> Option<&FieldValue>;

    /// Change handler.
    fn set_value(&mut self, name: &str, value: FieldValue);

    /// Blur handler.
    fn blur(&mut self, name: &str);

    /// Live error lookup.
    fn error(&self, name: &str) -> Option<&FieldError>;
}

/// Validate one value against `rules`.
pub fn check_value(rules: FieldRules, value: Option<&FieldValue>) -> Option<FieldError> {
    match rules.kind {
        FieldKind::Header | FieldKind::Subheader => None,
        FieldKind::Boolean => {
            let checked = matches!(value, Some(FieldValue::Bool(true)));
            (rules.required && !checked).then_some(FieldError::Required)
        }
        FieldKind::Number => match value {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => s
                .trim()
                .parse::<f64>()
                .is_err()
                .then_some(FieldError::NotANumber),
            Some(v) if !v.is_blank() => None,
            _ => rules.required.then_some(FieldError::Required),
        },
        FieldKind::Text | FieldKind::Textarea | FieldKind::Select => {
            let blank = value.map(FieldValue::is_blank).unwrap_or(true);
            (rules.required && blank).then_some(FieldError::Required)
        }
    }
}

/// Mutable state captured while filling in a form.
///
/// Fields:
/// - `values`: current value per field name
/// - `rules`: registration rules per field name
/// - `touched`: fields that have been blurred at least once
/// - `errors`: current per-field errors
/// - `submit_attempted`: set by `validate_all`; switches on re-validation on change
#[derive(Debug, Default, Clone)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
    rules: BTreeMap<String, FieldRules>,
    touched: HashSet<String>,
    errors: FieldErrors,
    submit_attempted: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self, name: &str) -> Option<FieldRules> {
        self.rules.get(name).copied()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    /// Replace all values and clear errors, touched flags and the submit flag.
    /// Registrations are kept.
    pub fn reset(&mut self, values: HashMap<String, FieldValue>) {
        self.values = values;
        self.touched.clear();
        self.errors.clear();
        self.submit_attempted = false;
    }

    /// Forget all registrations (and their errors). Used when the definition
    /// being rendered changes.
    pub fn clear_registrations(&mut self) {
        self.rules.clear();
        self.errors.clear();
    }

    /// Validate every registered field.
    pub fn validate_all(&mut self) -> FieldErrors {
        self.submit_attempted = true;
        self.errors = self
            .rules
            .iter()
            .filter_map(|(name, rules)| {
                check_value(*rules, self.values.get(name)).map(|e| (name.clone(), e))
            })
            .collect();
        self.errors.clone()
    }

    /// Values of every registered input field, numbers coerced to numeric.
    pub fn response(&self) -> ResponseMap {
        self.rules
            .iter()
            .filter(|(_, rules)| !rules.kind.is_layout_only())
            .map(|(name, rules)| {
                let value = self.values.get(name);
                (name.clone(), coerce(rules.kind, value))
            })
            .collect()
    }

    fn revalidate(&mut self, name: &str) {
        let Some(rules) = self.rules.get(name).copied() else {
            return;
        };
        match check_value(rules, self.values.get(name)) {
            Some(err) => {
                self.errors.insert(name.to_string(), err);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }
}

fn coerce(kind: FieldKind, value: Option<&FieldValue>) -> FieldValue {
    match (kind, value) {
        (FieldKind::Boolean, Some(FieldValue::Bool(b))) => FieldValue::Bool(*b),
        (FieldKind::Boolean, Some(FieldValue::Text(s))) => {
            FieldValue::Bool(s.eq_ignore_ascii_case("true"))
        }
        (FieldKind::Boolean, _) => FieldValue::Bool(false),
        (FieldKind::Number, Some(FieldValue::Number(n))) => FieldValue::Number(*n),
        (FieldKind::Number, Some(FieldValue::Text(s))) => match s.trim().parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => FieldValue::Null,
        },
        (FieldKind::Number, _) => FieldValue::Null,
        (_, Some(v)) => FieldValue::Text(v.as_input_text()),
        (_, None) => FieldValue::Text(String::new()),
    }
}

impl FieldRegistry for FormState {
    fn register(&mut self, name: &str, rules: FieldRules) {
        self.rules.insert(name.to_string(), rules);
    }

    fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    fn set_value(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
        if self.submit_attempted || self.touched.contains(name) {
            self.revalidate(name);
        }
    }

    fn blur(&mut self, name: &str) {
        self.touched.insert(name.to_string());
        self.revalidate(name);
    }

    fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules(kind: FieldKind, required: bool) -> FieldRules {
        FieldRules { kind, required }
    }

    #[test]
    fn required_boolean_must_be_checked() {
        let r = rules(FieldKind::Boolean, true);
        assert_eq!(check_value(r, None), Some(FieldError::Required));
        assert_eq!(
            check_value(r, Some(&FieldValue::Bool(false))),
            Some(FieldError::Required)
        );
        assert_eq!(check_value(r, Some(&FieldValue::Bool(true))), None);
        assert_eq!(check_value(rules(FieldKind::Boolean, false), None), None);
    }

    #[test]
    fn number_rules() {
        let r = rules(FieldKind::Number, true);
        assert_eq!(check_value(r, None), Some(FieldError::Required));
        assert_eq!(
            check_value(r, Some(&FieldValue::text(""))),
            Some(FieldError::Required)
        );
        assert_eq!(
            check_value(r, Some(&FieldValue::text("abc"))),
            Some(FieldError::NotANumber)
        );
        assert_eq!(check_value(r, Some(&FieldValue::text(" 4.5 "))), None);
        assert_eq!(check_value(r, Some(&FieldValue::Number(0.0))), None);

        let optional = rules(FieldKind::Number, false);
        assert_eq!(check_value(optional, None), None);
        assert_eq!(
            check_value(optional, Some(&FieldValue::text("x"))),
            Some(FieldError::NotANumber)
        );
    }

    #[test]
    fn text_and_select_need_non_empty_values() {
        for kind in [FieldKind::Text, FieldKind::Textarea, FieldKind::Select] {
            let r = rules(kind, true);
            assert_eq!(
                check_value(r, Some(&FieldValue::text(""))),
                Some(FieldError::Required)
            );
            assert_eq!(check_value(r, Some(&FieldValue::text("x"))), None);
        }
    }

    #[test]
    fn blur_validates_and_change_revalidates_touched_fields() {
        let mut state = FormState::new();
        state.register("email", rules(FieldKind::Text, true));

        state.set_value("email", FieldValue::text(""));
        assert_eq!(state.error("email"), None);

        state.blur("email");
        assert_eq!(state.error("email"), Some(&FieldError::Required));

        state.set_value("email", FieldValue::text("a@b.c"));
        assert_eq!(state.error("email"), None);
    }

    #[test]
    fn validate_all_arms_revalidation_on_change() {
        let mut state = FormState::new();
        state.register("name", rules(FieldKind::Text, true));
        state.register("agree", rules(FieldKind::Boolean, true));

        let errors = state.validate_all();
        assert_eq!(errors.len(), 2);
        assert!(state.submit_attempted());

        state.set_value("agree", FieldValue::Bool(true));
        assert_eq!(state.error("agree"), None);
        assert_eq!(state.error("name"), Some(&FieldError::Required));
    }

    #[test]
    fn response_coerces_per_kind() {
        let mut state = FormState::new();
        state.register("age", rules(FieldKind::Number, false));
        state.register("note", rules(FieldKind::Text, false));
        state.register("ok", rules(FieldKind::Boolean, false));
        state.register("size", rules(FieldKind::Number, false));
        state.set_value("age", FieldValue::text("42"));

        let response = state.response();
        assert_eq!(response["age"], FieldValue::Number(42.0));
        assert_eq!(response["note"], FieldValue::text(""));
        assert_eq!(response["ok"], FieldValue::Bool(false));
        assert_eq!(response["size"], FieldValue::Null);
    }

    #[test]
    fn reset_clears_errors_but_keeps_registrations() {
        let mut state = FormState::new();
        state.register("name", rules(FieldKind::Text, true));
        state.validate_all();
        assert!(!state.errors().is_empty());

        state.reset(HashMap::from([("name".to_string(), FieldValue::text("x"))]));
        assert!(state.errors().is_empty());
        assert!(!state.submit_attempted());
        assert!(state.rules("name").is_some());
        assert_eq!(state.value("name"), Some(&FieldValue::text("x")));
    }

    #[test]
    fn values_serialize_as_plain_json() {
        let json = serde_json::to_string(&vec![
            FieldValue::Null,
            FieldValue::Bool(true),
            FieldValue::Number(1.5),
            FieldValue::text("hi"),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,true,1.5,"hi"]"#);
    }
}
