use thiserror::Error;

use crate::model::FieldId;

/// Engine level failures. Everything the end user can fix by typing lives in
/// [`DraftError`] or [`crate::registry::FieldError`] instead.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown field id: {0}")]
    UnknownField(FieldId),

    #[error("invalid form definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Draft(#[from] DraftErrors),
}

/// Broken [`crate::model::FieldDefinition`] invariants, reported by
/// `FieldDefinition::check_invariants` for callers that load definitions
/// from outside.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("duplicate field id: {0}")]
    DuplicateId(FieldId),

    #[error("duplicate field name: {0}")]
    DuplicateName(String),

    #[error("field {field}: duplicate option value {value:?}")]
    DuplicateOption { field: String, value: String },
}

/// Authoring form errors. Each one is attached to the input it belongs to
/// (see [`DraftError::input`]) so a front-end can flag it inline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("This field is required.")]
    MissingName,

    #[error("This field is required.")]
    MissingKind,

    #[error("This name is already in use.")]
    DuplicateName(String),

    #[error("Option {} must not be empty.", .0 + 1)]
    EmptyOption(usize),

    #[error("Option {} repeats an earlier value.", .0 + 1)]
    DuplicateOption(usize),
}

/// Inputs of the authoring form that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftInput {
    Name,
    Kind,
    Option(usize),
}

impl DraftError {
    pub fn input(&self) -> DraftInput {
        match self {
            DraftError::MissingName | DraftError::DuplicateName(_) => DraftInput::Name,
            DraftError::MissingKind => DraftInput::Kind,
            DraftError::EmptyOption(idx) | DraftError::DuplicateOption(idx) => {
                DraftInput::Option(*idx)
            }
        }
    }
}

/// All errors found in one save attempt, in input order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("{} invalid input(s) in the field form", .0.len())]
pub struct DraftErrors(pub Vec<DraftError>);

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_input(&self, input: DraftInput) -> Option<&DraftError> {
        self.0.iter().find(|e| e.input() == input)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DraftError> {
        self.0.iter()
    }
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
