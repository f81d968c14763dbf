//! Dynamic forms: a declarative field model, a definition editor and a
//! generator that turns a definition into a fillable form.
//!
//! ```text
//! FormDefinitionEditor ──update_form_definition──▶ owner ──FieldDefinition──▶ FormRenderer
//!                                                                              │
//!                                              pair_rows + render_field ◀──────┘
//! ```

pub mod editor;
pub mod error;
pub mod generator;
pub mod ids;
pub mod layout;
pub mod model;
pub mod options;
pub mod registry;
pub mod render;
pub mod reorder;

pub use editor::{
    DefinitionOwner, EditorState, FieldDraft, FormDefinitionEditor, RemovalPrompt, SaveOutcome,
};
pub use error::{DefinitionError, DraftError, DraftErrors, DraftInput, FormError, Result};
pub use generator::{
    derive_defaults, FormRenderer, GeneratorOptions, SubmitControl, SubmitOutcome,
};
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use layout::{pair_rows, LayoutRow};
pub use model::{
    FieldConstraints, FieldDefinition, FieldDescriptor, FieldId, FieldKind, SelectOption,
};
pub use options::{format_options, parse_options};
pub use registry::{
    FieldError, FieldErrors, FieldRegistry, FieldRules, FieldValue, FormState, ResponseMap,
};
pub use render::{derive_default, render_field, Control, RenderedField};
pub use reorder::reorder;
