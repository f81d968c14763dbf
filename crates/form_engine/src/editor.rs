//! Form definition editor (the "builder").
//!
//! Create / update / delete / reorder of descriptors against a definition the
//! caller owns. The editor keeps no copy of the definition: every operation
//! reads the current one from a [`DefinitionOwner`] and hands the new one back
//! through `update_form_definition`.
//!
//! State machine:
//!
//! ```text
//!            select_for_edit(id)                 select_for_edit(other)
//!   Idle ─────────────────────────▶ Editing(id) ───────────────────────▶ Editing(other)
//!    ▲                                  │
//!    └── cancel_edit / save / remove(id) confirmed
//! ```
//!
//! - `save` while `Idle` creates a descriptor (fresh id, appended)
//! - `save` while `Editing(id)` replaces the descriptor `id`; the name is fixed
//! - `remove` needs a confirmation and leaves other editing targets alone
//! - `reorder` changes neither the state nor the authoring form

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{DraftError, DraftErrors, FormError, Result};
use crate::ids::{IdSource, UuidIds};
use crate::model::{
    FieldConstraints, FieldDefinition, FieldDescriptor, FieldId, FieldKind, SelectOption,
};
use crate::options::{format_options, parse_options};
use crate::reorder::{is_permutation, reorder};

pub const REMOVE_CONFIRMATION: &str = "Do you really want to delete this field?";

/// Whoever owns and persists the definition.
pub trait DefinitionOwner {
    fn form_definition(&self) -> &FieldDefinition;
    fn update_form_definition(&mut self, definition: FieldDefinition);
}

impl DefinitionOwner for FieldDefinition {
    fn form_definition(&self) -> &FieldDefinition {
        self
    }

    fn update_form_definition(&mut self, definition: FieldDefinition) {
        *self = definition;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Editing(FieldId),
}

/// Authoring form contents.
///
/// Select options are held as an editable list; the delimited string form is
/// available through [`FieldDraft::options_text`] / [`FieldDraft::set_options_text`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDraft {
    pub name: String,
    pub kind: Option<FieldKind>,
    pub label: String,
    pub default_value: String,
    pub description: String,
    pub required: bool,
    pub hidden: bool,
    pub disabled: bool,
    pub constraints: FieldConstraints,
    pub options: Vec<SelectOption>,
}

impl FieldDraft {
    pub fn from_descriptor(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            kind: Some(field.kind),
            label: field.label.clone().unwrap_or_default(),
            default_value: field.default_value.clone().unwrap_or_default(),
            description: field.description.clone().unwrap_or_default(),
            required: field.required,
            hidden: field.hidden,
            disabled: field.disabled,
            constraints: field.constraints.clone(),
            options: field.options.clone(),
        }
    }

    /// Headings have no value: default, description, required and options
    /// are disabled in the authoring form.
    pub fn is_heading(&self) -> bool {
        self.kind.map(FieldKind::is_layout_only).unwrap_or(false)
    }

    pub fn push_option(&mut self, value: impl Into<String>) {
        self.options.push(SelectOption::same(value));
    }

    /// Edit an option's value. A label that mirrored the old value follows it.
    pub fn set_option_value(&mut self, idx: usize, value: impl Into<String>) {
        if let Some(option) = self.options.get_mut(idx) {
            let value = value.into();
            if option.label.is_empty() || option.label == option.value {
                option.label = value.clone();
            }
            option.value = value;
        }
    }

    pub fn remove_option(&mut self, idx: usize) {
        if idx < self.options.len() {
            self.options.remove(idx);
        }
    }

    pub fn move_option_up(&mut self, idx: usize) {
        if idx > 0 && idx < self.options.len() {
            self.options.swap(idx, idx - 1);
        }
    }

    pub fn move_option_down(&mut self, idx: usize) {
        if idx + 1 < self.options.len() {
            self.options.swap(idx, idx + 1);
        }
    }

    pub fn options_text(&self) -> String {
        format_options(&self.options)
    }

    pub fn set_options_text(&mut self, text: &str) {
        self.options = parse_options(text);
    }

    fn validate(&self, definition: &FieldDefinition, creating: bool) -> Result<(), DraftErrors> {
        let mut errors = Vec::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push(DraftError::MissingName);
        } else if creating && definition.contains_name(name) {
            errors.push(DraftError::DuplicateName(name.to_string()));
        }
        if self.kind.is_none() {
            errors.push(DraftError::MissingKind);
        }
        if self.kind == Some(FieldKind::Select) {
            let mut seen = HashSet::new();
            for (idx, option) in self.options.iter().enumerate() {
                if option.value.trim().is_empty() {
                    errors.push(DraftError::EmptyOption(idx));
                } else if !seen.insert(option.value.as_str()) {
                    errors.push(DraftError::DuplicateOption(idx));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DraftErrors(errors))
        }
    }

    /// Build the descriptor. Callers validate first, so `kind` is set.
    ///
    /// Blank text inputs become absent, except where `previous` stored an
    /// explicit empty string; that one is written back unchanged.
    fn to_descriptor(
        &self,
        id: FieldId,
        name: String,
        previous: Option<&FieldDescriptor>,
    ) -> FieldDescriptor {
        let kind = self.kind.unwrap_or(FieldKind::Text);
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let heading = kind.is_layout_only();
        let keep_blank = |value: Option<String>, stored: Option<&String>| {
            value.or_else(|| stored.filter(|s| s.is_empty()).cloned())
        };
        FieldDescriptor {
            id,
            name,
            label: keep_blank(
                non_empty(&self.label),
                previous.and_then(|p| p.label.as_ref()),
            ),
            kind,
            required: self.required && !heading,
            hidden: self.hidden,
            disabled: self.disabled,
            default_value: keep_blank(
                (!heading).then(|| non_empty(&self.default_value)).flatten(),
                previous.and_then(|p| p.default_value.as_ref()),
            ),
            options: if kind == FieldKind::Select {
                self.options.clone()
            } else {
                Vec::new()
            },
            description: keep_blank(
                (!heading).then(|| non_empty(&self.description)).flatten(),
                previous.and_then(|p| p.description.as_ref()),
            ),
            constraints: self.constraints.clone(),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(FieldId),
    Updated(FieldId),
}

/// What to ask before a delete goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPrompt {
    pub id: FieldId,
    pub name: String,
    pub message: &'static str,
}

/// Builder state machine. Holds the selection, the authoring form and the
/// last validation errors; never the definition itself.
pub struct FormDefinitionEditor<I = UuidIds> {
    state: EditorState,
    draft: FieldDraft,
    errors: DraftErrors,
    pending_removal: Option<FieldId>,
    ids: I,
}

impl FormDefinitionEditor<UuidIds> {
    pub fn new() -> Self {
        Self::with_ids(UuidIds)
    }
}

impl Default for FormDefinitionEditor<UuidIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdSource> FormDefinitionEditor<I> {
    pub fn with_ids(ids: I) -> Self {
        Self {
            state: EditorState::Idle,
            draft: FieldDraft::default(),
            errors: DraftErrors::default(),
            pending_removal: None,
            ids,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn editing_id(&self) -> Option<&FieldId> {
        match &self.state {
            EditorState::Editing(id) => Some(id),
            EditorState::Idle => None,
        }
    }

    pub fn is_editing(&self, id: &FieldId) -> bool {
        self.editing_id() == Some(id)
    }

    pub fn draft(&self) -> &FieldDraft {
        &self.draft
    }

    /// The authoring form. Its name input is read-only while editing; a
    /// changed name is ignored on save.
    pub fn draft_mut(&mut self) -> &mut FieldDraft {
        &mut self.draft
    }

    /// Errors from the last failed save.
    pub fn errors(&self) -> &DraftErrors {
        &self.errors
    }

    pub fn pending_removal(&self) -> Option<&FieldId> {
        self.pending_removal.as_ref()
    }

    /// Start editing `id`; the authoring form is loaded from that descriptor.
    pub fn select_for_edit(&mut self, id: &FieldId, owner: &impl DefinitionOwner) -> Result<()> {
        let field = owner
            .form_definition()
            .find(id)
            .ok_or_else(|| FormError::UnknownField(id.clone()))?;
        debug!(field = %field.name, "editing field");
        self.draft = FieldDraft::from_descriptor(field);
        self.errors = DraftErrors::default();
        self.state = EditorState::Editing(id.clone());
        Ok(())
    }

    /// Edit/Cancel toggle of the field list: selecting the field already
    /// being edited cancels instead.
    pub fn toggle_edit(&mut self, id: &FieldId, owner: &impl DefinitionOwner) -> Result<()> {
        if self.is_editing(id) {
            self.cancel_edit();
            Ok(())
        } else {
            self.select_for_edit(id, owner)
        }
    }

    pub fn cancel_edit(&mut self) {
        self.state = EditorState::Idle;
        self.reset_draft();
    }

    /// Submit the authoring form.
    ///
    /// On validation failure nothing changes except [`Self::errors`].
    pub fn save(&mut self, owner: &mut impl DefinitionOwner) -> Result<SaveOutcome> {
        let current = owner.form_definition();
        let creating = self.state == EditorState::Idle;
        if let Err(errors) = self.draft.validate(current, creating) {
            debug!(count = errors.0.len(), "field form rejected");
            self.errors = errors.clone();
            return Err(errors.into());
        }

        let (updated, outcome) = match &self.state {
            EditorState::Editing(id) => {
                let Some(existing) = current.find(id) else {
                    // Removed behind our back; nothing left to update.
                    let id = id.clone();
                    self.cancel_edit();
                    return Err(FormError::UnknownField(id));
                };
                let field = self
                    .draft
                    .to_descriptor(id.clone(), existing.name.clone(), Some(existing));
                let updated = current
                    .replaced(field)
                    .ok_or_else(|| FormError::UnknownField(id.clone()))?;
                (updated, SaveOutcome::Updated(id.clone()))
            }
            EditorState::Idle => {
                let id = self.ids.next_id();
                let field = self
                    .draft
                    .to_descriptor(id.clone(), self.draft.name.trim().to_string(), None);
                (current.appended(field), SaveOutcome::Created(id))
            }
        };

        debug!(?outcome, "field saved");
        owner.update_form_definition(updated);
        self.state = EditorState::Idle;
        self.reset_draft();
        Ok(outcome)
    }

    /// First half of a delete: remember `id` and return the question to ask.
    pub fn request_remove(
        &mut self,
        id: &FieldId,
        owner: &impl DefinitionOwner,
    ) -> Result<RemovalPrompt> {
        let field = owner
            .form_definition()
            .find(id)
            .ok_or_else(|| FormError::UnknownField(id.clone()))?;
        self.pending_removal = Some(id.clone());
        Ok(RemovalPrompt {
            id: id.clone(),
            name: field.name.clone(),
            message: REMOVE_CONFIRMATION,
        })
    }

    /// Second half of a delete. Declining is a no-op. Returns the removed id.
    pub fn resolve_removal(
        &mut self,
        confirmed: bool,
        owner: &mut impl DefinitionOwner,
    ) -> Option<FieldId> {
        let id = self.pending_removal.take()?;
        if !confirmed {
            debug!(%id, "delete declined");
            return None;
        }
        let updated = owner.form_definition().removed(&id)?;
        owner.update_form_definition(updated);
        if self.is_editing(&id) {
            self.cancel_edit();
        }
        debug!(%id, "field removed");
        Some(id)
    }

    /// Delete `id` if `confirm` agrees.
    pub fn remove(
        &mut self,
        id: &FieldId,
        owner: &mut impl DefinitionOwner,
        confirm: impl FnOnce(&RemovalPrompt) -> bool,
    ) -> Result<Option<FieldId>> {
        let prompt = self.request_remove(id, owner)?;
        let confirmed = confirm(&prompt);
        Ok(self.resolve_removal(confirmed, owner))
    }

    /// Take `new_order` verbatim as the new definition.
    pub fn reorder(&mut self, new_order: FieldDefinition, owner: &mut impl DefinitionOwner) {
        if !is_permutation(owner.form_definition(), &new_order) {
            warn!("reordered definition does not hold the same fields");
        }
        owner.update_form_definition(new_order);
    }

    /// Move one field from index `from` to index `to`.
    pub fn move_field(&mut self, from: usize, to: usize, owner: &mut impl DefinitionOwner) {
        let new_order = reorder(owner.form_definition(), from, to);
        self.reorder(new_order, owner);
    }

    fn reset_draft(&mut self) {
        self.draft = FieldDraft::default();
        self.errors = DraftErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DraftInput;
    use crate::ids::SequentialIds;
    use pretty_assertions::assert_eq;

    fn editor() -> FormDefinitionEditor<SequentialIds> {
        FormDefinitionEditor::with_ids(SequentialIds::default())
    }

    fn fill(editor: &mut FormDefinitionEditor<SequentialIds>, name: &str, kind: FieldKind) {
        let draft = editor.draft_mut();
        draft.name = name.to_string();
        draft.kind = Some(kind);
    }

    #[test]
    fn create_appends_with_fresh_id() {
        let mut def = FieldDefinition::default();
        let mut ed = editor();
        fill(&mut ed, "age", FieldKind::Number);
        ed.draft_mut().label = String::new();

        let outcome = ed.save(&mut def).unwrap();
        assert_eq!(outcome, SaveOutcome::Created(FieldId::new("field-1")));
        assert_eq!(def.len(), 1);
        assert_eq!(def[0].name, "age");
        assert_eq!(def[0].label, None);
        assert_eq!(ed.state(), &EditorState::Idle);
        assert_eq!(ed.draft(), &FieldDraft::default());
    }

    #[test]
    fn missing_name_and_kind_block_save() {
        let mut def = FieldDefinition::default();
        let mut ed = editor();
        let err = ed.save(&mut def).unwrap_err();
        let FormError::Draft(errors) = err else {
            panic!("expected draft errors");
        };
        assert_eq!(
            errors.0,
            vec![DraftError::MissingName, DraftError::MissingKind]
        );
        assert_eq!(ed.errors(), &errors);
        assert!(def.is_empty());
    }

    #[test]
    fn select_rejects_repeated_option_values() {
        let mut def = FieldDefinition::default();
        let mut ed = editor();
        fill(&mut ed, "color", FieldKind::Select);
        ed.draft_mut().set_options_text("Red; Blue; Red");
        let err = ed.save(&mut def).unwrap_err();
        assert!(matches!(
            err,
            FormError::Draft(DraftErrors(ref e)) if e == &vec![DraftError::DuplicateOption(2)]
        ));
        assert_eq!(
            ed.errors().for_input(DraftInput::Option(2)),
            Some(&DraftError::DuplicateOption(2))
        );
        assert!(def.is_empty());

        ed.draft_mut().set_options_text("Red; Blue");
        ed.save(&mut def).unwrap();
        assert_eq!(def.check_invariants(), Ok(()));
    }

    #[test]
    fn explicit_blank_texts_survive_an_unchanged_edit() {
        let json = r#"[{"id":"a","name":"note","type":"text","label":"","defaultValue":"","description":""}]"#;
        let mut def = FieldDefinition::from_json_str(json).unwrap();
        let before = def.clone();
        let mut ed = editor();
        ed.select_for_edit(&FieldId::new("a"), &def).unwrap();
        ed.save(&mut def).unwrap();
        assert_eq!(def, before);
        assert_eq!(def.to_json_pretty().unwrap(), before.to_json_pretty().unwrap());
    }

    #[test]
    fn select_needs_non_empty_options() {
        let mut def = FieldDefinition::default();
        let mut ed = editor();
        fill(&mut ed, "color", FieldKind::Select);
        ed.draft_mut().push_option("red");
        ed.draft_mut().push_option(" ");
        let err = ed.save(&mut def).unwrap_err();
        assert!(matches!(err, FormError::Draft(DraftErrors(ref e)) if e == &vec![DraftError::EmptyOption(1)]));
        assert!(def.is_empty());
    }

    #[test]
    fn edit_loads_draft_and_name_change_is_ignored() {
        let mut def = FieldDefinition::new(vec![
            FieldDescriptor::new("a", "age", FieldKind::Number),
            FieldDescriptor::new("b", "bio", FieldKind::Textarea),
        ]);
        let mut ed = editor();
        ed.select_for_edit(&FieldId::new("a"), &def).unwrap();
        assert_eq!(ed.draft().name, "age");

        ed.draft_mut().name = "years".into();
        ed.draft_mut().required = true;
        let outcome = ed.save(&mut def).unwrap();
        assert_eq!(outcome, SaveOutcome::Updated(FieldId::new("a")));
        assert_eq!(def[0].name, "age");
        assert!(def[0].required);
        assert_eq!(ed.state(), &EditorState::Idle);
    }

    #[test]
    fn toggle_edit_cancels_on_second_click() {
        let def = FieldDefinition::new(vec![FieldDescriptor::new("a", "age", FieldKind::Number)]);
        let mut ed = editor();
        let id = FieldId::new("a");
        ed.toggle_edit(&id, &def).unwrap();
        assert!(ed.is_editing(&id));
        ed.toggle_edit(&id, &def).unwrap();
        assert_eq!(ed.state(), &EditorState::Idle);
        assert_eq!(ed.draft(), &FieldDraft::default());
    }

    #[test]
    fn unknown_id_cannot_be_edited() {
        let def = FieldDefinition::default();
        let mut ed = editor();
        assert!(matches!(
            ed.select_for_edit(&FieldId::new("x"), &def),
            Err(FormError::UnknownField(_))
        ));
        assert_eq!(ed.state(), &EditorState::Idle);
    }

    #[test]
    fn heading_drops_value_related_inputs() {
        let mut def = FieldDefinition::default();
        let mut ed = editor();
        fill(&mut ed, "intro", FieldKind::Header);
        let draft = ed.draft_mut();
        draft.required = true;
        draft.default_value = "x".into();
        draft.description = "y".into();
        draft.push_option("z");
        ed.save(&mut def).unwrap();
        let field = &def[0];
        assert!(!field.required);
        assert_eq!(field.default_value, None);
        assert_eq!(field.description, None);
        assert!(field.options.is_empty());
    }

    #[test]
    fn declined_removal_is_a_no_op() {
        let mut def = FieldDefinition::new(vec![FieldDescriptor::new("a", "age", FieldKind::Number)]);
        let mut ed = editor();
        let removed = ed
            .remove(&FieldId::new("a"), &mut def, |prompt| {
                assert_eq!(prompt.message, REMOVE_CONFIRMATION);
                assert_eq!(prompt.name, "age");
                false
            })
            .unwrap();
        assert_eq!(removed, None);
        assert_eq!(def.len(), 1);
        assert_eq!(ed.pending_removal(), None);
    }

    #[test]
    fn removing_another_field_keeps_editing() {
        let mut def = FieldDefinition::new(vec![
            FieldDescriptor::new("a", "age", FieldKind::Number),
            FieldDescriptor::new("b", "bio", FieldKind::Text),
        ]);
        let mut ed = editor();
        ed.select_for_edit(&FieldId::new("a"), &def).unwrap();
        ed.remove(&FieldId::new("b"), &mut def, |_| true).unwrap();
        assert_eq!(def.len(), 1);
        assert!(ed.is_editing(&FieldId::new("a")));
        assert_eq!(ed.draft().name, "age");
    }

    #[test]
    fn option_editing_helpers() {
        let mut draft = FieldDraft::default();
        draft.set_options_text("a; b; c");
        draft.move_option_down(0);
        assert_eq!(draft.options_text(), "b; a; c");
        draft.move_option_up(2);
        assert_eq!(draft.options_text(), "b; c; a");
        draft.move_option_up(0);
        draft.move_option_down(2);
        assert_eq!(draft.options_text(), "b; c; a");
        draft.set_option_value(0, "B");
        assert_eq!(draft.options[0], SelectOption::same("B"));
        draft.remove_option(1);
        draft.remove_option(9);
        assert_eq!(draft.options_text(), "B; a");
    }

    #[test]
    fn relabelled_option_keeps_its_label() {
        let mut draft = FieldDraft::default();
        draft.options = vec![SelectOption::new("r", "Red")];
        draft.set_option_value(0, "red");
        assert_eq!(draft.options[0], SelectOption::new("red", "Red"));
    }
}
