//! End-user form generator.
//!
//! [`FormRenderer`] takes a [`FieldDefinition`], seeds a [`FormState`] with the
//! derived defaults (once), lays the fields out with the pairer and renders
//! them through the field renderer. Submitting validates every registered
//! field and hands the response map or the error set to the callbacks.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::layout::{pair_rows, LayoutRow};
use crate::model::FieldDefinition;
use crate::registry::{FieldErrors, FieldRegistry, FieldValue, FormState, ResponseMap};
use crate::render::{derive_default, render_field, RenderedField};

pub const DEFAULT_SUBMIT_LABEL: &str = "Submit";
pub const DEFAULT_RESET_LABEL: &str = "Reset";

pub type SubmitSuccess = Box<dyn FnMut(ResponseMap) + Send>;
pub type SubmitError = Box<dyn FnMut(&FieldErrors) + Send>;

/// Presentation options of a generated form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorOptions {
    /// No submit control; submission only through the external trigger.
    pub hide_submit: bool,
    pub submit_btn_label: Option<String>,
    pub reset_btn_label: Option<String>,
    /// Disables the submit control and shows it busy.
    pub is_loading: bool,
    /// Merged over the derived defaults; wins on collision.
    pub reset_values: HashMap<String, FieldValue>,
}

/// How the submit control should look right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub visible: bool,
    pub enabled: bool,
    pub busy: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(ResponseMap),
    Rejected(FieldErrors),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

/// Initial value map of `definition`. Headings contribute no entry.
pub fn derive_defaults(definition: &FieldDefinition) -> HashMap<String, FieldValue> {
    definition
        .iter()
        .filter_map(|field| derive_default(field).map(|value| (field.name.clone(), value)))
        .collect()
}

pub struct FormRenderer {
    definition: FieldDefinition,
    state: FormState,
    options: GeneratorOptions,
    defaults: HashMap<String, FieldValue>,
    defaults_generated: bool,
    trigger: bool,
    on_submit_success: SubmitSuccess,
    on_submit_error: Option<SubmitError>,
}

impl fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRenderer")
            .field("definition", &self.definition)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("defaults_generated", &self.defaults_generated)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

impl FormRenderer {
    /// Build the form and seed it with the derived defaults merged with
    /// `options.reset_values`.
    pub fn new(
        definition: FieldDefinition,
        options: GeneratorOptions,
        on_submit_success: impl FnMut(ResponseMap) + Send + 'static,
    ) -> Self {
        let mut renderer = Self {
            definition,
            state: FormState::new(),
            options,
            defaults: HashMap::new(),
            defaults_generated: false,
            trigger: false,
            on_submit_success: Box::new(on_submit_success),
            on_submit_error: None,
        };
        renderer.generate_defaults();
        renderer
    }

    pub fn on_submit_error(mut self, callback: impl FnMut(&FieldErrors) + Send + 'static) -> Self {
        self.on_submit_error = Some(Box::new(callback));
        self
    }

    /// Replace the options. Changed reset values take effect on the next
    /// [`FormRenderer::reset`].
    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.set_options(options);
        self
    }

    pub fn set_options(&mut self, options: GeneratorOptions) {
        if options.reset_values != self.options.reset_values {
            self.defaults = merged_defaults(&self.definition, &options.reset_values);
        }
        self.options = options;
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.options.is_loading = is_loading;
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn defaults_generated(&self) -> bool {
        self.defaults_generated
    }

    /// Swap in a new definition. Registrations are dropped and seeding runs
    /// again for the new fields.
    pub fn set_definition(&mut self, definition: FieldDefinition) {
        if definition == self.definition {
            return;
        }
        debug!(fields = definition.len(), "definition changed");
        self.definition = definition;
        self.state.clear_registrations();
        self.defaults_generated = false;
        self.generate_defaults();
    }

    /// Seed the form with the derived defaults. Runs once per definition.
    fn generate_defaults(&mut self) {
        if self.defaults_generated {
            return;
        }
        self.defaults = merged_defaults(&self.definition, &self.options.reset_values);
        self.state.reset(self.defaults.clone());
        self.render();
        self.defaults_generated = true;
        trace!(values = self.defaults.len(), "defaults generated");
    }

    /// Lay out and render every field, registering inputs on the way.
    pub fn rows(&mut self) -> Vec<LayoutRow<RenderedField>> {
        let state = &mut self.state;
        pair_rows(&self.definition)
            .map(|row| row.map(|field| render_field(field, &mut *state)))
            .collect()
    }

    fn render(&mut self) {
        for field in self.definition.iter() {
            render_field(field, &mut self.state);
        }
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.value(name)
    }

    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        self.state.set_value(name, value);
    }

    pub fn blur(&mut self, name: &str) {
        self.state.blur(name);
    }

    /// Validate and submit. The success callback gets the response map; the
    /// error callback, if any, gets the per-field errors.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.render();
        let errors = self.state.validate_all();
        if errors.is_empty() {
            let response = self.state.response();
            debug!(fields = response.len(), "form submitted");
            (self.on_submit_success)(response.clone());
            SubmitOutcome::Submitted(response)
        } else {
            debug!(invalid = errors.len(), "form rejected");
            if let Some(on_error) = self.on_submit_error.as_mut() {
                on_error(&errors);
            }
            SubmitOutcome::Rejected(errors)
        }
    }

    /// External submit signal. Submits on a false -> true transition only.
    pub fn set_trigger_submit(&mut self, trigger: bool) -> Option<SubmitOutcome> {
        let rising = trigger && !self.trigger;
        self.trigger = trigger;
        rising.then(|| self.submit())
    }

    /// Back to the last computed defaults (merged with the reset values).
    pub fn reset(&mut self) {
        debug!("form reset");
        self.state.reset(self.defaults.clone());
    }

    pub fn submit_control(&self) -> SubmitControl {
        SubmitControl {
            visible: !self.options.hide_submit,
            enabled: !self.options.is_loading,
            busy: self.options.is_loading,
            label: self
                .options
                .submit_btn_label
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBMIT_LABEL.to_string()),
        }
    }

    pub fn reset_label(&self) -> &str {
        self.options
            .reset_btn_label
            .as_deref()
            .unwrap_or(DEFAULT_RESET_LABEL)
    }
}

fn merged_defaults(
    definition: &FieldDefinition,
    reset_values: &HashMap<String, FieldValue>,
) -> HashMap<String, FieldValue> {
    let mut values = derive_defaults(definition);
    values.extend(
        reset_values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    values
}
