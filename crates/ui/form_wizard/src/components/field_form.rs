//! Authoring form of the builder.
//!
//! Edits the editor's [`FieldDraft`] in place. Text inputs go through a
//! `tui_input::Input` while focused and are written back on Enter; toggles
//! and the kind picker change the draft immediately. Saving, cancelling and
//! focus changes are handed back to the page as [`FormCommand`]s.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use form_engine::{DraftErrors, DraftInput, FieldDraft, FieldKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use strum::{EnumIter, IntoEnumIterator};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::tui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum FormInput {
    Name,
    Kind,
    Label,
    DefaultValue,
    Description,
    Required,
    Hidden,
    Disabled,
    Options,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    Save,
}

impl FormInput {
    fn title(self) -> &'static str {
        match self {
            FormInput::Name => "Name",
            FormInput::Kind => "Type",
            FormInput::Label => "Label",
            FormInput::DefaultValue => "Default value",
            FormInput::Description => "Description",
            FormInput::Required => "Required",
            FormInput::Hidden => "Hidden",
            FormInput::Disabled => "Disabled",
            FormInput::Options => "Options (a; b; c)",
            FormInput::Min => "Min",
            FormInput::Max => "Max",
            FormInput::MinLength => "Min length",
            FormInput::MaxLength => "Max length",
            FormInput::Pattern => "Pattern",
            FormInput::Save => "",
        }
    }

    fn is_textual(self) -> bool {
        !matches!(
            self,
            FormInput::Kind
                | FormInput::Required
                | FormInput::Hidden
                | FormInput::Disabled
                | FormInput::Save
        )
    }

    fn is_toggle(self) -> bool {
        matches!(
            self,
            FormInput::Required | FormInput::Hidden | FormInput::Disabled
        )
    }

    /// Whether the input can be focused for the current draft.
    pub fn is_enabled(self, draft: &FieldDraft, name_locked: bool) -> bool {
        let kind = draft.kind;
        match self {
            FormInput::Name => !name_locked,
            FormInput::DefaultValue | FormInput::Description | FormInput::Required => {
                !draft.is_heading()
            }
            FormInput::Options => kind == Some(FieldKind::Select),
            FormInput::Min | FormInput::Max => kind == Some(FieldKind::Number),
            FormInput::MinLength | FormInput::MaxLength | FormInput::Pattern => {
                matches!(kind, Some(FieldKind::Text | FieldKind::Textarea))
            }
            _ => true,
        }
    }

    fn error_slot(self) -> Option<DraftInput> {
        match self {
            FormInput::Name => Some(DraftInput::Name),
            FormInput::Kind => Some(DraftInput::Kind),
            _ => None,
        }
    }
}

/// Requests from the form to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    Save,
    Cancel,
    FocusList,
}

/// Text shown for `input` in the draft.
pub fn input_text(input: FormInput, draft: &FieldDraft) -> String {
    let num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    let len = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
    match input {
        FormInput::Name => draft.name.clone(),
        FormInput::Kind => draft
            .kind
            .map(|k| k.title().to_string())
            .unwrap_or_default(),
        FormInput::Label => draft.label.clone(),
        FormInput::DefaultValue => draft.default_value.clone(),
        FormInput::Description => draft.description.clone(),
        FormInput::Required => checkbox(draft.required),
        FormInput::Hidden => checkbox(draft.hidden),
        FormInput::Disabled => checkbox(draft.disabled),
        FormInput::Options => draft.options_text(),
        FormInput::Min => num(draft.constraints.min),
        FormInput::Max => num(draft.constraints.max),
        FormInput::MinLength => len(draft.constraints.min_length),
        FormInput::MaxLength => len(draft.constraints.max_length),
        FormInput::Pattern => draft.constraints.pattern.clone().unwrap_or_default(),
        FormInput::Save => String::new(),
    }
}

/// Write a committed text input back into the draft.
pub fn set_input_text(input: FormInput, draft: &mut FieldDraft, value: &str) -> Result<(), String> {
    fn parsed<T: std::str::FromStr>(value: &str, what: &str) -> Result<Option<T>, String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse()
            .map(Some)
            .map_err(|_| format!("{what} must be a number"))
    }

    match input {
        FormInput::Name => draft.name = value.to_string(),
        FormInput::Label => draft.label = value.to_string(),
        FormInput::DefaultValue => draft.default_value = value.to_string(),
        FormInput::Description => draft.description = value.to_string(),
        FormInput::Options => draft.set_options_text(value),
        FormInput::Min => draft.constraints.min = parsed(value, "Min")?,
        FormInput::Max => draft.constraints.max = parsed(value, "Max")?,
        FormInput::MinLength => draft.constraints.min_length = parsed(value, "Min length")?,
        FormInput::MaxLength => draft.constraints.max_length = parsed(value, "Max length")?,
        FormInput::Pattern => {
            draft.constraints.pattern = (!value.is_empty()).then(|| value.to_string())
        }
        FormInput::Kind
        | FormInput::Required
        | FormInput::Hidden
        | FormInput::Disabled
        | FormInput::Save => {}
    }
    Ok(())
}

/// Next kind in picker order; blank comes before the first kind.
pub fn cycle_kind(current: Option<FieldKind>, forward: bool) -> Option<FieldKind> {
    let mut choices: Vec<Option<FieldKind>> = vec![None];
    choices.extend(FieldKind::iter().map(Some));
    let idx = choices.iter().position(|c| *c == current).unwrap_or(0) as isize;
    let step = if forward { 1 } else { -1 };
    let next = (idx + step).rem_euclid(choices.len() as isize) as usize;
    choices[next]
}

fn checkbox(on: bool) -> String {
    if on { "[x]" } else { "[ ]" }.to_string()
}

#[derive(Debug, Default)]
pub struct FieldForm {
    focused: usize,
    editing: bool,
    input: Input,
    note: Option<String>,
}

/// First error that belongs under `input`. Every per-option error is shown
/// under the options line.
fn input_error(input: FormInput, errors: &DraftErrors) -> Option<String> {
    let error = match input {
        FormInput::Options => errors
            .iter()
            .find(|e| matches!(e.input(), DraftInput::Option(_))),
        _ => input.error_slot().and_then(|slot| errors.for_input(slot)),
    };
    error.map(|e| e.to_string())
}

impl FieldForm {
    pub fn focused_input(&self) -> FormInput {
        FormInput::iter().nth(self.focused).unwrap_or(FormInput::Name)
    }

    #[cfg(test)]
    pub fn is_editing_text(&self) -> bool {
        self.editing
    }

    /// Back to the first enabled input with nothing half-typed.
    pub fn reset(&mut self, draft: &FieldDraft, name_locked: bool) {
        self.editing = false;
        self.input = Input::default();
        self.note = None;
        self.focused = 0;
        if !self.focused_input().is_enabled(draft, name_locked) {
            self.move_focus(draft, name_locked, true);
        }
    }

    fn move_focus(&mut self, draft: &FieldDraft, name_locked: bool, forward: bool) {
        let count = FormInput::iter().count();
        for step in 1..=count {
            let idx = if forward {
                (self.focused + step) % count
            } else {
                (self.focused + count - step) % count
            };
            if FormInput::iter()
                .nth(idx)
                .is_some_and(|i| i.is_enabled(draft, name_locked))
            {
                self.focused = idx;
                return;
            }
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        draft: &mut FieldDraft,
        name_locked: bool,
    ) -> Option<FormCommand> {
        if self.editing {
            match key.code {
                KeyCode::Enter => self.commit(draft),
                KeyCode::Esc => {
                    self.editing = false;
                    self.input = Input::default();
                }
                _ => {
                    self.input.handle_event(&CrosstermEvent::Key(key));
                }
            }
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Some(FormCommand::Save);
        }

        let current = self.focused_input();
        match key.code {
            KeyCode::Esc => return Some(FormCommand::Cancel),
            KeyCode::BackTab if self.first_enabled(draft, name_locked) == Some(self.focused) => {
                return Some(FormCommand::FocusList)
            }
            KeyCode::Down | KeyCode::Tab => self.move_focus(draft, name_locked, true),
            KeyCode::Up | KeyCode::BackTab => self.move_focus(draft, name_locked, false),
            KeyCode::Left | KeyCode::Right if current == FormInput::Kind => {
                draft.kind = cycle_kind(draft.kind, key.code == KeyCode::Right);
            }
            KeyCode::Char(' ') | KeyCode::Enter if current.is_toggle() => match current {
                FormInput::Required => draft.required = !draft.required,
                FormInput::Hidden => draft.hidden = !draft.hidden,
                _ => draft.disabled = !draft.disabled,
            },
            KeyCode::Enter | KeyCode::Char(' ') if current == FormInput::Kind => {
                draft.kind = cycle_kind(draft.kind, true);
            }
            KeyCode::Enter if current == FormInput::Save => return Some(FormCommand::Save),
            KeyCode::Enter if current.is_textual() => {
                self.editing = true;
                self.note = None;
                self.input = Input::default().with_value(input_text(current, draft));
            }
            _ => {}
        }
        None
    }

    fn first_enabled(&self, draft: &FieldDraft, name_locked: bool) -> Option<usize> {
        FormInput::iter().position(|i| i.is_enabled(draft, name_locked))
    }

    fn commit(&mut self, draft: &mut FieldDraft) {
        let input = self.focused_input();
        if let Err(msg) = set_input_text(input, draft, self.input.value()) {
            self.note = Some(msg);
        }
        self.editing = false;
        self.input = Input::default();
    }

    pub fn draw(
        &mut self,
        f: &mut Frame<'_>,
        area: Rect,
        draft: &FieldDraft,
        errors: &DraftErrors,
        editing_name: Option<&str>,
        focused: bool,
    ) {
        let name_locked = editing_name.is_some();
        // the kind may have changed under the focused input
        if !self.focused_input().is_enabled(draft, name_locked) {
            self.move_focus(draft, name_locked, true);
        }

        let mut lines: Vec<Line> = Vec::new();
        for (idx, input) in FormInput::iter().enumerate() {
            let is_focused = focused && idx == self.focused;
            let enabled = input.is_enabled(draft, name_locked);

            if input == FormInput::Save {
                lines.push(Line::raw(""));
                let label = if name_locked {
                    "[ Save changes ]"
                } else {
                    "[ Add field ]"
                };
                let style = if is_focused {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                lines.push(Line::from(Span::styled(label, style)));
                continue;
            }

            // value-less inputs are dropped on save; show them dimmed
            let label_style = match (enabled, is_focused) {
                (false, _) => Style::default().fg(Color::DarkGray),
                (true, true) => Style::default().add_modifier(Modifier::BOLD),
                (true, false) => Style::default(),
            };
            let value = if is_focused && self.editing {
                self.input.value().to_string()
            } else {
                input_text(input, draft)
            };
            let value_style = if is_focused {
                Style::default().fg(Color::Black).bg(Color::White)
            } else if enabled {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![Span::styled(format!("{}: ", input.title()), label_style)];
            if input == FormInput::Kind {
                spans.push(Span::styled(format!("◀ {value} ▶"), value_style));
            } else {
                spans.push(Span::styled(value, value_style));
            }
            lines.push(Line::from(spans));

            if let Some(err) = input_error(input, errors) {
                lines.push(Line::from(Span::styled(
                    format!("  {err}"),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        if let Some(note) = &self.note {
            lines.push(Line::from(Span::styled(
                note.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let title = match editing_name {
            Some(name) => format!(" Edit field \"{name}\" "),
            None => " New field ".to_string(),
        };
        let border = if focused {
            Color::White
        } else {
            Color::DarkGray
        };
        let para = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(para, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::DraftError;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut FieldForm, draft: &mut FieldDraft, text: &str) {
        form.handle_key(key(KeyCode::Enter), draft, false);
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)), draft, false);
        }
        form.handle_key(key(KeyCode::Enter), draft, false);
    }

    #[test]
    fn kind_picker_cycles_through_blank() {
        assert_eq!(cycle_kind(None, true), Some(FieldKind::Text));
        assert_eq!(cycle_kind(Some(FieldKind::Text), false), None);
        assert_eq!(cycle_kind(None, false), Some(FieldKind::Subheader));
    }

    #[test]
    fn typing_a_name_and_kind() {
        let mut draft = FieldDraft::default();
        let mut form = FieldForm::default();
        form.reset(&draft, false);
        assert_eq!(form.focused_input(), FormInput::Name);

        type_text(&mut form, &mut draft, "age");
        assert_eq!(draft.name, "age");

        form.handle_key(key(KeyCode::Down), &mut draft, false);
        form.handle_key(key(KeyCode::Right), &mut draft, false);
        form.handle_key(key(KeyCode::Right), &mut draft, false);
        assert_eq!(draft.kind, Some(FieldKind::Number));
    }

    #[test]
    fn escape_while_typing_discards_the_text() {
        let mut draft = FieldDraft::default();
        let mut form = FieldForm::default();
        form.reset(&draft, false);
        form.handle_key(key(KeyCode::Enter), &mut draft, false);
        form.handle_key(key(KeyCode::Char('x')), &mut draft, false);
        form.handle_key(key(KeyCode::Esc), &mut draft, false);
        assert!(draft.name.is_empty());
        assert!(!form.is_editing_text());
        assert_eq!(
            form.handle_key(key(KeyCode::Esc), &mut draft, false),
            Some(FormCommand::Cancel)
        );
    }

    #[test]
    fn locked_name_is_skipped() {
        let draft = FieldDraft {
            name: "age".into(),
            kind: Some(FieldKind::Number),
            ..Default::default()
        };
        let mut form = FieldForm::default();
        form.reset(&draft, true);
        assert_eq!(form.focused_input(), FormInput::Kind);
    }

    #[test]
    fn heading_skips_value_inputs() {
        let mut draft = FieldDraft {
            kind: Some(FieldKind::Header),
            ..Default::default()
        };
        let mut form = FieldForm::default();
        form.reset(&draft, false);
        let mut seen = Vec::new();
        for _ in 0..FormInput::iter().count() {
            seen.push(form.focused_input());
            form.handle_key(key(KeyCode::Tab), &mut draft, false);
        }
        assert!(!seen.contains(&FormInput::DefaultValue));
        assert!(!seen.contains(&FormInput::Required));
        assert!(!seen.contains(&FormInput::Options));
        assert!(seen.contains(&FormInput::Save));
    }

    #[test]
    fn options_and_constraints_are_parsed_on_commit() {
        let mut draft = FieldDraft {
            kind: Some(FieldKind::Select),
            ..Default::default()
        };
        set_input_text(FormInput::Options, &mut draft, "Red; Blue ;Green").unwrap();
        assert_eq!(input_text(FormInput::Options, &draft), "Red; Blue; Green");

        set_input_text(FormInput::Max, &mut draft, "10").unwrap();
        assert_eq!(draft.constraints.max, Some(10.0));
        assert!(set_input_text(FormInput::MaxLength, &mut draft, "ten").is_err());
        set_input_text(FormInput::Max, &mut draft, " ").unwrap();
        assert_eq!(draft.constraints.max, None);
    }

    #[test]
    fn repeated_options_are_flagged_under_the_options_line() {
        let errors = DraftErrors(vec![DraftError::MissingName, DraftError::DuplicateOption(2)]);
        assert_eq!(
            input_error(FormInput::Options, &errors).as_deref(),
            Some("Option 3 repeats an earlier value.")
        );
        assert_eq!(
            input_error(FormInput::Name, &errors),
            Some(DraftError::MissingName.to_string())
        );
        assert_eq!(input_error(FormInput::Kind, &errors), None);
    }

    #[test]
    fn ctrl_s_saves() {
        let mut draft = FieldDraft::default();
        let mut form = FieldForm::default();
        assert_eq!(
            form.handle_key(
                KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
                &mut draft,
                false
            ),
            Some(FormCommand::Save)
        );
    }
}
