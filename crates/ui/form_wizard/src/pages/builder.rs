use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use form_engine::{DefinitionOwner, FormDefinitionEditor, FormError, SaveOutcome};
use ratatui::layout::{Constraint, Layout, Rect, Size};
use tracing::{debug, info};

use crate::{
    action::{Action, PopupResult},
    components::{
        confirm::ConfirmPopup,
        field_form::{FieldForm, FormCommand},
        field_list::{FieldList, ListCommand},
        popup::render_backdrop,
        status_bar::StatusBar,
        Component,
    },
    pages::Page,
    store::DefinitionFile,
    tui::{Event, EventResponse, Frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Form,
}

/// Definition editor screen: field list on the left, authoring form on the
/// right, delete confirmation on top.
pub struct BuilderPage {
    file: DefinitionFile,
    editor: FormDefinitionEditor,
    list: FieldList,
    form: FieldForm,
    focus: Focus,
    confirm: Option<ConfirmPopup>,
    status: StatusBar,
}

impl BuilderPage {
    pub fn new(file: DefinitionFile) -> Self {
        Self {
            file,
            editor: FormDefinitionEditor::new(),
            list: FieldList::default(),
            form: FieldForm::default(),
            focus: Focus::List,
            confirm: None,
            status: StatusBar::new(vec![
                ("n", "New"),
                ("Enter", "Edit/Cancel"),
                ("d", "Delete"),
                ("Shift+↑/↓", "Move"),
                ("Tab/Shift+Tab", "Switch"),
                ("Ctrl+S", "Save field"),
                ("q", "Quit"),
            ]),
        }
    }

    pub fn definition_len(&self) -> usize {
        self.file.form_definition().len()
    }

    fn name_locked(&self) -> bool {
        self.editor.editing_id().is_some()
    }

    fn reset_form(&mut self) {
        let locked = self.name_locked();
        self.form.reset(self.editor.draft(), locked);
    }

    fn write_error(&mut self) -> Option<Action> {
        self.file.take_error().map(Action::Error)
    }

    fn handle_list(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return Ok(Some(Action::Quit));
        }
        let len = self.definition_len();
        let Some(command) = self.list.handle_key(key, len) else {
            return Ok(None);
        };
        let id_at = |idx: usize| self.file.form_definition().get(idx).map(|f| f.id.clone());
        let action = match command {
            ListCommand::ToggleEdit(idx) => {
                let Some(id) = id_at(idx) else {
                    return Ok(None);
                };
                self.editor.toggle_edit(&id, &self.file)?;
                self.reset_form();
                if self.editor.is_editing(&id) {
                    self.focus = Focus::Form;
                }
                Action::Update
            }
            ListCommand::Remove(idx) => {
                let Some(id) = id_at(idx) else {
                    return Ok(None);
                };
                let prompt = self.editor.request_remove(&id, &self.file)?;
                self.confirm = Some(ConfirmPopup::for_removal(&prompt));
                Action::Update
            }
            ListCommand::Move { from, to } => {
                self.editor.move_field(from, to, &mut self.file);
                self.write_error().unwrap_or(Action::Update)
            }
            ListCommand::New => {
                self.editor.cancel_edit();
                self.reset_form();
                self.focus = Focus::Form;
                Action::Update
            }
            ListCommand::FocusForm => {
                self.focus = Focus::Form;
                Action::Update
            }
        };
        Ok(Some(action))
    }

    fn handle_form(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let locked = self.name_locked();
        let Some(command) = self.form.handle_key(key, self.editor.draft_mut(), locked) else {
            return Ok(Some(Action::Update));
        };
        let action = match command {
            FormCommand::Save => self.save(),
            FormCommand::Cancel => {
                self.editor.cancel_edit();
                self.reset_form();
                self.focus = Focus::List;
                Action::Update
            }
            FormCommand::FocusList => {
                self.focus = Focus::List;
                Action::Update
            }
        };
        Ok(Some(action))
    }

    fn save(&mut self) -> Action {
        match self.editor.save(&mut self.file) {
            Ok(outcome) => {
                let name = match &outcome {
                    SaveOutcome::Created(id) | SaveOutcome::Updated(id) => self
                        .file
                        .form_definition()
                        .find(id)
                        .map(|f| f.name.clone())
                        .unwrap_or_default(),
                };
                info!(?outcome, "field saved");
                self.reset_form();
                if let Some(err) = self.write_error() {
                    return err;
                }
                match outcome {
                    SaveOutcome::Created(_) => Action::Notify(format!("Added \"{name}\"")),
                    SaveOutcome::Updated(_) => {
                        self.focus = Focus::List;
                        Action::Notify(format!("Saved \"{name}\""))
                    }
                }
            }
            Err(FormError::Draft(errors)) => {
                debug!(%errors, "field form has errors");
                Action::Error("Please fix the highlighted inputs".into())
            }
            Err(err) => {
                self.reset_form();
                Action::Error(err.to_string())
            }
        }
    }

    fn resolve_removal(&mut self, result: PopupResult) -> Option<Action> {
        self.confirm = None;
        let removed = self
            .editor
            .resolve_removal(result == PopupResult::Confirmed, &mut self.file)?;
        if self.editor.editing_id().is_none() {
            self.reset_form();
        }
        self.list.clamp(self.definition_len());
        Some(
            self.write_error()
                .unwrap_or_else(|| Action::Notify(format!("Deleted field {removed}"))),
        )
    }
}

impl Page for BuilderPage {
    fn name(&self) -> &str {
        "builder"
    }

    fn init(&mut self, _area: Size) -> Result<()> {
        info!(
            path = %self.file.path().display(),
            fields = self.definition_len(),
            "editing definition"
        );
        self.list.clamp(self.definition_len());
        self.reset_form();
        Ok(())
    }

    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        let Some(Event::Key(key)) = event else {
            return Ok(None);
        };
        if let Some(confirm) = self.confirm.as_mut() {
            return Ok(match confirm.handle_key_events(key)? {
                Some(EventResponse::Stop(a)) | Some(EventResponse::Continue(a)) => Some(a),
                None => None,
            });
        }
        match self.focus {
            Focus::List => self.handle_list(key),
            Focus::Form => self.handle_form(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let follow_up = match &action {
            Action::PopupResult(result) => self.resolve_removal(*result),
            _ => None,
        };
        self.status.update(action)?;
        Ok(follow_up)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [main, status] =
            Layout::vertical([Constraint::Fill(1), self.status.height_constraint()]).areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(main);

        let editing = self.editor.editing_id().cloned();
        self.list.draw(
            frame,
            left,
            self.file.form_definition(),
            editing.as_ref(),
            self.focus == Focus::List,
        );
        let editing_name = editing
            .as_ref()
            .and_then(|id| self.file.form_definition().find(id))
            .map(|f| f.name.clone());
        self.form.draw(
            frame,
            right,
            self.editor.draft(),
            self.editor.errors(),
            editing_name.as_deref(),
            self.focus == Focus::Form,
        );
        self.status.draw(frame, status)?;

        if let Some(confirm) = self.confirm.as_mut() {
            render_backdrop(frame, area);
            confirm.draw(frame, area)?;
        }
        Ok(())
    }
}
