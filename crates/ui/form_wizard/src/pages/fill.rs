use color_eyre::{eyre::eyre, Result};
use form_engine::{FieldDefinition, GeneratorOptions};
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::{
    action::Action,
    components::{form_view::FormView, status_bar::StatusBar, Component},
    pages::Page,
    tui::{Event, EventResponse, Frame},
};

/// Fill-in screen. The form view is created once the action channel is
/// known, since its submit callbacks report through it.
pub struct FillPage {
    definition: FieldDefinition,
    options: GeneratorOptions,
    view: Option<FormView>,
    status: StatusBar,
}

impl FillPage {
    pub fn new(definition: FieldDefinition, options: GeneratorOptions) -> Self {
        let mut hints = vec![("Tab/↑/↓", "Move"), ("Enter", "Edit"), ("Space", "Toggle")];
        if options.hide_submit {
            hints.push(("Ctrl+S", "Submit"));
        }
        hints.push(("Esc", "Quit"));
        Self {
            definition,
            options,
            view: None,
            status: StatusBar::new(hints),
        }
    }
}

impl Page for FillPage {
    fn name(&self) -> &str {
        "fill"
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        if self.view.is_none() {
            self.view = Some(FormView::new(
                self.definition.clone(),
                self.options.clone(),
                tx,
            ));
        }
        Ok(())
    }

    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        let Some(view) = self.view.as_mut() else {
            return Ok(None);
        };
        let Some(event) = event else {
            return Ok(None);
        };
        Ok(match view.handle_events(event)? {
            Some(EventResponse::Stop(a)) | Some(EventResponse::Continue(a)) => Some(a),
            None => None,
        })
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        // the app keeps the responses; the page is done
        if let Action::Submitted(responses) = &action {
            info!(fields = responses.len(), "form submitted");
            return Ok(Some(Action::Quit));
        }
        self.status.update(action.clone())?;
        match self.view.as_mut() {
            Some(view) => view.update(action),
            None => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [main, status] =
            Layout::vertical([Constraint::Fill(1), self.status.height_constraint()]).areas(area);
        let view = self
            .view
            .as_mut()
            .ok_or_else(|| eyre!("fill page drawn before it was registered"))?;
        view.draw(frame, main)?;
        self.status.draw(frame, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use form_engine::{FieldDescriptor, FieldKind, FieldValue};
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn accepted_submission_quits() {
        let definition = FieldDefinition::new(vec![FieldDescriptor::new(
            "1",
            "agree",
            FieldKind::Boolean,
        )
        .required(true)]);
        let mut page = FillPage::new(definition, GeneratorOptions::default());
        let (tx, mut rx) = unbounded_channel();
        page.register_action_handler(tx).unwrap();

        let space = Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        page.handle_events(Some(space)).unwrap();
        page.update(Action::Submit).unwrap();

        let Ok(Action::Submitted(responses)) = rx.try_recv() else {
            panic!("expected a submission");
        };
        assert_eq!(responses.get("agree"), Some(&FieldValue::Bool(true)));
        assert_eq!(
            page.update(Action::Submitted(responses)).unwrap(),
            Some(Action::Quit)
        );
    }
}
