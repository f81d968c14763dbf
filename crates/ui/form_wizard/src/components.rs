use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Rect};

use crate::{
    action::Action,
    tui::{Event, EventResponse, Frame},
};

pub mod confirm;
pub mod field_form;
pub mod field_list;
pub mod form_view;
pub mod popup;
pub mod status_bar;

/// `Component` is a visual and interactive element of the user interface.
///
/// Implementors receive events, update their state from actions and render
/// themselves into the area a page gives them.
pub trait Component {
    fn height_constraint(&self) -> Constraint {
        Constraint::Fill(1)
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(key_event)?,
            _ => None,
        };
        Ok(r)
    }

    fn handle_key_events(&mut self, _key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}
