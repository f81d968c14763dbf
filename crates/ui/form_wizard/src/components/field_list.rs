use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use form_engine::{FieldDefinition, FieldId};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::tui::Frame;

/// What the list asks the builder page to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    /// Edit/Cancel button of a row.
    ToggleEdit(usize),
    Remove(usize),
    Move { from: usize, to: usize },
    /// Leave the list and start a new field in the authoring form.
    New,
    FocusForm,
}

/// Definition list of the builder: one row per descriptor, in order.
#[derive(Debug, Default)]
pub struct FieldList {
    state: ListState,
}

impl FieldList {
    pub fn cursor(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    /// Keep the cursor on an existing row after the definition changed.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
        } else {
            self.state.select(Some(self.cursor().min(len - 1)));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> Option<ListCommand> {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('n') => return Some(ListCommand::New),
            KeyCode::Tab => return Some(ListCommand::FocusForm),
            _ if len == 0 => return None,
            _ => {}
        }
        let cursor = self.cursor().min(len - 1);
        match key.code {
            KeyCode::Up | KeyCode::Char('K') if shift || key.code == KeyCode::Char('K') => {
                (cursor > 0).then(|| {
                    self.state.select(Some(cursor - 1));
                    ListCommand::Move {
                        from: cursor,
                        to: cursor - 1,
                    }
                })
            }
            KeyCode::Down | KeyCode::Char('J') if shift || key.code == KeyCode::Char('J') => {
                (cursor + 1 < len).then(|| {
                    self.state.select(Some(cursor + 1));
                    ListCommand::Move {
                        from: cursor,
                        to: cursor + 1,
                    }
                })
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.select(Some(cursor.saturating_sub(1)));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.select(Some((cursor + 1).min(len - 1)));
                None
            }
            KeyCode::Home => {
                self.state.select(Some(0));
                None
            }
            KeyCode::End => {
                self.state.select(Some(len - 1));
                None
            }
            KeyCode::Enter | KeyCode::Char('e') => Some(ListCommand::ToggleEdit(cursor)),
            KeyCode::Delete | KeyCode::Char('d') => Some(ListCommand::Remove(cursor)),
            _ => None,
        }
    }

    pub fn draw(
        &mut self,
        f: &mut Frame<'_>,
        area: Rect,
        definition: &FieldDefinition,
        editing: Option<&FieldId>,
        focused: bool,
    ) {
        self.clamp(definition.len());
        let items: Vec<ListItem> = definition
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let is_editing = editing == Some(&field.id);
                let mut spans = vec![
                    Span::styled(
                        format!("{:>2}. ", idx + 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(field.display_label().to_string()),
                    Span::styled(
                        format!("  {} · {}", field.name, field.kind),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if field.required && field.is_input() {
                    spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
                }
                // the row's button reads Cancel while that field is open
                spans.push(Span::styled(
                    if is_editing { "  [Cancel]" } else { "  [Edit]" },
                    Style::default().fg(if is_editing {
                        Color::Yellow
                    } else {
                        Color::Cyan
                    }),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect();

        let border = if focused {
            Color::White
        } else {
            Color::DarkGray
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Fields ({}) ", definition.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        f.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut list = FieldList::default();
        list.clamp(3);
        assert_eq!(list.handle_key(key(KeyCode::Up), 3), None);
        assert_eq!(list.cursor(), 0);
        list.handle_key(key(KeyCode::Down), 3);
        list.handle_key(key(KeyCode::Down), 3);
        list.handle_key(key(KeyCode::Down), 3);
        assert_eq!(list.cursor(), 2);
        assert_eq!(
            list.handle_key(key(KeyCode::Char('e')), 3),
            Some(ListCommand::ToggleEdit(2))
        );
    }

    #[test]
    fn shift_moves_the_field_and_the_cursor() {
        let mut list = FieldList::default();
        list.clamp(3);
        assert_eq!(
            list.handle_key(key(KeyCode::Char('J')), 3),
            Some(ListCommand::Move { from: 0, to: 1 })
        );
        assert_eq!(list.cursor(), 1);
        assert_eq!(
            list.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT), 3),
            Some(ListCommand::Move { from: 1, to: 0 })
        );
        assert_eq!(list.handle_key(key(KeyCode::Char('K')), 3), None);
    }

    #[test]
    fn empty_list_only_offers_new() {
        let mut list = FieldList::default();
        list.clamp(0);
        assert_eq!(list.handle_key(key(KeyCode::Char('d')), 0), None);
        assert_eq!(
            list.handle_key(key(KeyCode::Char('n')), 0),
            Some(ListCommand::New)
        );
    }

    #[test]
    fn clamp_after_removal() {
        let mut list = FieldList::default();
        list.clamp(2);
        list.handle_key(key(KeyCode::End), 2);
        assert_eq!(
            list.handle_key(key(KeyCode::Delete), 2),
            Some(ListCommand::Remove(1))
        );
        list.clamp(1);
        assert_eq!(list.cursor(), 0);
    }
}
