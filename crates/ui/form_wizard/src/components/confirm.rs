use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use form_engine::RemovalPrompt;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::{Action, PopupResult},
    components::{
        popup::{centered_rect_fixed, draw_popup_frame, inner_rect},
        Component,
    },
    tui::{EventResponse, Frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Ok,
    Cancel,
}

/// Yes/no dialog shown before a field is deleted.
///
/// Keys:
/// - Left/Right, Tab/BackTab: switch button
/// - Enter: answer with the selected button
/// - `y` / `n`: answer directly
/// - Esc: cancel
///
/// Emits `Action::PopupResult`; the page resolves the pending removal and
/// drops the popup.
#[derive(Debug)]
pub struct ConfirmPopup {
    title: String,
    question: String,
    ok_label: String,
    cancel_label: String,
    selected: Choice,
    min_width: u16,
    min_height: u16,
}

impl ConfirmPopup {
    pub fn new(title: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            question: question.into(),
            ok_label: "Delete".into(),
            cancel_label: "Keep".into(),
            selected: Choice::Cancel,
            min_width: 56,
            min_height: 9,
        }
    }

    pub fn for_removal(prompt: &RemovalPrompt) -> Self {
        Self::new(format!("Delete \"{}\"", prompt.name), prompt.message)
    }

    fn answer(&self) -> Action {
        match self.selected {
            Choice::Ok => Action::PopupResult(PopupResult::Confirmed),
            Choice::Cancel => Action::PopupResult(PopupResult::Cancelled),
        }
    }

    fn toggle_selection(&mut self) {
        self.selected = match self.selected {
            Choice::Ok => Choice::Cancel,
            Choice::Cancel => Choice::Ok,
        };
    }

    fn button(&self, label: &str, choice: Choice) -> Span<'static> {
        let style = if self.selected == choice {
            Style::default().fg(Color::Black).bg(Color::White).bold()
        } else {
            Style::default().fg(Color::White).bg(Color::Black)
        };
        Span::styled(format!("[ {label} ]"), style)
    }
}

impl Component for ConfirmPopup {
    fn height_constraint(&self) -> Constraint {
        Constraint::Min(self.min_height)
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_selection();
                Action::Update
            }
            KeyCode::Enter => self.answer(),
            KeyCode::Char('y') => Action::PopupResult(PopupResult::Confirmed),
            KeyCode::Char('n') | KeyCode::Esc => Action::PopupResult(PopupResult::Cancelled),
            // modal: swallow everything else
            _ => Action::Update,
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        if area.width < 5 || area.height < 5 {
            return Ok(());
        }

        let dialog = centered_rect_fixed(area, self.min_width, self.min_height);
        draw_popup_frame(f, dialog, &self.title);
        let inner = inner_rect(dialog);

        let mut lines: Vec<Line> = self.question.lines().map(Line::raw).collect();
        if inner.height >= 3 {
            lines.push(Line::raw(""));
        }

        let spacing = "   ";
        let buttons_len = (self.ok_label.len() + 4) + spacing.len() + (self.cancel_label.len() + 4);
        let pad = (inner.width as usize).saturating_sub(buttons_len) / 2;
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            self.button(&self.ok_label, Choice::Ok),
            Span::raw(spacing),
            self.button(&self.cancel_label, Choice::Cancel),
        ]));

        if inner.height >= 5 {
            lines.push(Line::raw(""));
            lines.push(
                Line::from(vec![
                    Span::styled("←/→", Style::default().fg(Color::White)),
                    Span::raw(": Select   "),
                    Span::styled("Enter", Style::default().fg(Color::White)),
                    Span::raw(": Confirm   "),
                    Span::styled("Esc", Style::default().fg(Color::White)),
                    Span::raw(": Cancel"),
                ])
                .fg(Color::DarkGray),
            );
        }

        let para = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        f.render_widget(para, inner);
        Ok(())
    }
}
