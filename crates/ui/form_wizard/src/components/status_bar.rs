use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{action::Action, components::Component, tui::Frame};

/// Bottom line: last message on the left, key hints after it.
#[derive(Debug, Default)]
pub struct StatusBar {
    hints: Vec<(&'static str, &'static str)>,
    message: Option<(String, bool)>,
}

impl StatusBar {
    pub fn new(hints: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            hints,
            message: None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(m, _)| m.as_str())
    }
}

impl Component for StatusBar {
    fn height_constraint(&self) -> Constraint {
        Constraint::Length(1)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Notify(msg) => self.message = Some((msg, false)),
            Action::Error(msg) => self.message = Some((msg, true)),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let mut spans = Vec::new();
        if let Some((msg, is_error)) = &self.message {
            let color = if *is_error { Color::Red } else { Color::Green };
            spans.push(Span::styled(msg.clone(), Style::default().fg(color)));
            spans.push(Span::raw("  "));
        }
        for (key, what) in &self.hints {
            spans.push(Span::styled(*key, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(": {what}  "),
                Style::default().fg(Color::DarkGray),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_message() {
        let mut bar = StatusBar::new(vec![("q", "Quit")]);
        assert_eq!(bar.message(), None);
        bar.update(Action::Notify("Saved".into())).unwrap();
        bar.update(Action::Tick).unwrap();
        assert_eq!(bar.message(), Some("Saved"));
        bar.update(Action::Error("disk full".into())).unwrap();
        assert_eq!(bar.message(), Some("disk full"));
    }
}
