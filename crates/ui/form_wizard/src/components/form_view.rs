//! Fill-in screen for a generated form.
//!
//! Draws the [`FormRenderer`] rows top to bottom, pairs side by side, and
//! routes keys to the focused control:
//! - Tab/Down and BackTab/Up move between the editable fields and the buttons
//! - Enter starts typing in a text, number or text area field; Enter again
//!   commits (change + blur), Esc drops the typed text
//! - Space/Enter toggles a checkbox; Left/Right/Space cycle a select
//! - Ctrl+S pulses the external submit signal
use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use form_engine::{
    Control, FieldDefinition, FieldErrors, FieldId, FieldValue, FormRenderer, GeneratorOptions, LayoutRow,
    RenderedField, ResponseMap, SubmitControl,
};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};

use crate::{
    action::Action,
    components::Component,
    tui::{Event, EventResponse, Frame},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Field(FieldId),
    Submit,
    Reset,
}

pub struct FormView {
    renderer: FormRenderer,
    focus: usize,
    /// Text being typed into the focused field.
    input: Option<Input>,
    trigger_raised: bool,
    first_row: usize,
}

impl FormView {
    /// The success callback forwards the responses as
    /// `Action::Submitted`; a rejected submit is reported as `Action::Error`.
    pub fn new(
        definition: FieldDefinition,
        options: GeneratorOptions,
        action_tx: UnboundedSender<Action>,
    ) -> Self {
        let error_tx = action_tx.clone();
        let renderer = FormRenderer::new(definition, options, move |response: ResponseMap| {
            let _ = action_tx.send(Action::Submitted(response));
        })
        .on_submit_error(move |errors: &FieldErrors| {
            let _ = error_tx.send(Action::Error(format!(
                "{} field(s) need attention",
                errors.len()
            )));
        });
        Self {
            renderer,
            focus: 0,
            input: None,
            trigger_raised: false,
            first_row: 0,
        }
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &FormRenderer {
        &self.renderer
    }

    fn targets(rows: &[LayoutRow<RenderedField>], control: &SubmitControl) -> Vec<Target> {
        let mut targets: Vec<Target> = rows
            .iter()
            .flat_map(|row| row.fields())
            .filter(|f| !f.kind.is_layout_only() && !f.hidden && !f.disabled)
            .map(|f| Target::Field(f.id.clone()))
            .collect();
        if control.visible {
            targets.push(Target::Submit);
        }
        targets.push(Target::Reset);
        targets
    }

    fn find<'a>(rows: &'a [LayoutRow<RenderedField>], id: &FieldId) -> Option<&'a RenderedField> {
        rows.iter()
            .flat_map(|row| row.fields())
            .find(|f| &f.id == id)
    }

    fn focused_target(&mut self) -> (Vec<LayoutRow<RenderedField>>, Option<Target>) {
        let rows = self.renderer.rows();
        let targets = Self::targets(&rows, &self.renderer.submit_control());
        self.focus = self.focus.min(targets.len().saturating_sub(1));
        let target = targets.get(self.focus).cloned();
        (rows, target)
    }

    fn move_focus(&mut self, forward: bool) {
        let rows = self.renderer.rows();
        let count = Self::targets(&rows, &self.renderer.submit_control()).len();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }

    fn commit(&mut self, name: &str) {
        if let Some(input) = self.input.take() {
            self.renderer
                .set_value(name, FieldValue::text(input.value().to_string()));
            self.renderer.blur(name);
        }
    }

    fn change(&mut self, name: &str, value: FieldValue) {
        self.renderer.set_value(name, value);
        self.renderer.blur(name);
    }

    fn handle_field_key(&mut self, key: KeyEvent, field: &RenderedField) -> Option<Action> {
        match (&field.control, key.code) {
            (Control::Toggle { checked }, KeyCode::Char(' ') | KeyCode::Enter) => {
                self.change(&field.name, FieldValue::Bool(!checked));
                Some(Action::Update)
            }
            (
                Control::Dropdown {
                    options, selected, ..
                },
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right | KeyCode::Left,
            ) if !options.is_empty() => {
                let n = options.len();
                let next = match (selected, key.code == KeyCode::Left) {
                    (None, false) => 0,
                    (None, true) => n - 1,
                    (Some(i), false) => (i + 1) % n,
                    (Some(i), true) => (i + n - 1) % n,
                };
                self.change(&field.name, FieldValue::text(options[next].value.clone()));
                Some(Action::Update)
            }
            (
                Control::TextInput { value }
                | Control::NumberInput { value }
                | Control::TextArea { value, .. },
                KeyCode::Enter,
            ) => {
                self.input = Some(Input::default().with_value(value.clone()));
                Some(Action::Update)
            }
            _ => None,
        }
    }

    fn row_height(row: &LayoutRow<RenderedField>) -> u16 {
        row.fields()
            .into_iter()
            .filter(|f| !f.hidden)
            .map(|f| match &f.control {
                Control::Heading(_) => 2,
                Control::SubHeading(_) => 1,
                Control::TextArea { rows, .. } => rows + 2,
                _ => 3,
            })
            .max()
            .unwrap_or(0)
    }

    fn draw_field(&self, f: &mut Frame<'_>, area: Rect, field: &RenderedField, focused: bool) {
        if field.hidden || area.height == 0 {
            return;
        }
        let dim = Style::default().fg(Color::DarkGray);
        match &field.control {
            Control::Heading(text) => {
                let lines = vec![
                    Line::from(Span::styled(
                        text.clone(),
                        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    )),
                    Line::raw(""),
                ];
                f.render_widget(Paragraph::new(lines), area);
                return;
            }
            Control::SubHeading(text) => {
                f.render_widget(
                    Paragraph::new(Span::styled(
                        text.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    area,
                );
                return;
            }
            _ => {}
        }

        let label_style = if field.disabled {
            dim
        } else if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut label = vec![Span::styled(field.label.clone(), label_style)];
        if field.required_marker {
            label.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }

        let value_style = if field.disabled {
            dim
        } else if focused {
            Style::default().fg(Color::Black).bg(Color::White)
        } else if field.is_invalid() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let typing = focused.then_some(self.input.as_ref()).flatten();
        let mut lines = vec![Line::from(label)];
        match &field.control {
            Control::Toggle { checked } => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                lines.push(Line::from(Span::styled(mark, value_style)));
            }
            Control::Dropdown {
                placeholder,
                options,
                selected,
            } => {
                let shown = match selected.and_then(|i| options.get(i)) {
                    Some(option) => Span::styled(format!("◀ {} ▶", option.display_label()), value_style),
                    None => Span::styled(format!("◀ {placeholder} ▶"), dim),
                };
                lines.push(Line::from(shown));
            }
            Control::TextArea { value, rows } => {
                let text = typing.map(|i| i.value().to_string()).unwrap_or_else(|| value.clone());
                let mut body: Vec<Line> = text
                    .lines()
                    .take(*rows as usize)
                    .map(|l| Line::from(Span::styled(l.to_string(), value_style)))
                    .collect();
                body.resize(*rows as usize, Line::from(Span::styled("", value_style)));
                lines.extend(body);
            }
            Control::TextInput { value } | Control::NumberInput { value } => {
                let text = typing.map(|i| i.value().to_string()).unwrap_or_else(|| value.clone());
                lines.push(Line::from(Span::styled(format!("{text} "), value_style)));
            }
            Control::Heading(_) | Control::SubHeading(_) => {}
        }
        if let Some(err) = field.error_message() {
            lines.push(Line::from(Span::styled(err, Style::default().fg(Color::Red))));
        } else if let Some(desc) = &field.description {
            lines.push(Line::from(Span::styled(desc.clone(), dim)));
        }
        f.render_widget(Paragraph::new(lines), area);

        if let Some(input) = typing {
            let x = area.x + (input.visual_cursor() as u16).min(area.width.saturating_sub(1));
            f.set_cursor_position(Position::new(x, area.y + 1));
        }
    }

    fn draw_buttons(&self, f: &mut Frame<'_>, area: Rect, focused: Option<&Target>) {
        let control = self.renderer.submit_control();
        let button = |label: String, on: bool, enabled: bool| {
            let style = match (on, enabled) {
                (_, false) => Style::default().fg(Color::DarkGray),
                (true, true) => Style::default().fg(Color::Black).bg(Color::White),
                (false, true) => Style::default().fg(Color::Cyan),
            };
            Span::styled(format!("[ {label} ]"), style)
        };
        let mut spans = Vec::new();
        if control.visible {
            let label = if control.busy {
                format!("{} …", control.label)
            } else {
                control.label.clone()
            };
            spans.push(button(
                label,
                focused == Some(&Target::Submit),
                control.enabled,
            ));
            spans.push(Span::raw("  "));
        }
        spans.push(button(
            self.renderer.reset_label().to_string(),
            focused == Some(&Target::Reset),
            true,
        ));
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for FormView {
    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key) => self.handle_key_events(key),
            Event::Paste(text) => {
                let Some(input) = self.input.as_mut() else {
                    return Ok(None);
                };
                for c in text.chars().filter(|c| !c.is_control()) {
                    input.handle(InputRequest::InsertChar(c));
                }
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            _ => Ok(None),
        }
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let (rows, target) = self.focused_target();

        if self.input.is_some() {
            let Some(name) = target.and_then(|t| match t {
                Target::Field(id) => Self::find(&rows, &id).map(|f| f.name.clone()),
                _ => None,
            }) else {
                self.input = None;
                return Ok(None);
            };
            match key.code {
                KeyCode::Enter => self.commit(&name),
                KeyCode::Esc => self.input = None,
                _ => {
                    if let Some(input) = self.input.as_mut() {
                        input.handle_event(&CrosstermEvent::Key(key));
                    }
                }
            }
            return Ok(Some(EventResponse::Stop(Action::Update)));
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Ok(Some(EventResponse::Stop(Action::TriggerSubmit)));
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                Some(Action::Update)
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                Some(Action::Update)
            }
            KeyCode::Esc => Some(Action::Quit),
            _ => match target {
                Some(Target::Submit) if key.code == KeyCode::Enter => Some(Action::Submit),
                Some(Target::Reset) if key.code == KeyCode::Enter => Some(Action::Reset),
                Some(Target::Field(id)) => Self::find(&rows, &id)
                    .cloned()
                    .and_then(|field| self.handle_field_key(key, &field)),
                _ => None,
            },
        };
        Ok(action.map(EventResponse::Stop))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Submit => {
                if self.renderer.submit_control().enabled {
                    self.renderer.submit();
                } else {
                    debug!("submit ignored while loading");
                }
            }
            Action::Reset => {
                self.input = None;
                self.renderer.reset();
                return Ok(Some(Action::Notify("Form reset".into())));
            }
            Action::TriggerSubmit => {
                self.trigger_raised = true;
                self.renderer.set_trigger_submit(true);
            }
            Action::Tick if self.trigger_raised => {
                self.trigger_raised = false;
                self.renderer.set_trigger_submit(false);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::default().borders(Borders::ALL).title(" Form ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let [body, buttons] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let (rows, target) = self.focused_target();
        let heights: Vec<u16> = rows.iter().map(Self::row_height).collect();

        // keep the focused row on screen
        if let Some(Target::Field(id)) = &target {
            if let Some(focused_row) = rows
                .iter()
                .position(|row| row.fields().iter().any(|f| &f.id == id))
            {
                self.first_row = self.first_row.min(focused_row);
                while self.first_row < focused_row
                    && heights[self.first_row..=focused_row].iter().sum::<u16>() > body.height
                {
                    self.first_row += 1;
                }
            }
        }

        let mut y = body.y;
        for (row, height) in rows.iter().zip(&heights).skip(self.first_row) {
            if y >= body.bottom() {
                break;
            }
            let height = (*height).min(body.bottom() - y);
            let area = Rect::new(body.x, y, body.width, height);
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .spacing(2)
                    .areas(area);
            let is_focused = |field: &RenderedField| {
                matches!(&target, Some(Target::Field(id)) if id == &field.id)
            };
            match row {
                LayoutRow::FullWidth(field) => self.draw_field(f, area, field, is_focused(field)),
                LayoutRow::HalfWidth(field) => self.draw_field(f, left, field, is_focused(field)),
                LayoutRow::Pair(a, b) => {
                    self.draw_field(f, left, a, is_focused(a));
                    self.draw_field(f, right, b, is_focused(b));
                }
            }
            y += height;
        }

        self.draw_buttons(f, buttons, target.as_ref());
        Ok(())
    }
}
