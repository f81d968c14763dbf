//! Popup helpers.
//!
//! Drawing order for a modal dialog:
//! 1. the page as usual
//! 2. `render_backdrop(frame, area)`
//! 3. `centered_rect_fixed(area, width, height)` for the dialog rect
//! 4. `draw_popup_frame(frame, dialog, "Title")`, then the content inside `inner_rect(dialog)`

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Block, Borders, Clear},
};

use crate::tui::Frame;

/// Dim the page behind a popup. Terminals have no transparency, so this is
/// a solid dark background.
pub fn render_backdrop(frame: &mut Frame<'_>, area: Rect) {
    let backdrop = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(backdrop, area);
}

/// Centered rectangle of at most `width` x `height`, clamped to `area`.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);

    let x = area.x.saturating_add((area.width.saturating_sub(w)) / 2);
    let y = area.y.saturating_add((area.height.saturating_sub(h)) / 2);

    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Rounded, titled frame at `area`. Clears whatever was drawn there first.
pub fn draw_popup_frame(frame: &mut Frame<'_>, area: Rect, title: impl Into<String>) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(block, area);
    area
}

/// Area inside a one-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn centered_rect_is_clamped_and_centered() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(area, 60, 10), Rect::new(20, 15, 60, 10));
        assert_eq!(centered_rect_fixed(area, 200, 80), area);

        let offset = Rect::new(10, 5, 20, 10);
        assert_eq!(centered_rect_fixed(offset, 10, 4), Rect::new(15, 8, 10, 4));
    }

    #[test]
    fn inner_rect_never_underflows() {
        assert_eq!(inner_rect(Rect::new(0, 0, 1, 1)), Rect::new(1, 1, 0, 0));
        assert_eq!(inner_rect(Rect::new(2, 2, 10, 5)), Rect::new(3, 3, 8, 3));
    }
}
