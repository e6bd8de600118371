use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::state::AppState;

/// Card entry form
pub struct InputWidget;

impl InputWidget {
    /// Render the input widget
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let buffer = state.get_input();
        let cursor_pos = state.get_cursor_position();
        let is_loading = state.is_loading();

        let title = if is_loading {
            format!(" Card number {} Querying... ", state.spinner_char())
        } else {
            " Card number ".to_string()
        };

        let border_color = if is_loading {
            Color::DarkGray
        } else {
            Color::Green
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let line = Self::build_line_with_cursor(buffer, cursor_pos, !is_loading);
        frame.render_widget(Paragraph::new(vec![line]).block(block), area);

        // Set cursor position for IME support (only when editable)
        if !is_loading {
            Self::set_cursor_position(frame, area, buffer, cursor_pos);
        }
    }

    /// Build the single input line with cursor indicator
    fn build_line_with_cursor(buffer: &str, cursor_pos: usize, editable: bool) -> Line<'static> {
        let cursor_style = Style::default().fg(Color::Black).bg(Color::Green);
        let text_style = Style::default().fg(Color::White);
        let hint_style = Style::default().fg(Color::DarkGray);

        if !editable {
            return Line::from(Span::styled(buffer.to_string(), hint_style));
        }

        if buffer.is_empty() {
            return Line::from(vec![
                Span::styled("\u{2588}", cursor_style), // Block cursor
                Span::styled(" (Enter: query, Esc: quit)", hint_style),
            ]);
        }

        let before_cursor = &buffer[..cursor_pos];
        let after_cursor = &buffer[cursor_pos..];

        // Character under the cursor, or a block at the end of the buffer
        let mut rest = after_cursor.chars();
        let cursor_display = rest
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "\u{2588}".to_string());

        Line::from(vec![
            Span::styled(before_cursor.to_string(), text_style),
            Span::styled(cursor_display, cursor_style),
            Span::styled(rest.as_str().to_string(), text_style),
        ])
    }

    /// Set cursor position for IME (Input Method Editor) support
    fn set_cursor_position(frame: &mut Frame, area: Rect, buffer: &str, cursor_pos: usize) {
        // Use unicode width for proper full-width character handling
        let column_width = buffer[..cursor_pos].width() as u16;

        let cursor_x = area.x + 1 + column_width;
        let cursor_y = area.y + 1;

        // Ensure cursor is within bounds
        let cursor_x = cursor_x.min(area.x + area.width.saturating_sub(2));
        let cursor_y = cursor_y.min(area.y + area.height.saturating_sub(2));

        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
