use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Help popup widget
pub struct HelpPopup;

impl HelpPopup {
    /// Render the help popup
    pub fn render(frame: &mut Frame, area: Rect) {
        // Clear the area first
        frame.render_widget(Clear, area);

        let help_text = vec![
            Line::from(vec![Span::styled(
                "simflow - SIM card data usage",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Self::section("Card entry"),
            Self::help_line("Enter", "Query the typed card"),
            Self::help_line("<- / ->", "Move cursor"),
            Self::help_line("Home / End", "Jump to start / end"),
            Self::help_line("Esc", "Quit"),
            Line::from(""),
            Self::section("Record view"),
            Self::help_line("r / F5", "Refresh data"),
            Self::help_line("e / i", "Edit card number"),
            Self::help_line("? / F1", "Toggle this help"),
            Self::help_line("q / Esc", "Quit"),
            Line::from(""),
            Self::section("Anywhere"),
            Self::help_line("Ctrl+r", "Refresh data"),
            Self::help_line("Ctrl+c", "Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press any key to close",
                Style::default().fg(Color::DarkGray),
            )]),
        ];

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(help_text).block(block);

        frame.render_widget(paragraph, area);
    }

    fn section(title: &str) -> Line<'static> {
        Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )])
    }

    fn help_line(key: &str, description: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_line() {
        let line = HelpPopup::help_line("r / F5", "Refresh data");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "  r / F5      ");
    }
}
