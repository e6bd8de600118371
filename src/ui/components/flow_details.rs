//! Details panel for the loaded record, and the placeholder shown before one exists.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use simflow_core::flow::FlowSummary;

use crate::state::AppState;

/// Fixed label width for alignment (longest label "Remaining" = 9 chars)
const LABEL_WIDTH: usize = 9;

/// Details panel widget
pub struct FlowDetails;

impl FlowDetails {
    /// Render the details panel for the current record
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height < 3 || area.width < 10 {
            return;
        }
        let Some(summary) = state.summary() else {
            return;
        };

        let block = Block::default()
            .title(Self::build_title(state))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Self::build_lines(&summary, inner.width);
        if state.is_loading() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {} Refreshing...", state.spinner_char()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Render the body when no record is loaded
    pub fn render_placeholder(frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let line = if state.is_loading() {
            Line::from(Span::styled(
                format!(
                    " {} Fetching flow data for {}...",
                    state.spinner_char(),
                    state.query_state().card_identifier
                ),
                Style::default().fg(Color::Cyan),
            ))
        } else {
            Line::from(Span::styled(
                " Enter a card number below to view its data usage",
                Style::default().fg(Color::DarkGray),
            ))
        };

        let paragraph = Paragraph::new(vec![Line::from(""), line])
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    /// Build the block title with card and optional timestamp
    fn build_title(state: &AppState) -> String {
        let card = &state.query_state().card_identifier;
        if let Some(fetched_at) = state.query_state().fetched_at {
            let local = fetched_at.with_timezone(&chrono::Local);
            format!(" Card {} ({}) ", card, local.format("%H:%M"))
        } else {
            format!(" Card {} ", card)
        }
    }

    fn build_lines(summary: &FlowSummary, width: u16) -> Vec<Line<'static>> {
        let value_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Self::detail_line("Total", format_gb(summary.total_gb), value_style),
            Self::detail_line("Used", format_gb(summary.consumed_gb), value_style),
            Self::detail_line(
                "Remaining",
                format_gb(summary.remaining_gb),
                value_style.fg(Color::Green),
            ),
            Line::from(""),
            Self::usage_line(summary.usage_percent, width),
        ];

        if !summary.expiry_label.is_empty() {
            lines.push(Line::from(""));
            lines.push(Self::detail_line(
                "Expires",
                summary.expiry_label.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }

        lines
    }

    fn detail_line(label: &str, value: String, value_style: Style) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!(" {:w$} ", label, w = LABEL_WIDTH),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::DIM),
            ),
            Span::styled(value, value_style),
        ])
    }

    /// Usage bar: " Usage     ████████░░░░░  79%"
    fn usage_line(percent: i64, width: u16) -> Line<'static> {
        let percent_str = format!("{:>3}%", percent);
        let fixed_width = 1 + LABEL_WIDTH + 1 + 1 + percent_str.len();
        let bar_width = if width as usize > fixed_width + 4 {
            width as usize - fixed_width
        } else {
            4
        };

        let shown = percent.clamp(0, 100) as usize;
        let filled = bar_width * shown / 100;
        let empty = bar_width.saturating_sub(filled);

        let bar_color = match percent {
            p if p >= 90 => Color::Red,
            p if p >= 70 => Color::Yellow,
            _ => Color::Green,
        };

        Line::from(vec![
            Span::styled(
                format!(" {:w$} ", "Usage", w = LABEL_WIDTH),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::DIM),
            ),
            Span::styled("█".repeat(filled), Style::default().fg(bar_color)),
            Span::styled(
                "░".repeat(empty),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
            Span::styled(format!(" {}", percent_str), Style::default().fg(Color::White)),
        ])
    }
}

/// Gigabytes with two decimals, e.g. `"10.00 GB"`
fn format_gb(value: f64) -> String {
    format!("{:.2} GB", value)
}
