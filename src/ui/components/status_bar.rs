use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use simflow_core::query::Phase;

use crate::state::AppState;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let phase = state.query_state().phase;
        let mut spans = vec![Span::styled(
            format!(" {} ", phase.display_name()),
            Self::phase_style(phase),
        )];
        spans.push(Span::raw(" "));

        if state.is_input_mode() {
            spans.push(Span::styled(
                " -- INPUT -- ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            Self::key_hint(&mut spans, "Enter", "Query", Color::Green);
            // Letters go to the form, so refresh is only on F5 here
            if state.query_state().has_record() {
                Self::key_hint(&mut spans, "F5", "Refresh", Color::Green);
            }
            Self::key_hint(&mut spans, "<-/->", "Move", Color::Cyan);
            Self::key_hint(&mut spans, "F1", "Help", Color::Cyan);
            Self::key_hint(&mut spans, "Esc", "Quit", Color::Yellow);
        } else {
            Self::key_hint(&mut spans, "r", "Refresh", Color::Green);
            Self::key_hint(&mut spans, "e", "Edit card", Color::Yellow);
            Self::key_hint(&mut spans, "?", "Help", Color::Cyan);
            Self::key_hint(&mut spans, "q", "Quit", Color::Red);
        }

        // Time since the record was applied
        if let Some(fetched_at) = state.query_state().fetched_at {
            let elapsed = chrono::Utc::now()
                .signed_duration_since(fetched_at)
                .num_seconds();
            spans.push(Span::styled(
                format!(" [{}s] ", elapsed),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

        frame.render_widget(paragraph, area);
    }

    fn phase_style(phase: Phase) -> Style {
        let bg = match phase {
            Phase::Idle => Color::DarkGray,
            Phase::Loading => Color::Cyan,
            Phase::Loaded => Color::Green,
            Phase::Failed => Color::Red,
        };
        Style::default().fg(Color::Black).bg(bg)
    }

    fn key_hint(spans: &mut Vec<Span<'static>>, key: &'static str, label: &str, color: Color) {
        spans.push(Span::styled(
            key,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(":{} ", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use simflow_core::flow::ReadResponse;
    use simflow_core::query::{QueryMachine, QueryOptions};
    use simflow_core::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn state_with(auto_hide_form: bool) -> AppState {
        let machine = QueryMachine::new(
            Arc::new(MemoryStore::new()),
            QueryOptions { auto_hide_form },
        );
        AppState::new(machine, Duration::from_millis(100))
    }

    fn load_record(state: &mut AppState) {
        state.set_input("1001");
        let ticket = state.submit_input().unwrap();
        let response: ReadResponse = serde_json::from_value(serde_json::json!({
            "code": 0,
            "status": true,
            "data": {"sumFlow": 1024.0, "consumeFlow": 0.0, "surplusFlow": 1024.0}
        }))
        .unwrap();
        state.apply_fetch(&ticket, Ok(response));
    }

    fn bar_text(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();
        terminal
            .draw(|frame| StatusBar::render(frame, frame.area(), state))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_input_mode_with_record_shows_refresh_key() {
        let mut state = state_with(false);
        load_record(&mut state);
        assert!(state.is_input_mode());

        let text = bar_text(&state);
        assert!(text.contains("INPUT"));
        assert!(text.contains("F5:Refresh"));
    }

    #[test]
    fn test_input_mode_without_record_hides_refresh_key() {
        let state = state_with(false);
        assert!(!bar_text(&state).contains("Refresh"));
    }

    #[test]
    fn test_view_mode_shows_refresh_key() {
        let mut state = state_with(true);
        load_record(&mut state);
        assert!(!state.is_input_mode());
        assert!(bar_text(&state).contains("r:Refresh"));
    }

    #[test]
    fn test_key_hint_spans() {
        let mut spans = Vec::new();
        StatusBar::key_hint(&mut spans, "r", "Refresh", Color::Green);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "r");
        assert_eq!(spans[1].content, ":Refresh ");
    }

    #[test]
    fn test_phase_style_failed_is_red() {
        assert_eq!(StatusBar::phase_style(Phase::Failed).bg, Some(Color::Red));
    }
}
