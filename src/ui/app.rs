use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use simflow_core::flow::{fetch_flow, FetchOutcome, FlowApi};
use simflow_core::query::{Completion, FetchTicket, QueryMachine};
use simflow_core::store::KeyValueStore;

use crate::config::Settings;
use crate::state::AppState;

use super::components::{ErrorBanner, FlowDetails, HelpPopup, InputWidget, LiquidGauge, StatusBar};
use super::key_handler::{resolve_key, KeyAction};
use super::layout::{Layout, Visibility};

/// Messages from fetch-flow tasks to the UI loop
#[derive(Debug)]
pub enum FetchMessage {
    /// A fetch-flow settled
    Completed {
        ticket: FetchTicket,
        outcome: FetchOutcome,
    },
}

/// Main application
pub struct App {
    state: AppState,
    settings: Settings,
    api: Arc<dyn FlowApi>,
    layout: Layout,
    fetch_tx: mpsc::Sender<FetchMessage>,
    fetch_rx: mpsc::Receiver<FetchMessage>,
}

impl App {
    /// Create a new application
    pub fn new(settings: Settings, api: Arc<dyn FlowApi>, store: Arc<dyn KeyValueStore>) -> Self {
        let machine = QueryMachine::new(store, settings.query_options());
        let state = AppState::new(
            machine,
            Duration::from_millis(settings.ui.sheen_interval_ms),
        );
        let layout = Layout::new(settings.ui.gauge_size);
        let (fetch_tx, fetch_rx) = mpsc::channel(16);

        Self {
            state,
            settings,
            api,
            layout,
            fetch_tx,
            fetch_rx,
        }
    }

    /// Run the application; `card` overrides the remembered card number
    pub async fn run(&mut self, card: Option<String>) -> Result<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore-on-start
        if let Some(ticket) = self.state.start(card.as_deref()) {
            self.start_fetch(ticket);
        }

        // Main loop
        let result = self.main_loop(&mut terminal).await;

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while self.state.running {
            // Draw UI
            terminal.draw(|frame| self.draw(frame))?;

            // Tick animations
            self.state.tick();

            // Handle events with timeout
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            // Process fetch results
            while let Ok(msg) = self.fetch_rx.try_recv() {
                self.apply_message(msg);
            }

            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Run the fetch-flow for `ticket` in the background
    fn start_fetch(&self, ticket: FetchTicket) {
        info!("Fetching flow data for card {}", ticket.card());
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_flow(api, ticket.card().to_string()).await;
            if tx
                .send(FetchMessage::Completed { ticket, outcome })
                .await
                .is_err()
            {
                debug!("UI loop gone, dropping fetch result");
            }
        });
    }

    fn apply_message(&mut self, msg: FetchMessage) {
        match msg {
            FetchMessage::Completed { ticket, outcome } => {
                match self.state.apply_fetch(&ticket, outcome) {
                    Completion::Applied(phase) => {
                        debug!("Fetch #{} applied: {}", ticket.seq(), phase.display_name())
                    }
                    Completion::Superseded => debug!("Fetch #{} superseded", ticket.seq()),
                }
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let ticket = match resolve_key(&self.state, code, modifiers) {
            KeyAction::None => None,
            KeyAction::Quit => {
                self.state.quit();
                None
            }
            KeyAction::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            KeyAction::CloseHelp => {
                self.state.show_help = false;
                None
            }
            KeyAction::Submit => self.state.submit_input(),
            KeyAction::Refresh => self.state.refresh(),
            KeyAction::ReturnToInput => {
                self.state.return_to_input();
                None
            }
            KeyAction::InsertChar(c) => {
                self.state.input_char(c);
                None
            }
            KeyAction::Backspace => {
                self.state.input_backspace();
                None
            }
            KeyAction::Delete => {
                self.state.input_delete();
                None
            }
            KeyAction::CursorLeft => {
                self.state.cursor_left();
                None
            }
            KeyAction::CursorRight => {
                self.state.cursor_right();
                None
            }
            KeyAction::CursorHome => {
                self.state.cursor_home();
                None
            }
            KeyAction::CursorEnd => {
                self.state.cursor_end();
                None
            }
        };

        if let Some(ticket) = ticket {
            self.start_fetch(ticket);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let state = &self.state;
        let query = state.query_state();
        let visibility = Visibility {
            input: state.is_input_mode(),
            error: query.error_message.is_some(),
            record: query.has_record(),
        };
        let areas = self.layout.calculate(frame.area(), visibility);

        frame.render_widget(Self::header(), areas.header);

        if let Some(gauge_area) = areas.gauge {
            if let Some(summary) = state.summary() {
                let block = Block::default()
                    .title(" Remaining ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Gray));
                let inner = block.inner(gauge_area);
                frame.render_widget(block, gauge_area);
                frame.render_widget(
                    LiquidGauge::new(summary.gauge_percent)
                        .size(self.settings.ui.gauge_size)
                        .fill_color(self.settings.ui.fill_color())
                        .background_color(self.settings.ui.background_color())
                        .sheen_frame(state.sheen_frame),
                    inner,
                );
            }
        }
        if let Some(details_area) = areas.details {
            FlowDetails::render(frame, details_area, state);
        }
        if let Some(placeholder_area) = areas.placeholder {
            FlowDetails::render_placeholder(frame, placeholder_area, state);
        }
        if let Some(input_area) = areas.input {
            InputWidget::render(frame, input_area, state);
        }
        if let (Some(error_area), Some(message)) = (areas.error, query.error_message.as_deref()) {
            ErrorBanner::render(frame, error_area, message);
        }

        StatusBar::render(frame, areas.status_bar, state);

        if state.show_help {
            let popup_area = self.layout.popup_area(frame.area(), 60, 70);
            HelpPopup::render(frame, popup_area);
        }
    }

    fn header() -> Paragraph<'static> {
        Paragraph::new(Line::from(vec![
            Span::styled(
                " simflow ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" SIM card data usage", Style::default().fg(Color::DarkGray)),
        ]))
    }
}
