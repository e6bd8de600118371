use std::time::{Duration, Instant};

use tracing::debug;

use simflow_core::flow::{FetchOutcome, FlowSummary};
use simflow_core::query::{Completion, FetchTicket, QueryMachine, QueryState};

/// Spinner frames for the loading indicator
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner frame duration
const SPINNER_INTERVAL: Duration = Duration::from_millis(150);

/// Application state: the query machine plus everything the screen needs
/// that the machine does not own (input buffer, animation frames, popups).
pub struct AppState {
    /// Query state machine
    pub query: QueryMachine,
    /// Whether the app is running
    pub running: bool,
    /// Whether help popup is shown
    pub show_help: bool,
    /// Card number being typed
    pub input_buffer: String,
    /// Cursor position in input buffer (byte offset)
    pub cursor_position: usize,
    /// Spinner animation frame counter
    pub spinner_frame: usize,
    /// Sheen animation frame counter (free-running)
    pub sheen_frame: usize,
    last_spinner_update: Instant,
    last_sheen_update: Instant,
    sheen_interval: Duration,
}

impl AppState {
    /// Create a new application state around a query machine
    pub fn new(query: QueryMachine, sheen_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            query,
            running: true,
            show_help: false,
            input_buffer: String::new(),
            cursor_position: 0,
            spinner_frame: 0,
            sheen_frame: 0,
            last_spinner_update: now,
            last_sheen_update: now,
            sheen_interval,
        }
    }

    /// Current query state
    pub fn query_state(&self) -> &QueryState {
        self.query.state()
    }

    /// Metrics for the loaded record
    pub fn summary(&self) -> Option<FlowSummary> {
        self.query.summary()
    }

    /// Whether keystrokes go to the card entry form
    pub fn is_input_mode(&self) -> bool {
        self.query.state().input_visible
    }

    /// Whether a fetch-flow is in flight
    pub fn is_loading(&self) -> bool {
        self.query.state().is_loading()
    }

    /// Advance animations (time-based)
    pub fn tick(&mut self) {
        if self.last_spinner_update.elapsed() >= SPINNER_INTERVAL {
            self.last_spinner_update = Instant::now();
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        if self.last_sheen_update.elapsed() >= self.sheen_interval {
            self.last_sheen_update = Instant::now();
            self.sheen_frame = self.sheen_frame.wrapping_add(1);
        }
    }

    /// Get the current spinner character
    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Stop the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Toggle help popup
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // =========================================
    // Query transitions
    // =========================================

    /// Start from the persisted card, or from `card` when given
    pub fn start(&mut self, card: Option<&str>) -> Option<FetchTicket> {
        if let Some(card) = card {
            self.set_input(card);
            return self.submit_input();
        }
        let ticket = self.query.restore();
        self.sync_input_from_query();
        ticket
    }

    /// Submit the input buffer
    pub fn submit_input(&mut self) -> Option<FetchTicket> {
        match self.query.submit(&self.input_buffer) {
            Ok(ticket) => Some(ticket),
            Err(e) => {
                debug!("Submit refused: {}", e);
                None
            }
        }
    }

    /// Refresh the loaded card
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        match self.query.refresh() {
            Ok(ticket) => Some(ticket),
            Err(e) => {
                debug!("Refresh refused: {}", e);
                None
            }
        }
    }

    /// Show the entry form again, prefilled with the last card
    pub fn return_to_input(&mut self) {
        self.query.return_to_input();
        self.sync_input_from_query();
    }

    /// Feed a finished fetch-flow back into the machine
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Completion {
        self.query.complete(ticket, outcome)
    }

    fn sync_input_from_query(&mut self) {
        let card = self.query.state().card_identifier.clone();
        self.set_input(&card);
    }

    // =========================================
    // Input buffer
    // =========================================

    /// Replace the buffer and move the cursor to its end
    pub fn set_input(&mut self, text: &str) {
        self.input_buffer = text.to_string();
        self.cursor_position = self.input_buffer.len();
    }

    /// Get the input buffer
    pub fn get_input(&self) -> &str {
        &self.input_buffer
    }

    /// Get cursor position
    pub fn get_cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Insert a character at cursor position
    pub fn input_char(&mut self, c: char) {
        self.input_buffer.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    /// Delete character before cursor (backspace)
    pub fn input_backspace(&mut self) {
        if self.cursor_position > 0 {
            let prev = self.prev_boundary();
            self.input_buffer.remove(prev);
            self.cursor_position = prev;
        }
    }

    /// Delete character at cursor (delete key)
    pub fn input_delete(&mut self) {
        if self.cursor_position < self.input_buffer.len() {
            self.input_buffer.remove(self.cursor_position);
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.prev_boundary();
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if let Some(c) = self.input_buffer[self.cursor_position..].chars().next() {
            self.cursor_position += c.len_utf8();
        }
    }

    /// Move cursor to start
    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    /// Move cursor to end
    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.len();
    }

    fn prev_boundary(&self) -> usize {
        self.input_buffer[..self.cursor_position]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}
