use chrono::{DateTime, Utc};

use crate::flow::FlowRecord;

/// Lifecycle phase of the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for input
    #[default]
    Idle,
    /// Fetch-flow in flight
    Loading,
    /// A record is displayed
    Loaded,
    /// Last fetch failed; the error message is set
    Failed,
}

impl Phase {
    /// Short label for the status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Loading => "Loading",
            Phase::Loaded => "Loaded",
            Phase::Failed => "Failed",
        }
    }
}

/// Session-scoped query state. Only `card_identifier` is ever persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Identifier being queried or last queried
    pub card_identifier: String,
    pub phase: Phase,
    /// Record shown in the details panel
    pub record: Option<FlowRecord>,
    /// Message shown in the error box
    pub error_message: Option<String>,
    /// Whether the entry form is shown
    pub input_visible: bool,
    /// When `record` was applied
    pub fetched_at: Option<DateTime<Utc>>,
}

impl QueryState {
    /// Fresh state at session start
    pub fn new() -> Self {
        Self {
            card_identifier: String::new(),
            phase: Phase::Idle,
            record: None,
            error_message: None,
            input_visible: true,
            fetched_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}
