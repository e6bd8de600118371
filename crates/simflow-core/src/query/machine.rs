//! Transitions of the query state machine.
//!
//! The machine never performs I/O on the network itself. Starting a fetch
//! hands out a [`FetchTicket`]; the caller runs the fetch-flow for that ticket
//! and feeds the outcome back through [`QueryMachine::complete`]. Each ticket
//! carries a sequence number and only the most recently issued one may change
//! state, so a slow response can never overwrite a newer request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::state::{Phase, QueryState};
use crate::flow::{FetchOutcome, FlowRecord, FlowSummary};
use crate::store::{KeyValueStore, CARD_NUMBER_KEY};

/// Shown when submitting an empty identifier
pub const EMPTY_IDENTIFIER_MESSAGE: &str = "Please enter a card number";
/// Shown when the server rejects a query without a message
pub const REJECTED_FALLBACK_MESSAGE: &str = "Failed to fetch flow data";
/// Shown for any transport-level failure of the read call
pub const TRANSPORT_ERROR_MESSAGE: &str = "Network request failed, please check your connection";

/// Why a transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("card identifier is empty")]
    EmptyIdentifier,
    #[error("a query is already in progress")]
    Busy,
    #[error("no record loaded to refresh")]
    NothingToRefresh,
}

/// Behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Hide the entry form after a successful fetch
    pub auto_hide_form: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            auto_hide_form: true,
        }
    }
}

/// Handle for one fetch-flow invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    card: String,
}

impl FetchTicket {
    /// Sequence number, increasing per started fetch
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Identifier to fetch
    pub fn card(&self) -> &str {
        &self.card
    }
}

/// What `complete` did with an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// State updated; carries the resulting phase
    Applied(Phase),
    /// A newer fetch was started (or the query abandoned); outcome dropped
    Superseded,
}

/// Owns the [`QueryState`] and the injected persistence capability
pub struct QueryMachine {
    store: Arc<dyn KeyValueStore>,
    options: QueryOptions,
    state: QueryState,
    latest_seq: u64,
}

impl QueryMachine {
    /// Create a machine in the `Idle` phase with the entry form shown
    pub fn new(store: Arc<dyn KeyValueStore>, options: QueryOptions) -> Self {
        Self {
            store,
            options,
            state: QueryState::new(),
            latest_seq: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Metrics for the loaded record, if any
    pub fn summary(&self) -> Option<FlowSummary> {
        self.state.record.as_ref().map(FlowSummary::from_record)
    }

    /// Restore-on-start: if an identifier was persisted, start fetching it.
    ///
    /// A store that cannot be read is treated as empty. The saved value is
    /// trimmed like manual input, so a blank entry restores nothing.
    pub fn restore(&mut self) -> Option<FetchTicket> {
        let saved = match self.store.get(CARD_NUMBER_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read persisted card number: {:#}", e);
                None
            }
        };

        let card = saved
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())?;

        info!("Restoring persisted card {}", card);
        self.state.card_identifier = card.clone();
        Some(self.begin_fetch(card))
    }

    /// Manual submit of user input
    pub fn submit(&mut self, input: &str) -> Result<FetchTicket, QueryError> {
        if self.state.is_loading() {
            return Err(QueryError::Busy);
        }

        let card = input.trim();
        if card.is_empty() {
            self.state.error_message = Some(EMPTY_IDENTIFIER_MESSAGE.to_string());
            return Err(QueryError::EmptyIdentifier);
        }

        self.state.card_identifier = card.to_string();
        Ok(self.begin_fetch(card.to_string()))
    }

    /// Re-run the fetch-flow for the loaded identifier
    pub fn refresh(&mut self) -> Result<FetchTicket, QueryError> {
        if self.state.is_loading() {
            return Err(QueryError::Busy);
        }
        if !self.state.has_record() {
            return Err(QueryError::NothingToRefresh);
        }

        let card = self.state.card_identifier.clone();
        Ok(self.begin_fetch(card))
    }

    /// Return-to-input: drop the record and error and show the form.
    ///
    /// The persisted identifier is kept. A fetch still in flight is
    /// abandoned and its outcome will be reported as superseded.
    pub fn return_to_input(&mut self) {
        if self.state.is_loading() {
            self.latest_seq += 1;
        }
        self.state.phase = Phase::Idle;
        self.state.record = None;
        self.state.fetched_at = None;
        self.state.error_message = None;
        self.state.input_visible = true;
    }

    /// Apply the outcome of the fetch-flow started for `ticket`
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Completion {
        if ticket.seq != self.latest_seq || !self.state.is_loading() {
            debug!(
                "Dropping outcome of superseded fetch #{} (latest #{})",
                ticket.seq, self.latest_seq
            );
            return Completion::Superseded;
        }

        match outcome {
            Ok(response) if response.is_ok() => match response.record() {
                Ok(Some(record)) => self.apply_record(&ticket.card, record),
                Ok(None) => {
                    warn!("Flow read for card {} succeeded without payload", ticket.card);
                    self.fail(TRANSPORT_ERROR_MESSAGE.to_string());
                }
                Err(e) => {
                    warn!("Flow payload for card {} is malformed: {}", ticket.card, e);
                    self.fail(TRANSPORT_ERROR_MESSAGE.to_string());
                }
            },
            Ok(response) => {
                info!(
                    "Flow query for card {} rejected: code={} msg={:?}",
                    ticket.card, response.code, response.msg
                );
                let message = response
                    .msg
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string());
                self.fail(message);
            }
            Err(e) => {
                warn!("Flow read for card {} failed: {}", ticket.card, e);
                self.fail(TRANSPORT_ERROR_MESSAGE.to_string());
            }
        }

        Completion::Applied(self.state.phase)
    }

    fn begin_fetch(&mut self, card: String) -> FetchTicket {
        self.latest_seq += 1;
        self.state.phase = Phase::Loading;
        self.state.error_message = None;
        debug!("Starting fetch #{} for card {}", self.latest_seq, card);

        FetchTicket {
            seq: self.latest_seq,
            card,
        }
    }

    fn apply_record(&mut self, card: &str, record: FlowRecord) {
        self.state.phase = Phase::Loaded;
        self.state.record = Some(record);
        self.state.fetched_at = Some(chrono::Utc::now());
        self.state.error_message = None;
        self.state.input_visible = !self.options.auto_hide_form;

        if let Err(e) = self.store.set(CARD_NUMBER_KEY, card) {
            warn!("Failed to persist card number: {:#}", e);
        }
    }

    fn fail(&mut self, message: String) {
        self.state.phase = Phase::Failed;
        self.state.record = None;
        self.state.fetched_at = None;
        self.state.error_message = Some(message);
        self.state.input_visible = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{run_fetch_flow, FetchError, ReadResponse};
    use crate::store::MemoryStore;
    use crate::testing::{rejection, success, ApiCall, ScriptedApi};
    use pretty_assertions::assert_eq;

    fn machine_with(store: Arc<MemoryStore>) -> QueryMachine {
        QueryMachine::new(store, QueryOptions::default())
    }

    fn persisted(store: &MemoryStore) -> Option<String> {
        store.get(CARD_NUMBER_KEY).unwrap()
    }

    /// Store whose reads and writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("disk on fire")
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk on fire")
        }
    }

    #[test]
    fn test_restore_and_load() {
        let store = Arc::new(MemoryStore::with_entry(CARD_NUMBER_KEY, "123456"));
        let mut machine = machine_with(store.clone());
        let api = ScriptedApi::new(Ok(success(10240.0, 3072.0, 7168.0)));

        let ticket = machine.restore().expect("persisted card should start a fetch");
        assert_eq!(ticket.card(), "123456");
        assert_eq!(machine.state().phase, Phase::Loading);
        assert_eq!(machine.state().card_identifier, "123456");

        let outcome = run_fetch_flow(&api, ticket.card());
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::Refresh("123456".to_string()),
                ApiCall::Read("123456".to_string()),
            ]
        );

        assert_eq!(
            machine.complete(&ticket, outcome),
            Completion::Applied(Phase::Loaded)
        );
        let state = machine.state();
        assert!(!state.input_visible);
        assert!(state.error_message.is_none());
        assert!(state.fetched_at.is_some());
        assert_eq!(state.record.as_ref().unwrap().expiry_label, "2025-12-31");

        let summary = machine.summary().unwrap();
        assert_eq!(format!("{:.2}", summary.total_gb), "10.00");
        assert_eq!(format!("{:.2}", summary.consumed_gb), "3.00");
        assert_eq!(format!("{:.2}", summary.remaining_gb), "7.00");
        assert_eq!(summary.usage_percent, 30);
        assert_eq!(summary.gauge_percent, 70.0);

        assert_eq!(persisted(&store).as_deref(), Some("123456"));
    }

    #[test]
    fn test_restore_without_persisted_card() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        assert!(machine.restore().is_none());
        assert_eq!(machine.state().phase, Phase::Idle);
        assert!(machine.state().input_visible);
    }

    #[test]
    fn test_restore_ignores_blank_entry() {
        let store = Arc::new(MemoryStore::with_entry(CARD_NUMBER_KEY, "   "));
        let mut machine = machine_with(store);
        assert!(machine.restore().is_none());
        assert_eq!(machine.state().phase, Phase::Idle);
    }

    #[test]
    fn test_restore_with_unreadable_store() {
        let mut machine = QueryMachine::new(Arc::new(BrokenStore), QueryOptions::default());
        assert!(machine.restore().is_none());
        assert_eq!(machine.state().phase, Phase::Idle);
    }

    #[test]
    fn test_empty_submit_is_rejected_locally() {
        let store = Arc::new(MemoryStore::new());
        let mut machine = machine_with(store.clone());

        assert_eq!(machine.submit("   "), Err(QueryError::EmptyIdentifier));

        let state = machine.state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.input_visible);
        assert_eq!(state.error_message.as_deref(), Some(EMPTY_IDENTIFIER_MESSAGE));
        assert_eq!(persisted(&store), None);
    }

    #[test]
    fn test_submit_trims_and_clears_error() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let _ = machine.submit("");

        let ticket = machine.submit("  8986  ").unwrap();

        assert_eq!(ticket.card(), "8986");
        assert_eq!(machine.state().card_identifier, "8986");
        assert_eq!(machine.state().phase, Phase::Loading);
        assert!(machine.state().error_message.is_none());
    }

    #[test]
    fn test_remote_rejection() {
        let store = Arc::new(MemoryStore::new());
        let mut machine = machine_with(store.clone());
        let api = ScriptedApi::new(Ok(rejection(5, "card not found")));

        let ticket = machine.submit("000").unwrap();
        let completion = machine.complete(&ticket, run_fetch_flow(&api, ticket.card()));

        assert_eq!(completion, Completion::Applied(Phase::Failed));
        let state = machine.state();
        assert_eq!(state.error_message.as_deref(), Some("card not found"));
        assert!(state.input_visible);
        assert!(state.record.is_none());
        assert!(machine.summary().is_none());
        assert_eq!(persisted(&store), None);
    }

    #[test]
    fn test_rejection_without_message_uses_fallback() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();

        let mut response = rejection(7, "");
        machine.complete(&ticket, Ok(response.clone()));
        assert_eq!(
            machine.state().error_message.as_deref(),
            Some(REJECTED_FALLBACK_MESSAGE)
        );

        let ticket = machine.submit("1").unwrap();
        response.msg = None;
        machine.complete(&ticket, Ok(response));
        assert_eq!(
            machine.state().error_message.as_deref(),
            Some(REJECTED_FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn test_success_flag_with_bad_code_fails() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();

        let mut response = success(1.0, 0.0, 1.0);
        response.code = 2;
        response.msg = Some("quota system busy".to_string());

        assert_eq!(
            machine.complete(&ticket, Ok(response)),
            Completion::Applied(Phase::Failed)
        );
        assert_eq!(
            machine.state().error_message.as_deref(),
            Some("quota system busy")
        );
    }

    #[test]
    fn test_transport_error() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();

        machine.complete(&ticket, Err(FetchError::Status(503)));

        let state = machine.state();
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.error_message.as_deref(), Some(TRANSPORT_ERROR_MESSAGE));
        assert!(state.input_visible);
    }

    #[test]
    fn test_success_without_payload_is_transport_error() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();
        let response = ReadResponse {
            code: 0,
            status: true,
            msg: None,
            data: serde_json::Value::Null,
        };

        machine.complete(&ticket, Ok(response));

        assert_eq!(machine.state().phase, Phase::Failed);
        assert_eq!(
            machine.state().error_message.as_deref(),
            Some(TRANSPORT_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_loading_blocks_duplicate_triggers() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();

        assert_eq!(machine.submit("2"), Err(QueryError::Busy));
        assert_eq!(machine.refresh(), Err(QueryError::Busy));
        assert_eq!(machine.state().card_identifier, "1");

        machine.complete(&ticket, Ok(success(1.0, 0.0, 1.0)));
        assert_eq!(machine.state().phase, Phase::Loaded);
    }

    #[test]
    fn test_refresh_requires_record() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        assert_eq!(machine.refresh(), Err(QueryError::NothingToRefresh));

        let ticket = machine.submit("1").unwrap();
        machine.complete(&ticket, Err(FetchError::Transport("down".into())));
        assert_eq!(machine.refresh(), Err(QueryError::NothingToRefresh));
    }

    #[test]
    fn test_refresh_reuses_identifier() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("555").unwrap();
        machine.complete(&ticket, Ok(success(2048.0, 512.0, 1536.0)));

        let refresh = machine.refresh().unwrap();

        assert_eq!(refresh.card(), "555");
        assert!(refresh.seq() > ticket.seq());
        assert_eq!(machine.state().phase, Phase::Loading);
        // Record stays visible while refreshing
        assert!(machine.state().has_record());

        machine.complete(&refresh, Ok(success(2048.0, 1024.0, 1024.0)));
        assert_eq!(machine.summary().unwrap().usage_percent, 50);
    }

    #[test]
    fn test_stale_outcome_is_dropped() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let first = machine.submit("1").unwrap();
        machine.complete(&first, Ok(success(1.0, 0.0, 1.0)));
        let second = machine.refresh().unwrap();

        // Late duplicate of the first ticket must not touch state
        assert_eq!(
            machine.complete(&first, Err(FetchError::Transport("late".into()))),
            Completion::Superseded
        );
        assert_eq!(machine.state().phase, Phase::Loading);

        assert_eq!(
            machine.complete(&second, Ok(success(1.0, 1.0, 0.0))),
            Completion::Applied(Phase::Loaded)
        );
        // Completing the same ticket twice is a no-op
        assert_eq!(
            machine.complete(&second, Err(FetchError::Status(500))),
            Completion::Superseded
        );
        assert_eq!(machine.state().phase, Phase::Loaded);
    }

    #[test]
    fn test_return_to_input() {
        let store = Arc::new(MemoryStore::new());
        let mut machine = machine_with(store.clone());
        let ticket = machine.submit("42").unwrap();
        machine.complete(&ticket, Ok(success(1.0, 0.0, 1.0)));
        assert!(!machine.state().input_visible);

        machine.return_to_input();

        let state = machine.state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.input_visible);
        assert!(state.record.is_none());
        assert!(state.error_message.is_none());
        assert_eq!(persisted(&store).as_deref(), Some("42"));
    }

    #[test]
    fn test_return_to_input_abandons_pending_fetch() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("42").unwrap();

        machine.return_to_input();

        assert_eq!(
            machine.complete(&ticket, Ok(success(1.0, 0.0, 1.0))),
            Completion::Superseded
        );
        assert_eq!(machine.state().phase, Phase::Idle);
        assert!(machine.state().record.is_none());
    }

    #[test]
    fn test_always_show_form_option() {
        let mut machine = QueryMachine::new(
            Arc::new(MemoryStore::new()),
            QueryOptions {
                auto_hide_form: false,
            },
        );
        let ticket = machine.submit("1").unwrap();
        machine.complete(&ticket, Ok(success(1.0, 0.0, 1.0)));

        assert_eq!(machine.state().phase, Phase::Loaded);
        assert!(machine.state().input_visible);
    }

    #[test]
    fn test_persist_failure_is_not_fatal() {
        let mut machine = QueryMachine::new(Arc::new(BrokenStore), QueryOptions::default());
        let ticket = machine.submit("1").unwrap();

        machine.complete(&ticket, Ok(success(1.0, 0.0, 1.0)));

        assert_eq!(machine.state().phase, Phase::Loaded);
    }

    #[test]
    fn test_zero_quota_record_loads() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();
        machine.complete(&ticket, Ok(success(0.0, 0.0, 0.0)));

        let summary = machine.summary().unwrap();
        assert_eq!(summary.usage_percent, 0);
        assert!(summary.gauge_percent.is_nan());
        assert_eq!(crate::gauge::GaugeModel::new(summary.gauge_percent).readout(), "0%");
    }

    #[test]
    fn test_zero_quota_with_remaining_reads_empty() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("1").unwrap();
        machine.complete(&ticket, Ok(success(0.0, 0.0, 512.0)));

        let summary = machine.summary().unwrap();
        assert_eq!(summary.usage_percent, 0);
        assert!(summary.gauge_percent.is_infinite());
        let gauge = crate::gauge::GaugeModel::new(summary.gauge_percent);
        assert_eq!(gauge.percentage(), 0.0);
        assert_eq!(gauge.readout(), "0%");
    }

    #[test]
    fn test_rejection_body_without_status_shows_server_message() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("77").unwrap();
        let response: ReadResponse =
            serde_json::from_str(r#"{"code":500,"msg":"card not found"}"#).unwrap();

        assert_eq!(
            machine.complete(&ticket, Ok(response)),
            Completion::Applied(Phase::Failed)
        );
        assert_eq!(
            machine.state().error_message.as_deref(),
            Some("card not found")
        );
        assert!(machine.state().input_visible);
    }

    #[test]
    fn test_failed_refresh_clears_loaded_record() {
        let mut machine = machine_with(Arc::new(MemoryStore::new()));
        let ticket = machine.submit("555").unwrap();
        machine.complete(&ticket, Ok(success(2048.0, 512.0, 1536.0)));
        assert!(machine.state().has_record());

        let refresh = machine.refresh().unwrap();
        machine.complete(&refresh, Err(FetchError::Status(502)));

        let state = machine.state();
        assert_eq!(state.phase, Phase::Failed);
        assert!(state.record.is_none());
        assert!(state.fetched_at.is_none());
        assert!(machine.summary().is_none());
        assert_eq!(state.error_message.as_deref(), Some(TRANSPORT_ERROR_MESSAGE));
        assert_eq!(state.card_identifier, "555");
    }
}
