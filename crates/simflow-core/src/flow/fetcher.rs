//! The two-step fetch-flow: refresh (result discarded), then read.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::{FetchError, FlowApi};
use super::types::ReadResponse;

/// Result of one fetch-flow as seen by the query state machine
pub type FetchOutcome = Result<ReadResponse, FetchError>;

/// Run the fetch-flow for `card` on the calling thread.
///
/// The refresh call always settles before the read is issued. Whatever the
/// refresh call returns, including a transport failure, is dropped here.
pub fn run_fetch_flow(api: &dyn FlowApi, card: &str) -> FetchOutcome {
    match api.trigger_refresh(card) {
        Ok(()) => debug!("Flow refresh accepted for card {}", card),
        Err(e) => debug!("Flow refresh for card {} ignored: {}", card, e),
    }

    let response = api.read_card(card)?;
    info!(
        "Flow read for card {}: status={} code={}",
        card, response.status, response.code
    );
    Ok(response)
}

/// Run the fetch-flow on tokio's blocking pool.
///
/// A panicking worker is reported as a transport failure so the caller never
/// stays in its loading state.
pub async fn fetch_flow(api: Arc<dyn FlowApi>, card: String) -> FetchOutcome {
    match tokio::task::spawn_blocking(move || run_fetch_flow(api.as_ref(), &card)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Fetch-flow task failed: {}", e);
            Err(FetchError::Transport(format!("fetch task failed: {}", e)))
        }
    }
}
