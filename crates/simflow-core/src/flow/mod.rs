//! SIM card flow data: fetch it from the remote service and derive display metrics.
//!
//! A query is a two-step protocol. The refresh endpoint is hit first so the
//! remote system recomputes usage, its response is thrown away, and only then
//! is the read endpoint asked for the authoritative numbers.

pub mod client;
pub mod fetcher;
pub mod metrics;
pub mod types;

pub use client::{FetchError, FlowApi, HttpFlowApi, DEFAULT_BASE_URL, READ_PATH, REFRESH_PATH};
pub use fetcher::{fetch_flow, run_fetch_flow, FetchOutcome};
pub use metrics::{display_gb, remaining_percentage, usage_percentage, FlowSummary};
pub use types::{FlowRecord, ReadResponse, MISSING_CODE, OK_CODE};
