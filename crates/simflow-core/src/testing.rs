//! Test doubles shared by the core unit tests.

use parking_lot::Mutex;
use serde_json::json;

use crate::flow::{FetchError, FetchOutcome, FlowApi, ReadResponse};

/// A call observed by [`ScriptedApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Refresh(String),
    Read(String),
}

/// [`FlowApi`] that records calls and replays canned results
pub struct ScriptedApi {
    calls: Mutex<Vec<ApiCall>>,
    refresh_result: Result<(), FetchError>,
    read_result: FetchOutcome,
}

impl ScriptedApi {
    pub fn new(read_result: FetchOutcome) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            refresh_result: Ok(()),
            read_result,
        }
    }

    pub fn with_refresh_result(mut self, result: Result<(), FetchError>) -> Self {
        self.refresh_result = result;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }
}

impl FlowApi for ScriptedApi {
    fn trigger_refresh(&self, card: &str) -> Result<(), FetchError> {
        self.calls.lock().push(ApiCall::Refresh(card.to_string()));
        self.refresh_result.clone()
    }

    fn read_card(&self, card: &str) -> Result<ReadResponse, FetchError> {
        self.calls.lock().push(ApiCall::Read(card.to_string()));
        self.read_result.clone()
    }
}

/// Successful read envelope for the given MB figures
pub fn success(total: f64, consumed: f64, remaining: f64) -> ReadResponse {
    ReadResponse {
        code: 0,
        status: true,
        msg: Some(String::new()),
        data: json!({
            "sumFlow": total,
            "consumeFlow": consumed,
            "surplusFlow": remaining,
            "maxEndTime": "2025-12-31",
            "isChange": 0,
            "endRemind": false,
            "cellStyleMap": {}
        }),
    }
}

/// Rejected read envelope without payload
pub fn rejection(code: i64, msg: &str) -> ReadResponse {
    ReadResponse {
        code,
        status: false,
        msg: Some(msg.to_string()),
        data: serde_json::Value::Null,
    }
}
