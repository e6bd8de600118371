//! Wire types for the SIM card flow endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `code` value the read endpoint reports on success
pub const OK_CODE: i64 = 0;
/// Stand-in `code` for a body that omits it; never equal to `OK_CODE`
pub const MISSING_CODE: i64 = -1;

/// Usage statistics for one card (the `data` payload of the read endpoint)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Total allotment for the billing period, in MB
    #[serde(rename = "sumFlow")]
    pub total_quota_mb: f64,
    /// Amount used so far, in MB. Not checked against the total.
    #[serde(rename = "consumeFlow")]
    pub consumed_mb: f64,
    /// Amount left, in MB. Reported independently and may disagree with
    /// `total_quota_mb - consumed_mb`.
    #[serde(rename = "surplusFlow")]
    pub remaining_mb: f64,
    /// Expiration as the server formats it; never parsed as a date
    #[serde(rename = "maxEndTime", default, deserialize_with = "null_as_empty")]
    pub expiry_label: String,
    /// Everything else the server sends (`cellStyleMap`, `isChange`, `endRemind`, ...)
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

/// Envelope returned by the read endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    /// Status code, `OK_CODE` on success; `MISSING_CODE` when absent
    #[serde(default = "missing_code")]
    pub code: i64,
    /// Success flag; absent reads as `false`
    #[serde(default)]
    pub status: bool,
    /// Human-readable message, set when the query is rejected
    #[serde(default)]
    pub msg: Option<String>,
    /// Payload, kept raw until the envelope says it is a success
    #[serde(default)]
    pub data: Value,
}

impl ReadResponse {
    /// Whether both the success flag and the status code report success
    pub fn is_ok(&self) -> bool {
        self.status && self.code == OK_CODE
    }

    /// Decode the payload. `Ok(None)` when the server sent no payload.
    pub fn record(&self) -> Result<Option<FlowRecord>, serde_json::Error> {
        if self.data.is_null() {
            return Ok(None);
        }
        FlowRecord::deserialize(&self.data).map(Some)
    }
}

fn missing_code() -> i64 {
    MISSING_CODE
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_success_response() {
        let body = json!({
            "code": 0,
            "status": true,
            "msg": "ok",
            "data": {
                "sumFlow": 10240,
                "consumeFlow": 3072.5,
                "surplusFlow": 7167.5,
                "maxEndTime": "2025-12-31",
                "isChange": 1,
                "endRemind": false,
                "cellStyleMap": {"sumFlow": "red"}
            }
        });

        let response: ReadResponse = serde_json::from_value(body).unwrap();
        assert!(response.is_ok());

        let record = response.record().unwrap().unwrap();
        assert_eq!(record.total_quota_mb, 10240.0);
        assert_eq!(record.consumed_mb, 3072.5);
        assert_eq!(record.remaining_mb, 7167.5);
        assert_eq!(record.expiry_label, "2025-12-31");
        assert_eq!(record.passthrough.get("isChange"), Some(&json!(1)));
        assert_eq!(record.passthrough.get("endRemind"), Some(&json!(false)));
        assert_eq!(
            record.passthrough.get("cellStyleMap"),
            Some(&json!({"sumFlow": "red"}))
        );
    }

    #[test]
    fn test_parse_rejection_without_data() {
        let response: ReadResponse =
            serde_json::from_value(json!({"status": false, "code": 5, "msg": "card not found"}))
                .unwrap();
        assert!(!response.is_ok());
        assert_eq!(response.msg.as_deref(), Some("card not found"));
        assert_eq!(response.record().unwrap(), None);
    }

    #[test]
    fn test_parse_rejection_without_flags() {
        let response: ReadResponse =
            serde_json::from_value(json!({"code": 500, "msg": "card not found"})).unwrap();
        assert!(!response.status);
        assert!(!response.is_ok());
        assert_eq!(response.msg.as_deref(), Some("card not found"));

        let response: ReadResponse =
            serde_json::from_value(json!({"status": true, "msg": "no code"})).unwrap();
        assert_eq!(response.code, MISSING_CODE);
        assert!(!response.is_ok());
    }

    #[test]
    fn test_is_ok_requires_both_flags() {
        let mut response = ReadResponse {
            code: 0,
            status: false,
            msg: None,
            data: Value::Null,
        };
        assert!(!response.is_ok());

        response.status = true;
        response.code = 3;
        assert!(!response.is_ok());

        response.code = OK_CODE;
        assert!(response.is_ok());
    }

    #[test]
    fn test_null_expiry_reads_as_empty() {
        let record: FlowRecord = serde_json::from_value(json!({
            "sumFlow": 1, "consumeFlow": 0, "surplusFlow": 1, "maxEndTime": null
        }))
        .unwrap();
        assert_eq!(record.expiry_label, "");
        assert!(record.passthrough.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let response: ReadResponse = serde_json::from_value(
            json!({"status": true, "code": 0, "data": {"sumFlow": "lots"}}),
        )
        .unwrap();
        assert!(response.record().is_err());
    }
}
