//! Display metrics derived from a [`FlowRecord`]. All functions are pure.

use serde::Serialize;

use super::types::FlowRecord;

/// MB per GB for display conversion
const MB_PER_GB: f64 = 1024.0;

/// Share of the quota still available, in percent.
///
/// Not guarded: a zero total yields `NaN` or an infinity, which the gauge
/// displays as 0.
pub fn remaining_percentage(record: &FlowRecord) -> f64 {
    record.remaining_mb / record.total_quota_mb * 100.0
}

/// Share of the quota consumed, rounded to a whole percent. Exactly 0 when the
/// total is 0.
pub fn usage_percentage(consumed_mb: f64, total_quota_mb: f64) -> i64 {
    if total_quota_mb == 0.0 {
        return 0;
    }
    (consumed_mb / total_quota_mb * 100.0).round() as i64
}

/// Convert MB to GB rounded to two decimal places
pub fn display_gb(value_mb: f64) -> f64 {
    (value_mb / MB_PER_GB * 100.0).round() / 100.0
}

/// Everything the details panel shows for one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSummary {
    pub total_gb: f64,
    pub consumed_gb: f64,
    pub remaining_gb: f64,
    /// Rounded usage share (0 when the total is 0)
    pub usage_percent: i64,
    /// Unclamped remaining share fed to the gauge
    pub gauge_percent: f64,
    pub expiry_label: String,
}

impl FlowSummary {
    /// Derive the summary for a record
    pub fn from_record(record: &FlowRecord) -> Self {
        Self {
            total_gb: display_gb(record.total_quota_mb),
            consumed_gb: display_gb(record.consumed_mb),
            remaining_gb: display_gb(record.remaining_mb),
            usage_percent: usage_percentage(record.consumed_mb, record.total_quota_mb),
            gauge_percent: remaining_percentage(record),
            expiry_label: record.expiry_label.clone(),
        }
    }
}
