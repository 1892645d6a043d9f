//! Compliance-audit input rows and evaluator output.

use serde::{Deserialize, Serialize};

/// Sentinel reason for a compliant audit entry.
pub const REASON_OK: &str = "OK";

/// One row of a new batch upload awaiting compliance evaluation.
///
/// The manufacturing date stays raw text: whether it parses as a calendar
/// date is itself one of the compliance rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    pub batch_id: String,
    pub product_name: String,
    pub mfg_date: String,
    pub location: String,
}

/// One row of the historical reference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRow {
    pub batch_id: String,
    pub product_name: String,
    pub mfg_date: String,
    pub location: String,
    pub status: String,
}

/// Evaluator verdict for one input row.
///
/// `reason` equals [`REASON_OK`] when compliant and cites the violated rule
/// otherwise. Field names serialize in camelCase to match the wire shape
/// external evaluators produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub batch_id: String,
    pub product_name: String,
    pub is_compliant: bool,
    pub reason: String,
}

impl AuditEntry {
    /// True when the entry's shape satisfies the evaluator output contract:
    /// identifying fields present, reason present, and the sentinel reason
    /// used exactly for compliant rows.
    pub fn is_well_formed(&self) -> bool {
        if self.batch_id.trim().is_empty()
            || self.product_name.trim().is_empty()
            || self.reason.trim().is_empty()
        {
            return false;
        }
        !self.is_compliant || self.reason == REASON_OK
    }
}

/// Aggregate counts over an audit result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total: usize,
    pub compliant: usize,
    pub flagged: usize,
}

/// Summarize an evaluator output into compliant/flagged counts.
pub fn summarize(entries: &[AuditEntry]) -> AuditSummary {
    let compliant = entries.iter().filter(|e| e.is_compliant).count();
    AuditSummary {
        total: entries.len(),
        compliant,
        flagged: entries.len() - compliant,
    }
}
