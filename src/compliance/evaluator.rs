//! Deterministic compliance evaluator and external-output validation.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::domain::{AuditEntry, BatchRow, HistoricalRow, REASON_OK};
use crate::infra::{ComplianceEvaluator, LedgerError, Result};

use super::rules::{evaluate_row, History};

/// Rules-engine implementation of the compliance evaluator.
///
/// The reference system delegated this judgment to an external inference
/// service; the rule set is the acceptance contract either way, so this
/// implementation applies the rules directly. The evaluation date is
/// injected so "no future dates" is deterministic under test.
pub struct RuleEvaluator {
    evaluation_date: NaiveDate,
}

impl RuleEvaluator {
    pub fn new(evaluation_date: NaiveDate) -> Self {
        Self { evaluation_date }
    }

    /// Evaluator pinned to the current UTC date.
    pub fn for_today() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

#[async_trait]
impl ComplianceEvaluator for RuleEvaluator {
    async fn evaluate(
        &self,
        new_rows: &[BatchRow],
        history: &[HistoricalRow],
    ) -> Result<Vec<AuditEntry>> {
        let index = History::index(history);
        let entries = new_rows
            .iter()
            .map(|row| {
                let verdict = evaluate_row(row, &index, self.evaluation_date);
                if let Some(v) = &verdict {
                    debug!(batch_id = %row.batch_id, rule = v.rule.name(), "batch flagged");
                }
                AuditEntry {
                    batch_id: row.batch_id.clone(),
                    product_name: row.product_name.clone(),
                    is_compliant: verdict.is_none(),
                    reason: verdict.map_or_else(|| REASON_OK.to_string(), |v| v.detail),
                }
            })
            .collect();
        Ok(entries)
    }
}

/// Decode an external evaluator's JSON response.
///
/// The whole call fails on wrong shape, wrong entry count, or missing
/// required fields; partial results are never accepted.
pub fn decode_audit_output(raw: &str, expected_rows: usize) -> Result<Vec<AuditEntry>> {
    let entries: Vec<AuditEntry> = serde_json::from_str(raw)
        .map_err(|e| LedgerError::Evaluator(format!("response is not an audit entry array: {e}")))?;
    check_audit_shape(&entries, expected_rows)?;
    Ok(entries)
}

/// Validate evaluator output against the contract: one well-formed entry per
/// input row.
pub fn check_audit_shape(entries: &[AuditEntry], expected_rows: usize) -> Result<()> {
    if entries.len() != expected_rows {
        return Err(LedgerError::Evaluator(format!(
            "expected {expected_rows} audit entries, got {}",
            entries.len()
        )));
    }
    for entry in entries {
        if !entry.is_well_formed() {
            return Err(LedgerError::Evaluator(format!(
                "malformed audit entry for batch {:?}",
                entry.batch_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<BatchRow> {
        vec![
            BatchRow {
                batch_id: "BCH-2024-001".to_string(),
                product_name: "Essential Medicine X".to_string(),
                mfg_date: "2024-01-02".to_string(),
                location: "ALPHA".to_string(),
            },
            BatchRow {
                batch_id: "BCH-2024-002".to_string(),
                product_name: "Essential Medicine X".to_string(),
                // Saturday
                mfg_date: "2024-01-06".to_string(),
                location: "ALPHA".to_string(),
            },
        ]
    }

    fn history() -> Vec<HistoricalRow> {
        vec![HistoricalRow {
            batch_id: "BCH-2023-001".to_string(),
            product_name: "Essential Medicine X".to_string(),
            mfg_date: "2023-05-01".to_string(),
            location: "ALPHA".to_string(),
            status: "Approved".to_string(),
        }]
    }

    fn evaluator() -> RuleEvaluator {
        RuleEvaluator::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
    }

    #[tokio::test]
    async fn one_entry_per_row_in_input_order() {
        let entries = evaluator().evaluate(&rows(), &history()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].batch_id, "BCH-2024-001");
        assert!(entries[0].is_compliant);
        assert_eq!(entries[0].reason, REASON_OK);
        assert!(!entries[1].is_compliant);
        assert_ne!(entries[1].reason, REASON_OK);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let entries = evaluator().evaluate(&[], &history()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn rule_evaluator_output_satisfies_the_shape_contract() {
        let entries = evaluator().evaluate(&rows(), &history()).await.unwrap();
        check_audit_shape(&entries, 2).unwrap();
    }

    #[test]
    fn decode_accepts_well_formed_response() {
        let raw = r#"[
            {"batchId":"B-1","productName":"Tea","isCompliant":true,"reason":"OK"},
            {"batchId":"B-2","productName":"Tea","isCompliant":false,"reason":"weekend"}
        ]"#;
        let entries = decode_audit_output(raw, 2).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn decode_rejects_non_array_response() {
        let err = decode_audit_output(r#"{"ok":true}"#, 1).unwrap_err();
        assert!(matches!(err, LedgerError::Evaluator(_)));
    }

    #[test]
    fn decode_rejects_partial_results() {
        let raw = r#"[{"batchId":"B-1","productName":"Tea","isCompliant":true,"reason":"OK"}]"#;
        let err = decode_audit_output(raw, 2).unwrap_err();
        assert!(matches!(err, LedgerError::Evaluator(_)));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let raw = r#"[{"batchId":"B-1","isCompliant":true}]"#;
        assert!(decode_audit_output(raw, 1).is_err());
    }

    #[test]
    fn decode_rejects_compliant_entry_without_sentinel_reason() {
        let raw = r#"[{"batchId":"B-1","productName":"Tea","isCompliant":true,"reason":"fine"}]"#;
        assert!(decode_audit_output(raw, 1).is_err());
    }
}
