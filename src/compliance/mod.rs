//! Compliance audit evaluation.
//!
//! Six deterministic rules over new batch rows and their historical
//! precedents, applied in fixed order with first-violation-wins citation.
//! The evaluator is reachable both as a local rules engine and through the
//! [`crate::infra::ComplianceEvaluator`] capability for external inference
//! backends, whose output must pass the same shape validation.

mod csv;
mod evaluator;
pub mod rules;

pub use csv::{
    export_audit_csv, parse_batch_rows, parse_historical_rows, split_csv_line, EXPORT_HEADER,
};
pub use evaluator::{check_audit_shape, decode_audit_output, RuleEvaluator};
pub use rules::{RuleId, Violation};
