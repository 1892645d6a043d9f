//! Core domain types for the provenance registry.

mod audit;
mod record;
mod verification;

pub use audit::{summarize, AuditEntry, AuditSummary, BatchRow, HistoricalRow, REASON_OK};
pub use record::{
    AuditTrail, NewRecord, ProductRecord, RecordId, Report, TxRef, REVIEW_PENDING,
    STATUS_AUTHENTIC,
};
pub use verification::{ChainCheck, VerificationResult, VerificationStatus};
