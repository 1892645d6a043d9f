//! Capability traits for the registry's external collaborators.
//!
//! The registry never talks to a wallet, contract, document database, or
//! inference service directly; it is handed these capabilities at
//! construction so tests can substitute fakes.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{
    AuditEntry, BatchRow, HistoricalRow, NewRecord, ProductRecord, RecordId, Report, TxRef,
};

use super::Result;

/// The on-chain attestation set: a write-once set of content hashes.
///
/// Existence of a hash is a boolean fact with no payload. Once present, a
/// hash is never removed or altered.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AttestationStore: Send + Sync {
    /// Submit a hash and block until the chain finalizes it.
    ///
    /// Fails with [`crate::LedgerError::DuplicateAttestation`] when the hash
    /// is already present; a second writer racing on the same hash observes
    /// that error rather than a silent overwrite. There is no automatic
    /// retry and no rollback once submitted.
    async fn put(&self, hash: &str) -> Result<TxRef>;

    /// Whether a hash is present in the attestation set.
    async fn contains(&self, hash: &str) -> Result<bool>;
}

/// The off-chain mutable record store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record; the store assigns identity and timestamp.
    async fn create(&self, record: NewRecord) -> Result<RecordId>;

    /// Fetch a record by identifier, `None` when absent.
    async fn get(&self, id: &RecordId) -> Result<Option<ProductRecord>>;

    /// All reports referencing a record, filing time descending.
    async fn reports_for(&self, id: &RecordId) -> Result<Vec<Report>>;

    /// File a dispute against a record, review status starting at
    /// [`crate::domain::REVIEW_PENDING`].
    async fn create_report(&self, record_id: &RecordId, reporter_id: &str) -> Result<()>;
}

/// Compliance evaluation over a batch of new rows against a historical
/// reference set.
///
/// Implementations must produce exactly one [`AuditEntry`] per input row or
/// fail the whole call; partial results are not accepted.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ComplianceEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        new_rows: &[BatchRow],
        history: &[HistoricalRow],
    ) -> Result<Vec<AuditEntry>>;
}
