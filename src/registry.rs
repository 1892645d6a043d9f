//! The provenance registry: registration, verification, reports, and audits.
//!
//! All external systems are injected capabilities; the registry owns only
//! the flow logic that ties a locally computable content hash to an
//! on-chain attestation and an off-chain record.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::compliance::{check_audit_shape, parse_batch_rows};
use crate::crypto::{content_hash, verification_token};
use crate::domain::{
    AuditEntry, AuditTrail, ChainCheck, HistoricalRow, NewRecord, RecordId, TxRef,
    VerificationResult, VerificationStatus, STATUS_AUTHENTIC,
};
use crate::infra::{
    AttestationStore, ComplianceEvaluator, LedgerError, RecordStore, Result,
};

/// Form fields for a new registration.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub batch_id: String,
    pub mfg_date: String,
}

/// What a successful registration hands back to the registrant.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub record_id: RecordId,
    pub tx_ref: TxRef,
    pub content_hash: String,
    /// Token for the scannable verification link. Derivation only; nothing
    /// in this design validates it later.
    pub verification_token: String,
}

/// Phases of the registration flow. Failure in any non-terminal phase maps
/// to an error without rollback of the phases already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPhase {
    Idle,
    HashComputed,
    ChainSubmitted,
    ChainConfirmed,
    RecordStored,
    Done,
}

impl fmt::Display for RegistrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegistrationPhase::Idle => "idle",
            RegistrationPhase::HashComputed => "hash_computed",
            RegistrationPhase::ChainSubmitted => "chain_submitted",
            RegistrationPhase::ChainConfirmed => "chain_confirmed",
            RegistrationPhase::RecordStored => "record_stored",
            RegistrationPhase::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Registry over injected attestation, record, and evaluator capabilities.
pub struct ProvenanceRegistry {
    attestations: Arc<dyn AttestationStore>,
    records: Arc<dyn RecordStore>,
    evaluator: Arc<dyn ComplianceEvaluator>,
    history: Vec<HistoricalRow>,
}

impl ProvenanceRegistry {
    pub fn new(
        attestations: Arc<dyn AttestationStore>,
        records: Arc<dyn RecordStore>,
        evaluator: Arc<dyn ComplianceEvaluator>,
        history: Vec<HistoricalRow>,
    ) -> Self {
        Self { attestations, records, evaluator, history }
    }

    /// Register a product batch: hash, attest on-chain, persist the record,
    /// and derive the verification token.
    ///
    /// Flow: `Idle -> HashComputed -> ChainSubmitted -> ChainConfirmed ->
    /// RecordStored -> Done`. A failure in any phase surfaces as-is; there
    /// is no partial-state rollback, so a store failure after chain
    /// confirmation leaves an attested hash with no corresponding record
    /// (logged, not papered over).
    pub async fn register_product(
        &self,
        registrant: &str,
        input: NewProduct,
    ) -> Result<RegistrationReceipt> {
        let product_name = input.product_name.trim();
        let batch_id = input.batch_id.trim();
        let mfg_date = input.mfg_date.trim();
        if product_name.is_empty() || batch_id.is_empty() || mfg_date.is_empty() {
            return Err(LedgerError::Validation(
                "product name, batch id, and manufacturing date are all required".to_string(),
            ));
        }
        if registrant.trim().is_empty() {
            return Err(LedgerError::Validation("registrant identity is required".to_string()));
        }

        let hash = content_hash(product_name, batch_id, mfg_date);
        info!(phase = %RegistrationPhase::HashComputed, %hash, "content hash derived");

        // Blocks until the chain finalizes the submission; a duplicate hash
        // comes back as its own error kind, never a silent overwrite.
        info!(phase = %RegistrationPhase::ChainSubmitted, %hash, "submitting attestation");
        let tx_ref = self.attestations.put(&hash).await?;
        info!(phase = %RegistrationPhase::ChainConfirmed, tx = %tx_ref, "attestation confirmed");

        let record = NewRecord {
            product_name: product_name.to_string(),
            batch_id: batch_id.to_string(),
            mfg_date: mfg_date.to_string(),
            status: STATUS_AUTHENTIC.to_string(),
            registered_by: registrant.to_string(),
            content_hash: hash.clone(),
            tx_ref: tx_ref.clone(),
        };
        let record_id = match self.records.create(record).await {
            Ok(id) => id,
            Err(e) => {
                // The hash is attested but no record refers to it. Accepted
                // inconsistency: the attestation set is append-only and the
                // flow does not roll back.
                warn!(
                    phase = %RegistrationPhase::ChainConfirmed,
                    %hash,
                    tx = %tx_ref,
                    error = %e,
                    "record storage failed after chain confirmation; attested hash has no record"
                );
                return Err(e);
            }
        };
        info!(phase = %RegistrationPhase::RecordStored, record = %record_id, "record persisted");

        let token = verification_token(record_id.as_str(), batch_id);
        info!(phase = %RegistrationPhase::Done, record = %record_id, "registration complete");

        Ok(RegistrationReceipt {
            record_id,
            tx_ref,
            content_hash: hash,
            verification_token: token,
        })
    }

    /// Reconcile a record against the on-chain attestation set.
    ///
    /// Outcome precedence is fixed: existence first, then attestation, then
    /// status. A failed chain lookup yields `Critical` like a genuinely
    /// unattested hash, but the caller can tell them apart through the
    /// `chain` field.
    pub async fn verify(&self, id: &RecordId) -> Result<VerificationResult> {
        let Some(record) = self.records.get(id).await? else {
            info!(record = %id, "verification: no record for identifier");
            return Ok(VerificationResult {
                record: None,
                status: VerificationStatus::NotFound,
                queried_id: id.clone(),
                chain: ChainCheck::Unknown { reason: "no record for identifier".to_string() },
            });
        };

        let chain = if record.content_hash.is_empty() {
            ChainCheck::Unknown { reason: "no hash stored".to_string() }
        } else {
            match self.attestations.contains(&record.content_hash).await {
                Ok(true) => ChainCheck::Verified,
                Ok(false) => ChainCheck::Failed,
                Err(e) => {
                    warn!(record = %id, error = %e, "chain lookup failed during verification");
                    ChainCheck::Error { cause: e.to_string() }
                }
            }
        };

        let status = match &chain {
            ChainCheck::Verified if record.is_authentic_status() => VerificationStatus::Authentic,
            ChainCheck::Verified => VerificationStatus::Warning,
            // Unconfirmed attestation, for whatever reason, is critical.
            ChainCheck::Failed | ChainCheck::Unknown { .. } | ChainCheck::Error { .. } => {
                VerificationStatus::Critical
            }
        };
        info!(record = %id, %status, chain = %chain, "verification outcome");

        Ok(VerificationResult {
            record: Some(record),
            status,
            queried_id: id.clone(),
            chain,
        })
    }

    /// File a consumer dispute against a record.
    pub async fn file_report(&self, record_id: &RecordId, reporter_id: &str) -> Result<()> {
        if reporter_id.trim().is_empty() {
            return Err(LedgerError::Validation(
                "reporter identity is required to file a report".to_string(),
            ));
        }
        if self.records.get(record_id).await?.is_none() {
            return Err(LedgerError::NotFound(record_id.to_string()));
        }
        self.records.create_report(record_id, reporter_id).await?;
        info!(record = %record_id, "report filed");
        Ok(())
    }

    /// Assemble the audit trail for a record: the record plus all reports
    /// against it, most recent first. `None` when the identifier is unknown;
    /// a known record with no reports yields an empty (not absent) trail.
    /// Recomputed on every call.
    pub async fn audit_trail(&self, id: &RecordId) -> Result<Option<AuditTrail>> {
        let Some(record) = self.records.get(id).await? else {
            return Ok(None);
        };
        let reports = self.records.reports_for(id).await?;
        Ok(Some(AuditTrail { record, reports }))
    }

    /// Run the compliance audit over uploaded CSV rows against the
    /// registry's historical reference set. The evaluator's output must be
    /// one well-formed entry per row or the whole call fails.
    pub async fn run_compliance_audit(&self, csv: &str) -> Result<Vec<AuditEntry>> {
        let rows = parse_batch_rows(csv)?;
        if rows.is_empty() {
            return Err(LedgerError::Validation("no data rows to audit".to_string()));
        }
        let entries = self.evaluator.evaluate(&rows, &self.history).await?;
        check_audit_shape(&entries, rows.len())?;
        info!(rows = rows.len(), "compliance audit complete");
        Ok(entries)
    }
}
