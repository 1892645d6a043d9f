//! Chronos Ledger
//!
//! Core of a product-provenance registry: a deterministic content hash ties
//! each registered product batch to an immutable on-chain attestation and a
//! mutable off-chain record, and a later verification reconciles the two
//! into a single outcome. A rules-based compliance evaluator audits new
//! batch uploads against a historical reference set.
//!
//! ## Modules
//!
//! - [`crypto`] - Content hash and verification-token derivation
//! - [`domain`] - Records, reports, verification outcomes, audit entries
//! - [`infra`] - Error taxonomy, capability traits, store implementations
//! - [`compliance`] - Rule evaluation, evaluator output validation, CSV I/O
//! - [`registry`] - Registration, verification, reporting, audit flows
//! - [`scan`] - Scoped camera-session guard for QR scanning
//! - [`config`] - Environment-driven configuration
//! - [`telemetry`] - Tracing subscriber setup
//!
//! The wallet, contract, document database, and inference service are
//! external systems reached only through the capability traits in
//! [`infra`]; the in-memory and SQLite implementations exist to exercise
//! those contracts.

pub mod compliance;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod registry;
pub mod scan;
pub mod telemetry;

// Re-export commonly used types
pub use domain::{
    AuditEntry, AuditSummary, AuditTrail, BatchRow, ChainCheck, HistoricalRow, NewRecord,
    ProductRecord, RecordId, Report, TxRef, VerificationResult, VerificationStatus,
};

pub use infra::{
    AttestationStore, ComplianceEvaluator, LedgerError, MemoryAttestationStore,
    MemoryRecordStore, RecordStore, Result, SqliteRecordStore,
};

pub use compliance::RuleEvaluator;
pub use registry::{NewProduct, ProvenanceRegistry, RegistrationPhase, RegistrationReceipt};
pub use scan::{ScanDevice, ScanError, ScanSession};
