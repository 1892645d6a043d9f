//! Product records, reports, and the assembled audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical value of a record's mutable `status` field at creation.
/// Downstream review processes may overwrite it with free-form text.
pub const STATUS_AUTHENTIC: &str = "Authentic";

/// Review status assigned to a freshly filed report.
pub const REVIEW_PENDING: &str = "pending";

/// Identifier of a record in the off-chain store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Transaction reference under which a content hash was attested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxRef(pub String);

impl TxRef {
    pub fn new(tx: impl Into<String>) -> Self {
        Self(tx.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered product batch as held by the off-chain store.
///
/// Everything except `status` is immutable at creation. `status` starts as
/// [`STATUS_AUTHENTIC`] and may later be changed by an out-of-band review
/// process; records are never deleted in normal operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: RecordId,
    pub product_name: String,
    pub batch_id: String,
    /// Manufacturing date, calendar date with no time component. Kept as the
    /// raw field text because the content hash commits to it byte-for-byte.
    pub mfg_date: String,
    pub status: String,
    pub registered_by: String,
    pub registered_at: DateTime<Utc>,
    pub content_hash: String,
    pub tx_ref: TxRef,
}

impl ProductRecord {
    /// Whether the mutable status still carries the canonical authentic value.
    pub fn is_authentic_status(&self) -> bool {
        self.status == STATUS_AUTHENTIC
    }
}

/// Input to [`crate::infra::RecordStore::create`]; the store assigns the
/// identifier and the creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub product_name: String,
    pub batch_id: String,
    pub mfg_date: String,
    pub status: String,
    pub registered_by: String,
    pub content_hash: String,
    pub tx_ref: TxRef,
}

impl NewRecord {
    /// Materialize the stored record once the store has assigned identity.
    pub fn into_record(self, id: RecordId, registered_at: DateTime<Utc>) -> ProductRecord {
        ProductRecord {
            id,
            product_name: self.product_name,
            batch_id: self.batch_id,
            mfg_date: self.mfg_date,
            status: self.status,
            registered_by: self.registered_by,
            registered_at,
            content_hash: self.content_hash,
            tx_ref: self.tx_ref,
        }
    }
}

/// A consumer-filed dispute against a record. Many reports may reference one
/// record; mutation is reserved for an out-of-scope manual-review process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub record_id: RecordId,
    pub reporter_id: String,
    pub reported_at: DateTime<Utc>,
    pub review_status: String,
}

/// Read-only composite of a record plus all reports filed against it,
/// most recent first. Recomputed on each query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    pub record: ProductRecord,
    pub reports: Vec<Report>,
}
