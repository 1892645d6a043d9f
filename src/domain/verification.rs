//! Verification outcomes and the on-chain check result.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ProductRecord, RecordId};

/// Result of looking up a content hash in the on-chain attestation set.
///
/// Structured replacement for the ad-hoc status strings the registry used to
/// pass around: the caller can distinguish a confirmed attestation, a hash
/// that is genuinely absent, a lookup that never ran, and a lookup that
/// failed outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainCheck {
    /// The hash is present in the attestation set.
    Verified,
    /// The lookup succeeded and the hash is not attested.
    Failed,
    /// No lookup was performed (no record, or record carries no hash).
    Unknown { reason: String },
    /// The lookup itself failed; attestation could not be confirmed.
    Error { cause: String },
}

impl ChainCheck {
    pub fn is_verified(&self) -> bool {
        matches!(self, ChainCheck::Verified)
    }
}

impl fmt::Display for ChainCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainCheck::Verified => write!(f, "VERIFIED (hash registered)"),
            ChainCheck::Failed => write!(f, "FAILED (hash not registered)"),
            ChainCheck::Unknown { reason } => write!(f, "UNKNOWN ({reason})"),
            ChainCheck::Error { cause } => write!(f, "ERROR ({cause})"),
        }
    }
}

/// The four verification outcomes, in severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Record exists, hash attested, status still canonical.
    Authentic,
    /// Record exists and is attested, but its status has been changed by a
    /// downstream review process.
    Warning,
    /// Record exists but its hash has no confirmed on-chain backing.
    Critical,
    /// No record for the queried identifier.
    NotFound,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationStatus::Authentic => "Authentic",
            VerificationStatus::Warning => "Warning",
            VerificationStatus::Critical => "Critical",
            VerificationStatus::NotFound => "NotFound",
        };
        write!(f, "{s}")
    }
}

/// Ephemeral result of one verification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The record, absent when the identifier is unknown.
    pub record: Option<ProductRecord>,
    pub status: VerificationStatus,
    /// Identifier as queried.
    pub queried_id: RecordId,
    /// Outcome of the on-chain attestation check.
    pub chain: ChainCheck,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_check_display_is_human_readable() {
        assert_eq!(ChainCheck::Verified.to_string(), "VERIFIED (hash registered)");
        assert_eq!(ChainCheck::Failed.to_string(), "FAILED (hash not registered)");
        assert_eq!(
            ChainCheck::Unknown { reason: "no hash stored".to_string() }.to_string(),
            "UNKNOWN (no hash stored)"
        );
        assert_eq!(
            ChainCheck::Error { cause: "rpc timeout".to_string() }.to_string(),
            "ERROR (rpc timeout)"
        );
    }

    #[test]
    fn only_verified_counts_as_verified() {
        assert!(ChainCheck::Verified.is_verified());
        assert!(!ChainCheck::Failed.is_verified());
        assert!(!ChainCheck::Error { cause: String::new() }.is_verified());
    }
}
