//! Error taxonomy for registry flows.

use thiserror::Error;

/// Errors that can occur in registry flows.
///
/// Each flow step maps its failure into exactly one of these kinds and
/// propagates it without downgrading severity; in particular a failed chain
/// lookup is never conflated with a genuine "not attested" result.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad or missing input; fails before any remote call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The content hash is already present in the attestation set. The
    /// registry never overwrites an existing attestation.
    #[error("hash already attested: {0}")]
    DuplicateAttestation(String),

    /// Network or contract failure while talking to the chain.
    #[error("chain error: {0}")]
    Chain(String),

    /// Connected to the wrong network for the configured contract.
    #[error("wrong network: expected chain id {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Off-chain record store unavailable or a write failed.
    #[error("store error: {0}")]
    Store(String),

    /// Database error from the SQLite-backed record store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No record for the given identifier.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Compliance evaluation failed or produced malformed output.
    #[error("evaluator error: {0}")]
    Evaluator(String),

    /// Invalid or missing configuration; fatal, not retried.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LedgerError {
    /// Whether this is the duplicate-attestation failure, which callers
    /// present distinctly from generic chain errors.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, LedgerError::DuplicateAttestation(_))
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_is_distinguishable_from_chain_error() {
        assert!(LedgerError::DuplicateAttestation("0xabc".to_string()).is_duplicate());
        assert!(!LedgerError::Chain("rpc timeout".to_string()).is_duplicate());
    }

    #[test]
    fn wrong_network_message_names_both_chains() {
        let err = LedgerError::WrongNetwork { expected: 11155111, actual: 1 };
        let msg = err.to_string();
        assert!(msg.contains("11155111"));
        assert!(msg.contains("connected to 1"));
    }
}
