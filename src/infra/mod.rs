//! Infrastructure layer: error taxonomy, capability traits, and the store
//! implementations used by tests and local runs.

mod error;
mod memory;
pub mod sqlite;
mod traits;

pub use error::{LedgerError, Result};
pub use memory::{MemoryAttestationStore, MemoryRecordStore};
pub use sqlite::SqliteRecordStore;
pub use traits::{AttestationStore, ComplianceEvaluator, RecordStore};

#[cfg(test)]
pub use traits::{MockAttestationStore, MockComplianceEvaluator, MockRecordStore};
