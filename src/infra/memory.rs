//! In-memory capability implementations.
//!
//! Faithful to the external contracts (write-once attestation set,
//! store-assigned record identity, report ordering) but held entirely in
//! process memory. Used by the integration tests and local runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewRecord, ProductRecord, RecordId, Report, TxRef, REVIEW_PENDING};

use super::{AttestationStore, LedgerError, RecordStore, Result};

/// Write-once set of attested hashes.
#[derive(Default)]
pub struct MemoryAttestationStore {
    hashes: RwLock<HashSet<String>>,
}

impl MemoryAttestationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> LedgerError {
        LedgerError::Chain("attestation set lock poisoned".to_string())
    }
}

#[async_trait]
impl AttestationStore for MemoryAttestationStore {
    async fn put(&self, hash: &str) -> Result<TxRef> {
        let mut hashes = self.hashes.write().map_err(|_| Self::lock_poisoned())?;
        if !hashes.insert(hash.to_string()) {
            return Err(LedgerError::DuplicateAttestation(hash.to_string()));
        }
        Ok(TxRef::new(format!("memtx-{}", Uuid::new_v4())))
    }

    async fn contains(&self, hash: &str) -> Result<bool> {
        let hashes = self.hashes.read().map_err(|_| Self::lock_poisoned())?;
        Ok(hashes.contains(hash))
    }
}

/// Record and report storage backed by hash maps.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<RecordId, ProductRecord>>,
    reports: RwLock<Vec<Report>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> LedgerError {
        LedgerError::Store("record store lock poisoned".to_string())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, record: NewRecord) -> Result<RecordId> {
        let id = RecordId::new(Uuid::new_v4().to_string());
        let stored = record.into_record(id.clone(), Utc::now());
        let mut records = self.records.write().map_err(|_| Self::lock_poisoned())?;
        records.insert(id.clone(), stored);
        Ok(id)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<ProductRecord>> {
        let records = self.records.read().map_err(|_| Self::lock_poisoned())?;
        Ok(records.get(id).cloned())
    }

    async fn reports_for(&self, id: &RecordId) -> Result<Vec<Report>> {
        let reports = self.reports.read().map_err(|_| Self::lock_poisoned())?;
        let mut matching: Vec<Report> = reports
            .iter()
            .filter(|r| &r.record_id == id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(matching)
    }

    async fn create_report(&self, record_id: &RecordId, reporter_id: &str) -> Result<()> {
        let report = Report {
            id: Uuid::new_v4().to_string(),
            record_id: record_id.clone(),
            reporter_id: reporter_id.to_string(),
            reported_at: Utc::now(),
            review_status: REVIEW_PENDING.to_string(),
        };
        let mut reports = self.reports.write().map_err(|_| Self::lock_poisoned())?;
        reports.push(report);
        Ok(())
    }
}
