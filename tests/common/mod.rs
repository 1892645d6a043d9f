//! Common fixtures and fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chronos_ledger::compliance::parse_historical_rows;
use chronos_ledger::{
    AttestationStore, HistoricalRow, LedgerError, MemoryAttestationStore, MemoryRecordStore,
    NewProduct, ProvenanceRegistry, RuleEvaluator, TxRef,
};

/// Historical reference set used across the audit tests.
pub const HISTORICAL_CSV: &str = "\
BatchID,ProductName,MfgDate,Location,Status
BCH-2023-001,Essential Medicine X,2023-05-01,ALPHA,Approved
BCH-2023-002,Essential Medicine X,2023-06-12,DELTA,Approved
IB-2023-010,ImmunoBoost,2023-07-03,GAMMA,Flagged-Temp
IB-2023-011,ImmunoBoost,2023-09-04,ALPHA,Approved
CCP-2023-004,CardioCare Plus,2023-08-21,OMEGA,Recalled
";

pub fn sample_history() -> Vec<HistoricalRow> {
    parse_historical_rows(HISTORICAL_CSV).expect("fixture csv parses")
}

/// Evaluation date pinned to a Monday so weekday rules are stable.
pub fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
}

pub fn green_tea() -> NewProduct {
    NewProduct {
        product_name: "Green Tea".to_string(),
        batch_id: "B-1".to_string(),
        mfg_date: "2024-01-02".to_string(),
    }
}

/// Attestation store wrapper counting calls, for asserting which flows
/// actually touch the chain.
pub struct CountingChain {
    inner: MemoryAttestationStore,
    pub puts: AtomicU32,
    pub lookups: AtomicU32,
}

impl CountingChain {
    pub fn new() -> Self {
        Self {
            inner: MemoryAttestationStore::new(),
            puts: AtomicU32::new(0),
            lookups: AtomicU32::new(0),
        }
    }

    pub fn put_count(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttestationStore for CountingChain {
    async fn put(&self, hash: &str) -> chronos_ledger::Result<TxRef> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(hash).await
    }

    async fn contains(&self, hash: &str) -> chronos_ledger::Result<bool> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.contains(hash).await
    }
}

/// Attestation store whose lookups always fail, simulating an unreachable
/// provider.
pub struct UnreachableChain;

#[async_trait]
impl AttestationStore for UnreachableChain {
    async fn put(&self, _hash: &str) -> chronos_ledger::Result<TxRef> {
        Err(LedgerError::Chain("provider unreachable".to_string()))
    }

    async fn contains(&self, _hash: &str) -> chronos_ledger::Result<bool> {
        Err(LedgerError::Chain("provider unreachable".to_string()))
    }
}

/// Registry over in-memory stores with handles to both stores kept for
/// direct manipulation in tests.
pub struct TestRegistry {
    pub chain: Arc<CountingChain>,
    pub records: Arc<MemoryRecordStore>,
    pub registry: ProvenanceRegistry,
}

pub fn memory_registry() -> TestRegistry {
    let chain = Arc::new(CountingChain::new());
    let records = Arc::new(MemoryRecordStore::new());
    let registry = ProvenanceRegistry::new(
        chain.clone(),
        records.clone(),
        Arc::new(RuleEvaluator::new(evaluation_date())),
        sample_history(),
    );
    TestRegistry { chain, records, registry }
}
