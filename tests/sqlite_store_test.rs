//! RecordStore contract tests against an in-memory SQLite database.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{evaluation_date, green_tea, sample_history};

use chronos_ledger::domain::{NewRecord, REVIEW_PENDING, STATUS_AUTHENTIC};
use chronos_ledger::{
    MemoryAttestationStore, ProvenanceRegistry, RecordId, RecordStore, RuleEvaluator,
    SqliteRecordStore, TxRef, VerificationStatus,
};

async fn store() -> SqliteRecordStore {
    let store = SqliteRecordStore::connect("sqlite::memory:").await.unwrap();
    store.initialize().await.unwrap();
    store
}

fn sample_record() -> NewRecord {
    NewRecord {
        product_name: "Green Tea".to_string(),
        batch_id: "B-1".to_string(),
        mfg_date: "2024-01-02".to_string(),
        status: STATUS_AUTHENTIC.to_string(),
        registered_by: "0xadmin".to_string(),
        content_hash: "0xf6ebccdfa78553dd3d11f7aaf6d6a20613db26cd5d756fa01f297ae9dc879b31"
            .to_string(),
        tx_ref: TxRef::new("0xtx-1"),
    }
}

#[tokio::test]
async fn create_and_get_round_trips_every_field() {
    let store = store().await;
    let id = store.create(sample_record()).await.unwrap();

    let record = store.get(&id).await.unwrap().expect("record present");
    assert_eq!(record.id, id);
    assert_eq!(record.product_name, "Green Tea");
    assert_eq!(record.batch_id, "B-1");
    assert_eq!(record.mfg_date, "2024-01-02");
    assert_eq!(record.status, STATUS_AUTHENTIC);
    assert_eq!(record.registered_by, "0xadmin");
    assert_eq!(record.tx_ref.as_str(), "0xtx-1");
    assert!(record.content_hash.starts_with("0x"));
}

#[tokio::test]
async fn get_unknown_id_is_none() {
    let store = store().await;
    assert!(store.get(&RecordId::from("missing")).await.unwrap().is_none());
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let store = store().await;
    store.initialize().await.unwrap();
    let id = store.create(sample_record()).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_some());
}

#[tokio::test]
async fn reports_order_by_filing_time_descending() {
    let store = store().await;
    let id = store.create(sample_record()).await.unwrap();

    for reporter in ["user-1", "user-2", "user-3"] {
        store.create_report(&id, reporter).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let reports = store.reports_for(&id).await.unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].reporter_id, "user-3");
    assert_eq!(reports[2].reporter_id, "user-1");
    assert!(reports.iter().all(|r| r.review_status == REVIEW_PENDING));
    assert!(reports.iter().all(|r| r.record_id == id));
}

#[tokio::test]
async fn reports_are_scoped_to_their_record() {
    let store = store().await;
    let a = store.create(sample_record()).await.unwrap();
    let b = store.create(sample_record()).await.unwrap();

    store.create_report(&a, "user-1").await.unwrap();

    assert_eq!(store.reports_for(&a).await.unwrap().len(), 1);
    assert!(store.reports_for(&b).await.unwrap().is_empty());
}

#[tokio::test]
async fn full_registration_flow_works_over_sqlite() {
    let records = Arc::new(store().await);
    let registry = ProvenanceRegistry::new(
        Arc::new(MemoryAttestationStore::new()),
        records,
        Arc::new(RuleEvaluator::new(evaluation_date())),
        sample_history(),
    );

    let receipt = registry.register_product("0xadmin", green_tea()).await.unwrap();
    let result = registry.verify(&receipt.record_id).await.unwrap();
    assert_eq!(result.status, VerificationStatus::Authentic);
}
