//! SQLite implementation of the off-chain record store.
//!
//! Records and reports land in two tables; timestamps are stored as RFC 3339
//! text so report ordering is a plain `ORDER BY`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::domain::{NewRecord, ProductRecord, RecordId, Report, TxRef, REVIEW_PENDING};
use crate::infra::{LedgerError, RecordStore, Result};

/// Record store backed by a SQLite connection pool.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Create a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a database URL. In-memory databases get a single
    /// connection so every query sees the same database.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new().max_connections(1).connect(url).await?
        } else {
            SqlitePool::connect(url).await?
        };
        Ok(Self::new(pool))
    }

    /// Create the schema if it does not exist.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                product_name TEXT NOT NULL,
                batch_id TEXT NOT NULL,
                mfg_date TEXT NOT NULL,
                status TEXT NOT NULL,
                registered_by TEXT NOT NULL,
                registered_at TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                tx_ref TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product_reports (
                id TEXT PRIMARY KEY,
                record_id TEXT NOT NULL,
                reporter_id TEXT NOT NULL,
                reported_at TEXT NOT NULL,
                review_status TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reports_record \
             ON product_reports (record_id, reported_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| LedgerError::Store(format!("bad {column} timestamp {raw:?}: {e}")))
}

fn record_from_row(row: &SqliteRow) -> Result<ProductRecord> {
    let registered_at: String = row.get("registered_at");
    Ok(ProductRecord {
        id: RecordId::new(row.get::<String, _>("id")),
        product_name: row.get("product_name"),
        batch_id: row.get("batch_id"),
        mfg_date: row.get("mfg_date"),
        status: row.get("status"),
        registered_by: row.get("registered_by"),
        registered_at: parse_timestamp(&registered_at, "registered_at")?,
        content_hash: row.get("content_hash"),
        tx_ref: TxRef::new(row.get::<String, _>("tx_ref")),
    })
}

fn report_from_row(row: &SqliteRow) -> Result<Report> {
    let reported_at: String = row.get("reported_at");
    Ok(Report {
        id: row.get("id"),
        record_id: RecordId::new(row.get::<String, _>("record_id")),
        reporter_id: row.get("reporter_id"),
        reported_at: parse_timestamp(&reported_at, "reported_at")?,
        review_status: row.get("review_status"),
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, record: NewRecord) -> Result<RecordId> {
        let id = RecordId::new(Uuid::new_v4().to_string());
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, product_name, batch_id, mfg_date, status,
                registered_by, registered_at, content_hash, tx_ref
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(&record.product_name)
        .bind(&record.batch_id)
        .bind(&record.mfg_date)
        .bind(&record.status)
        .bind(&record.registered_by)
        .bind(now.to_rfc3339())
        .bind(&record.content_hash)
        .bind(record.tx_ref.as_str())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<ProductRecord>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn reports_for(&self, id: &RecordId) -> Result<Vec<Report>> {
        let rows = sqlx::query(
            "SELECT * FROM product_reports WHERE record_id = ? ORDER BY reported_at DESC",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(report_from_row).collect()
    }

    async fn create_report(&self, record_id: &RecordId, reporter_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO product_reports (
                id, record_id, reporter_id, reported_at, review_status
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(record_id.as_str())
        .bind(reporter_id)
        .bind(Utc::now().to_rfc3339())
        .bind(REVIEW_PENDING)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
