//! SQLite-backed record store.

mod record_store;

pub use record_store::SqliteRecordStore;
