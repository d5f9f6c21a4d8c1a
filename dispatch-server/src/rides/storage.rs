//! redb-based persistence for ride records
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `rides` | `ride_id` | `RideRecord` (JSON) | Latest committed record |
//!
//! The in-memory [`RideStore`](super::RideStore) is authoritative while the
//! process runs; this table is only read back on startup.

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::ride::RideRecord;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// key = ride_id, value = JSON-serialized RideRecord
const RIDES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("rides");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable backing for ride records
///
/// `save` is called while the ride's lock is held, so implementations see
/// writes for one ride in commit order.
pub trait RideRepository: Send + Sync {
    /// Insert or replace the record with `ride.id`
    fn save(&self, ride: &RideRecord) -> StorageResult<()>;

    /// Every stored record, in key order
    fn load_all(&self) -> StorageResult<Vec<RideRecord>>;

    fn count(&self) -> StorageResult<u64>;
}

/// Ride repository backed by redb
#[derive(Clone)]
pub struct RedbRideRepository {
    db: Arc<Database>,
}

impl RedbRideRepository {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RIDES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Load a single ride
    pub fn get(&self, ride_id: &str) -> StorageResult<Option<RideRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RIDES_TABLE)?;
        match table.get(ride_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

impl RideRepository for RedbRideRepository {
    fn save(&self, ride: &RideRecord) -> StorageResult<()> {
        let bytes = serde_json::to_vec(ride)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RIDES_TABLE)?;
            table.insert(ride.id.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn load_all(&self) -> StorageResult<Vec<RideRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RIDES_TABLE)?;

        let mut rides = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let ride: RideRecord = serde_json::from_slice(value.value())?;
            rides.push(ride);
        }
        Ok(rides)
    }

    fn count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RIDES_TABLE)?;
        Ok(table.len()?)
    }
}
