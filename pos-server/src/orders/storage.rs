//! redb-based storage for the order/table consistency core
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tables` | table id | JSON `DiningTable` | Table aggregate (embedded seats) |
//! | `table_no_index` | table number | table id | Duplicate-number guard |
//! | `orders` | order id | JSON `Order` | Order documents |
//!
//! # Transaction discipline
//!
//! Every mutating method takes a `&WriteTransaction` supplied by the
//! caller; the caller commits. Reads within the transaction observe its
//! own uncommitted writes; an uncommitted transaction aborts on drop, so
//! an error anywhere in a lifecycle operation leaves both collections
//! untouched. redb's single-writer model serializes concurrent
//! lifecycle operations, which is what makes the seat-booking Conflict
//! check race-free.
//!
//! Read-only accessors use `begin_read` snapshots and may trail
//! in-flight writes.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::floor::DiningTable;
use crate::orders::model::Order;

/// Table aggregates: key = table id, value = JSON-serialized DiningTable
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tables");

/// Unique table-number index: key = table number, value = table id
const TABLE_NO_INDEX: TableDefinition<u32, &str> = TableDefinition::new("table_no_index");

/// Orders: key = order id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

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

/// POS core storage backed by redb
#[derive(Clone)]
pub struct PosStorage {
    db: Arc<Database>,
}

impl PosStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns and the
    /// database file is always in a consistent state, so a crash mid-way
    /// through an order mutation can never leave a half-booked table.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(TABLE_NO_INDEX)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Table Operations ==========

    /// Persist a table (within transaction)
    ///
    /// Refreshes derived state first, so table status and the display
    /// order list always reflect seat occupancy on disk.
    pub fn put_table(&self, txn: &WriteTransaction, table: &mut DiningTable) -> StorageResult<()> {
        table.refresh();
        let bytes = serde_json::to_vec(table)?;
        let mut tables = txn.open_table(TABLES_TABLE)?;
        tables.insert(table.id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Get a table by id (within transaction)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<DiningTable>> {
        let tables = txn.open_table(TABLES_TABLE)?;
        match tables.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a table by id (read-only snapshot)
    pub fn get_table(&self, table_id: &str) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let tables = read_txn.open_table(TABLES_TABLE)?;
        match tables.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all tables, ordered by table number
    pub fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let tables = read_txn.open_table(TABLES_TABLE)?;

        let mut result = Vec::new();
        for entry in tables.iter()? {
            let (_key, value) = entry?;
            let table: DiningTable = serde_json::from_slice(value.value())?;
            result.push(table);
        }
        result.sort_by_key(|t| t.table_no);
        Ok(result)
    }

    /// Remove a table document and its number index entry (within transaction)
    pub fn remove_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut tables = txn.open_table(TABLES_TABLE)?;
        tables.remove(table.id.as_str())?;
        let mut index = txn.open_table(TABLE_NO_INDEX)?;
        index.remove(table.table_no)?;
        Ok(())
    }

    // ========== Table Number Index ==========

    /// Look up the table id registered for a table number (within transaction)
    pub fn find_table_id_by_no(
        &self,
        txn: &WriteTransaction,
        table_no: u32,
    ) -> StorageResult<Option<String>> {
        let index = txn.open_table(TABLE_NO_INDEX)?;
        Ok(index.get(table_no)?.map(|guard| guard.value().to_string()))
    }

    /// Register a table number (within transaction)
    pub fn insert_table_no(
        &self,
        txn: &WriteTransaction,
        table_no: u32,
        table_id: &str,
    ) -> StorageResult<()> {
        let mut index = txn.open_table(TABLE_NO_INDEX)?;
        index.insert(table_no, table_id)?;
        Ok(())
    }

    /// Unregister a table number (within transaction)
    pub fn remove_table_no(&self, txn: &WriteTransaction, table_no: u32) -> StorageResult<()> {
        let mut index = txn.open_table(TABLE_NO_INDEX)?;
        index.remove(table_no)?;
        Ok(())
    }

    // ========== Order Operations ==========

    /// Persist an order (within transaction)
    pub fn put_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let mut orders = txn.open_table(ORDERS_TABLE)?;
        orders.insert(order.id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Get an order by id (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let orders = txn.open_table(ORDERS_TABLE)?;
        match orders.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by id (read-only snapshot)
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        match orders.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all orders, newest first
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in orders.iter()? {
            let (_key, value) = entry?;
            let order: Order = serde_json::from_slice(value.value())?;
            result.push(order);
        }
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    /// Remove an order document (within transaction)
    pub fn remove_order(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut orders = txn.open_table(ORDERS_TABLE)?;
        orders.remove(order_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::TableStatus;

    #[test]
    fn table_roundtrip_within_transaction() {
        let storage = PosStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();

        let mut table = DiningTable::new(3, 2);
        let id = table.id.clone();
        storage.put_table(&txn, &mut table).unwrap();

        // visible within the same transaction
        let loaded = storage.get_table_txn(&txn, &id).unwrap().unwrap();
        assert_eq!(loaded.table_no, 3);
        txn.commit().unwrap();

        let loaded = storage.get_table(&id).unwrap().unwrap();
        assert_eq!(loaded.seat_details.len(), 2);
        assert_eq!(loaded.status, TableStatus::Available);
    }

    #[test]
    fn dropped_transaction_aborts() {
        let storage = PosStorage::open_in_memory().unwrap();
        let id;
        {
            let txn = storage.begin_write().unwrap();
            let mut table = DiningTable::new(9, 4);
            id = table.id.clone();
            storage.put_table(&txn, &mut table).unwrap();
            storage.insert_table_no(&txn, 9, &id).unwrap();
            // txn dropped without commit
        }
        assert!(storage.get_table(&id).unwrap().is_none());
        assert!(storage.list_tables().unwrap().is_empty());
    }

    #[test]
    fn put_table_refreshes_derived_state() {
        let storage = PosStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();

        let mut table = DiningTable::new(1, 2);
        table.book_seat(1, "order-a").unwrap();
        // status is stale until persisted
        storage.put_table(&txn, &mut table).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_table(&table.id).unwrap().unwrap();
        assert_eq!(loaded.status, TableStatus::PartialBooked);
        assert_eq!(loaded.current_orders, vec!["order-a"]);
    }

    #[test]
    fn table_no_index_lookup() {
        let storage = PosStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut table = DiningTable::new(12, 4);
        storage.put_table(&txn, &mut table).unwrap();
        storage.insert_table_no(&txn, 12, &table.id).unwrap();

        assert_eq!(
            storage.find_table_id_by_no(&txn, 12).unwrap().as_deref(),
            Some(table.id.as_str())
        );
        assert!(storage.find_table_id_by_no(&txn, 13).unwrap().is_none());
        txn.commit().unwrap();
    }
}
