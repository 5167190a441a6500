//! Durable backing store using RocksDB
//!
//! # Column Families
//!
//! - `world` - public world state (key: account name)
//! - `private` - private data collections (key: collection || NUL || key)
//!
//! A [`WriteSet`] is applied through a single `WriteBatch`, so a
//! committed transaction is all-or-nothing.

use crate::{
    error::{Error, Result},
    store::{CommitStore, StateKey, WriteSet},
    Config,
};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, DB};
use std::sync::Arc;

/// Column family names
const CF_WORLD: &str = "world";
const CF_PRIVATE: &str = "private";

/// Storage wrapper for RocksDB
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_target_file_size_base(config.rocksdb.target_file_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_WORLD, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_PRIVATE, Self::cf_options()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!("Opened RocksDB at {:?}", path);

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_options() -> Options {
        let mut opts = Options::default();
        // Balances are read on every transfer, favor decode speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_for(&self, key: &StateKey) -> Result<&ColumnFamily> {
        let name = match key {
            StateKey::World(_) => CF_WORLD,
            StateKey::Private { .. } => CF_PRIVATE,
        };

        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("RocksDB closed gracefully");
        Ok(())
    }
}

impl CommitStore for RocksStore {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>> {
        let cf = self.cf_for(key)?;
        let value = self.db.get_cf(cf, key.encoded())?;
        Ok(value)
    }

    fn apply(&self, writes: WriteSet) -> Result<()> {
        let mut batch = WriteBatch::default();

        let write_count = writes.len();
        for (key, value) in writes {
            let cf = self.cf_for(&key)?;
            batch.put_cf(cf, key.encoded(), &value);
        }

        self.db.write(batch)?;

        tracing::debug!(write_count, "Write set applied");

        Ok(())
    }
}
