//! # Persistent Storage
//!
//! Disk-backed implementations of `CatalogStore`.

mod redb_store;

pub use redb_store::RedbStore;
