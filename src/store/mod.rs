mod json_file;

pub use json_file::JsonFileStore;

use crate::db::SqliteStore;
use crate::domain::Snapshot;
use crate::errors::TrackerError;
use clap::ValueEnum;
use std::path::Path;

/// Last-known state of every listing, read once at the start of a cycle
/// and replaced wholesale at the end of it.
pub trait SnapshotStore {
    /// Full prior state. A store that has never been written yields an empty
    /// snapshot rather than an error.
    fn load(&self) -> Result<Snapshot, TrackerError>;

    /// Overwrites the stored state. Either all of `records` becomes visible
    /// to the next `load` or the previous state is left untouched.
    fn replace(&mut self, records: &Snapshot) -> Result<(), TrackerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Json,
    Sqlite,
}

pub fn open_store(backend: StoreBackend, path: &Path) -> Result<Box<dyn SnapshotStore>, TrackerError> {
    match backend {
        StoreBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StoreBackend::Sqlite => Ok(Box::new(SqliteStore::open(path)?)),
    }
}
