use crate::errors::TrackerError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS snapshot_records (
    id          TEXT PRIMARY KEY,
    price       INTEGER NOT NULL,
    has_photos  INTEGER NOT NULL
);
";

/// Handle to the SQLite file. Holds only the path; a connection is opened
/// for each `with_conn` call, which suits one read and one write per cycle.
#[derive(Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, TrackerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, TrackerError>,
    {
        let mut conn = Connection::open(&self.path).map_err(|e| {
            TrackerError::StoreUnavailable(format!("open {}: {e}", self.path.display()))
        })?;
        f(&mut conn)
    }
}

/// Creates the snapshot table if this is a fresh database file.
pub fn init_db(db: &Database) -> Result<(), TrackerError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA)
            .map_err(|e| TrackerError::StoreUnavailable(format!("apply schema: {e}")))
    })?;

    log::debug!("Database ready at {}", db.path().display());
    Ok(())
}
