use crate::db::connection::{init_db, Database};
use crate::domain::{Snapshot, SnapshotRecord};
use crate::errors::TrackerError;
use crate::store::SnapshotStore;
use rusqlite::params;
use std::path::Path;

fn db_err(e: rusqlite::Error) -> TrackerError {
    TrackerError::StoreUnavailable(e.to_string())
}

/// Snapshot kept in the `snapshot_records` table, one row per listing id.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the table exists,
    /// so the first `load` on a fresh file returns an empty snapshot.
    pub fn open(path: &Path) -> Result<Self, TrackerError> {
        let db = Database::new(path);
        init_db(&db)?;
        Ok(Self { db })
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self) -> Result<Snapshot, TrackerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, price, has_photos FROM snapshot_records")
                .map_err(db_err)?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(SnapshotRecord {
                        id: row.get(0)?,
                        price: row.get(1)?,
                        has_photos: row.get(2)?,
                    })
                })
                .map_err(db_err)?;

            let mut snapshot = Snapshot::new();
            for row in rows {
                let record = row.map_err(db_err)?;
                snapshot.insert(record.id.clone(), record);
            }
            Ok(snapshot)
        })
    }

    /// Clears and refills the table inside one transaction. The transaction
    /// rolls back when dropped uncommitted, so an error leaves the old rows.
    fn replace(&mut self, records: &Snapshot) -> Result<(), TrackerError> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction().map_err(db_err)?;

            tx.execute("DELETE FROM snapshot_records", [])
                .map_err(db_err)?;

            {
                let mut stmt = tx
                    .prepare_cached(
                        "INSERT INTO snapshot_records (id, price, has_photos) VALUES (?1, ?2, ?3)",
                    )
                    .map_err(db_err)?;

                for record in records.values() {
                    stmt.execute(params![record.id, record.price, record.has_photos])
                        .map_err(db_err)?;
                }
            }

            tx.commit().map_err(db_err)?;
            log::debug!("Replaced snapshot with {} rows", records.len());
            Ok(())
        })
    }
}
