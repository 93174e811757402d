pub mod connection;
pub mod snapshots;

pub use snapshots::SqliteStore;
