pub mod changes;
pub mod listing;
pub mod logic;

pub use changes::{ChangeGroups, ClassificationResult, Classified, Group};
pub use listing::{snapshot_of, Listing, Snapshot, SnapshotRecord};
pub use logic::classify;
