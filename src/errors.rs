// errors.rs
use crate::inventory::InventoryError;
use crate::notify::NotifyError;
use thiserror::Error;

/// Errors surfaced by a tracking cycle, either from the core
/// (snapshot store, change detection) or from the collaborators around it.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Prior state could not be read, or current state could not be written.
    #[error("Snapshot store unavailable: {0}")]
    StoreUnavailable(String),

    /// A listing without a usable id or price. Fails the whole batch.
    #[error("Malformed listing: {0}")]
    MalformedListing(String),

    #[error("Inventory fetch failed: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
