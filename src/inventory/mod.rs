mod client;
mod inventory_error;
pub mod models;

pub use client::InventoryClient;
pub use inventory_error::InventoryError;
pub use models::InventoryQuery;

use crate::domain::Listing;
use crate::errors::TrackerError;

/// Supplies the current batch of listings for a cycle.
pub trait InventorySource {
    fn fetch_listings(&self) -> Result<Vec<Listing>, TrackerError>;
}
