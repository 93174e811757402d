mod discord;
pub mod embed;
mod notify_error;

pub use discord::DiscordNotifier;
pub use notify_error::NotifyError;

use crate::domain::{Classified, Group};
use crate::notify::embed::{change_summary, listing_title};

/// Delivers one notification per new or changed listing.
pub trait Notifier {
    fn notify(&self, group: Group, item: &Classified) -> Result<(), NotifyError>;
}

/// Dry-run notifier: logs what would have been sent.
pub struct LogNotifier {
    currency_symbol: String,
}

impl LogNotifier {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, group: Group, item: &Classified) -> Result<(), NotifyError> {
        log::info!(
            "[dry-run] {}: {} ({}) {}",
            group.as_str(),
            listing_title(&item.listing, &self.currency_symbol),
            change_summary(&item.result),
            item.listing.link
        );
        Ok(())
    }
}
