// src/domain/changes.rs

use crate::domain::listing::Listing;

/// What a cycle derived about one listing relative to the prior snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    /// The id was absent from the prior snapshot.
    pub is_new: bool,
    /// Current price minus prior price. `None` when the price did not change
    /// (or the listing is new), so there is never a zero delta to display.
    pub price_delta: Option<i64>,
    /// Prior record had no photos and the listing has some now.
    pub photos_added: bool,
}

impl ClassificationResult {
    pub fn new_listing() -> Self {
        Self {
            is_new: true,
            ..Self::default()
        }
    }

    pub fn price_changed(&self) -> bool {
        self.price_delta.is_some()
    }

    /// Known listing with a price change or newly added photos.
    pub fn is_changed(&self) -> bool {
        !self.is_new && (self.price_changed() || self.photos_added)
    }
}

/// A fetched listing paired with its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub listing: Listing,
    pub result: ClassificationResult,
}

/// Which notification stream a listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    New,
    Changed,
}

impl Group {
    pub fn as_str(self) -> &'static str {
        match self {
            Group::New => "new",
            Group::Changed => "changed",
        }
    }
}

/// Classified listings split into the two notification groups.
/// Unchanged listings are dropped.
#[derive(Debug, Default)]
pub struct ChangeGroups {
    pub new: Vec<Classified>,
    pub changed: Vec<Classified>,
}

impl ChangeGroups {
    pub fn from_classified(items: Vec<Classified>) -> Self {
        let mut groups = ChangeGroups::default();
        for item in items {
            if item.result.is_new {
                groups.new.push(item);
            } else if item.result.is_changed() {
                groups.changed.push(item);
            }
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.changed.is_empty()
    }

    /// New listings first, then changed ones, each in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = (Group, &Classified)> {
        self.new
            .iter()
            .map(|c| (Group::New, c))
            .chain(self.changed.iter().map(|c| (Group::Changed, c)))
    }
}
