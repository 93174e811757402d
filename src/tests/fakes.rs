// src/tests/fakes.rs

use crate::domain::{Classified, Group, Listing, Snapshot};
use crate::errors::TrackerError;
use crate::inventory::InventorySource;
use crate::notify::{NotifyError, Notifier};
use crate::store::SnapshotStore;
use std::cell::RefCell;

pub struct FakeSource {
    pub listings: Vec<Listing>,
}

impl InventorySource for FakeSource {
    fn fetch_listings(&self) -> Result<Vec<Listing>, TrackerError> {
        Ok(self.listings.clone())
    }
}

pub struct FailingSource;

impl InventorySource for FailingSource {
    fn fetch_listings(&self) -> Result<Vec<Listing>, TrackerError> {
        Err(crate::inventory::InventoryError::Network("connection refused".into()).into())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub snapshot: Snapshot,
    pub writes: usize,
    pub fail_load: bool,
    pub fail_replace: bool,
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Snapshot, TrackerError> {
        if self.fail_load {
            return Err(TrackerError::StoreUnavailable("disk on fire".into()));
        }
        Ok(self.snapshot.clone())
    }

    fn replace(&mut self, records: &Snapshot) -> Result<(), TrackerError> {
        if self.fail_replace {
            return Err(TrackerError::StoreUnavailable("read-only".into()));
        }
        self.snapshot = records.clone();
        self.writes += 1;
        Ok(())
    }
}

/// Records every delivery; fails the ones whose listing id is in `fail_ids`.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(Group, Classified)>>,
    pub fail_ids: Vec<String>,
}

impl RecordingNotifier {
    pub fn ids(&self, group: Group) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .filter(|(g, _)| *g == group)
            .map(|(_, c)| c.listing.id.clone())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<Classified> {
        self.sent
            .borrow()
            .iter()
            .find(|(_, c)| c.listing.id == id)
            .map(|(_, c)| c.clone())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, group: Group, item: &Classified) -> Result<(), NotifyError> {
        if self.fail_ids.contains(&item.listing.id) {
            return Err(NotifyError::ApiError {
                status: 500,
                body: "boom".into(),
            });
        }
        self.sent.borrow_mut().push((group, item.clone()));
        Ok(())
    }
}

pub fn photos() -> Vec<String> {
    vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()]
}
