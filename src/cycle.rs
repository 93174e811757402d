// src/cycle.rs

use crate::domain::{classify, snapshot_of, ChangeGroups};
use crate::errors::TrackerError;
use crate::inventory::InventorySource;
use crate::notify::Notifier;
use crate::store::SnapshotStore;

/// Outcome of one fetch → classify → notify → persist run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub new: usize,
    pub changed: usize,
    pub failed_deliveries: usize,
    /// Whether the snapshot was replaced at the end of the cycle.
    pub persisted: bool,
}

/// Runs a single cycle.
///
/// The snapshot is only replaced once every notification went out. When a
/// delivery fails the stored state stays as it was, so the same listings are
/// classified (and delivered) again next cycle.
pub fn run_cycle(
    source: &dyn InventorySource,
    store: &mut dyn SnapshotStore,
    notifier: &dyn Notifier,
) -> Result<CycleReport, TrackerError> {
    let current = source.fetch_listings()?;
    let prior = store.load()?;
    log::info!(
        "Loaded {} known listings, comparing against {} fetched",
        prior.len(),
        current.len()
    );

    let classified = classify(&current, &prior)?;
    let groups = ChangeGroups::from_classified(classified);

    let mut report = CycleReport {
        fetched: current.len(),
        new: groups.new.len(),
        changed: groups.changed.len(),
        ..CycleReport::default()
    };
    if groups.is_empty() {
        log::info!("Nothing new or changed");
    } else {
        log::info!("{} new, {} changed", report.new, report.changed);
    }

    for (group, item) in groups.iter() {
        if let Err(e) = notifier.notify(group, item) {
            log::warn!(
                "Failed to deliver {} notification for {}: {e}",
                group.as_str(),
                item.listing.id
            );
            report.failed_deliveries += 1;
        }
    }

    if report.failed_deliveries > 0 {
        log::warn!(
            "{} deliveries failed, keeping previous snapshot",
            report.failed_deliveries
        );
        return Ok(report);
    }

    store.replace(&snapshot_of(&current))?;
    report.persisted = true;
    Ok(report)
}
