// src/domain/logic.rs

use crate::domain::changes::{ClassificationResult, Classified};
use crate::domain::listing::{Listing, Snapshot};
use crate::errors::TrackerError;
use std::collections::HashSet;

/// Classifies every listing of the current batch against the prior snapshot.
///
/// The output preserves input order and has exactly one entry per listing.
/// Ids present in `prior` but missing from `current` are not reported.
///
/// The batch is validated first: an empty or duplicated id fails the whole
/// batch instead of being skipped.
pub fn classify(current: &[Listing], prior: &Snapshot) -> Result<Vec<Classified>, TrackerError> {
    validate_batch(current)?;

    current
        .iter()
        .map(|listing| {
            Ok(Classified {
                listing: listing.clone(),
                result: classify_one(listing, prior)?,
            })
        })
        .collect()
}

fn classify_one(listing: &Listing, prior: &Snapshot) -> Result<ClassificationResult, TrackerError> {
    let Some(before) = prior.get(&listing.id) else {
        return Ok(ClassificationResult::new_listing());
    };

    let price_delta = if before.price == listing.price {
        None
    } else {
        let delta = listing.price.checked_sub(before.price).ok_or_else(|| {
            TrackerError::MalformedListing(format!(
                "{}: price change from {} to {} is out of range",
                listing.id, before.price, listing.price
            ))
        })?;
        Some(delta)
    };

    Ok(ClassificationResult {
        is_new: false,
        price_delta,
        photos_added: !before.has_photos && listing.has_photos(),
    })
}

fn validate_batch(current: &[Listing]) -> Result<(), TrackerError> {
    let mut seen = HashSet::with_capacity(current.len());

    for (idx, listing) in current.iter().enumerate() {
        if listing.id.trim().is_empty() {
            return Err(TrackerError::MalformedListing(format!(
                "listing at position {idx} has an empty id"
            )));
        }
        if !seen.insert(listing.id.as_str()) {
            return Err(TrackerError::MalformedListing(format!(
                "duplicate id {} in batch",
                listing.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{snapshot_of, SnapshotRecord};

    fn prior(records: &[(&str, i64, bool)]) -> Snapshot {
        records
            .iter()
            .map(|(id, price, has_photos)| {
                (
                    id.to_string(),
                    SnapshotRecord {
                        id: id.to_string(),
                        price: *price,
                        has_photos: *has_photos,
                    },
                )
            })
            .collect()
    }

    fn photos() -> Vec<String> {
        vec!["https://img/1.jpg".to_string()]
    }

    #[test]
    fn price_delta_is_signed() {
        let before = prior(&[("A", 20000, false), ("B", 20000, false)]);
        let current = vec![
            Listing::new("A", 21500, vec![]),
            Listing::new("B", 18000, vec![]),
        ];

        let out = classify(&current, &before).unwrap();

        assert!(out[0].result.price_changed());
        assert_eq!(out[0].result.price_delta, Some(1500));
        assert_eq!(out[1].result.price_delta, Some(-2000));
    }

    #[test]
    fn out_of_range_delta_is_malformed() {
        let before = prior(&[("A", -1, false)]);
        let err = classify(&[Listing::new("A", i64::MAX, vec![])], &before).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedListing(msg) if msg.contains("A")));

        let before = prior(&[("B", i64::MAX, false)]);
        let out = classify(&[Listing::new("B", -1, vec![])], &before).unwrap();
        assert_eq!(out[0].result.price_delta, Some(i64::MIN));
    }

    #[test]
    fn unchanged_price_has_no_delta() {
        let before = prior(&[("A", 20000, true)]);
        let out = classify(&[Listing::new("A", 20000, photos())], &before).unwrap();

        assert!(!out[0].result.price_changed());
        assert_eq!(out[0].result.price_delta, None);
        assert!(!out[0].result.is_changed());
    }

    #[test]
    fn photos_added_only_from_false_to_true() {
        let before = prior(&[("gained", 1, false), ("lost", 1, true)]);
        let current = vec![
            Listing::new("gained", 1, photos()),
            Listing::new("lost", 1, vec![]),
        ];

        let out = classify(&current, &before).unwrap();

        assert!(out[0].result.photos_added);
        assert!(!out[1].result.photos_added);
        assert!(!out[1].result.is_changed());
    }

    #[test]
    fn unknown_ids_are_new_regardless_of_state() {
        let before = prior(&[("known", 100, false)]);
        let current = vec![
            Listing::new("x", 0, vec![]),
            Listing::new("y", 99999, photos()),
        ];

        let out = classify(&current, &before).unwrap();

        for c in &out {
            assert_eq!(c.result, ClassificationResult::new_listing());
        }
    }

    #[test]
    fn empty_prior_marks_everything_new() {
        let current = vec![Listing::new("A", 1, vec![]), Listing::new("B", 2, vec![])];
        let out = classify(&current, &Snapshot::new()).unwrap();
        assert!(out.iter().all(|c| c.result.is_new));
    }

    #[test]
    fn empty_batch_gives_empty_output() {
        let before = prior(&[("A", 1, true)]);
        assert!(classify(&[], &before).unwrap().is_empty());
    }

    #[test]
    fn delisted_ids_produce_no_output() {
        let before = prior(&[("gone", 1, true), ("kept", 5, true)]);
        let out = classify(&[Listing::new("kept", 5, photos())], &before).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].listing.id, "kept");
    }

    #[test]
    fn preserves_input_order() {
        let current = vec![
            Listing::new("c", 1, vec![]),
            Listing::new("a", 1, vec![]),
            Listing::new("b", 1, vec![]),
        ];
        let ids: Vec<_> = classify(&current, &Snapshot::new())
            .unwrap()
            .into_iter()
            .map(|c| c.listing.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn rejects_empty_id() {
        let current = vec![Listing::new("A", 1, vec![]), Listing::new("", 2, vec![])];
        let err = classify(&current, &Snapshot::new()).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedListing(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let current = vec![Listing::new("A", 1, vec![]), Listing::new("A", 2, vec![])];
        let err = classify(&current, &Snapshot::new()).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedListing(msg) if msg.contains("A")));
    }

    #[test]
    fn classifying_against_own_snapshot_is_quiet() {
        let current = vec![
            Listing::new("A", 30000, photos()),
            Listing::new("B", 25000, vec![]),
        ];
        let out = classify(&current, &snapshot_of(&current)).unwrap();
        assert!(out.iter().all(|c| !c.result.is_new && !c.result.is_changed()));
    }
}
