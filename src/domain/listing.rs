// src/domain/listing.rs

use crate::errors::TrackerError;
use crate::inventory::models::Vehicle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One vehicle as fetched in the current cycle, flattened out of the raw
/// inventory payload. Only `id`, `price` and the photo list take part in
/// change detection; everything else is carried for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// The VIN.
    pub id: String,
    /// Whole currency units.
    pub price: i64,

    pub model: String,
    pub year: Option<i32>,
    pub trim: String,
    pub odometer: Option<i64>,
    pub odometer_unit: String,
    pub location: String,
    pub plate: Option<String>,
    pub options: Vec<String>,
    pub photos: Vec<String>,
    pub link: String,
}

impl Listing {
    /// Listing with only the fields change detection looks at.
    pub fn new(id: impl Into<String>, price: i64, photos: Vec<String>) -> Self {
        Self {
            id: id.into(),
            price,
            model: String::new(),
            year: None,
            trim: String::new(),
            odometer: None,
            odometer_unit: String::new(),
            location: String::new(),
            plate: None,
            options: Vec::new(),
            photos,
            link: String::new(),
        }
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Flattens a raw inventory record. `link_base` is the market-specific
    /// site root, e.g. `https://www.tesla.com/en_GB`.
    ///
    /// A record without a VIN or a price is rejected: a missing id would turn
    /// into a false "new" classification on the next cycle.
    pub fn from_vehicle(vehicle: &Vehicle, link_base: &str) -> Result<Self, TrackerError> {
        let id = vehicle
            .vin
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TrackerError::MalformedListing("missing or empty VIN".into()))?
            .to_string();

        let price = vehicle
            .inventory_price
            .filter(|p| p.is_finite())
            .ok_or_else(|| TrackerError::MalformedListing(format!("{id}: missing price")))?
            .round() as i64;

        let model = vehicle.model.clone().unwrap_or_default();
        let link = format!("{}/{}/order/{}", link_base.trim_end_matches('/'), model, id);

        let options = vehicle
            .option_code_specs
            .as_ref()
            .and_then(|specs| specs.c_opts.as_ref())
            .map(|opts| {
                opts.options
                    .iter()
                    .filter_map(|o| o.name.clone())
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let photos = vehicle
            .vehicle_photos
            .iter()
            .filter_map(|p| p.image_url.clone())
            .filter(|u| !u.is_empty())
            .collect();

        Ok(Listing {
            model,
            year: vehicle.year,
            trim: vehicle.trim_name.clone().unwrap_or_default(),
            odometer: vehicle
                .odometer
                .filter(|o| o.is_finite())
                .map(|o| o.round() as i64),
            odometer_unit: vehicle.odometer_type.clone().unwrap_or_default(),
            location: vehicle.vrl_name.clone().unwrap_or_default(),
            plate: vehicle
                .registration_details
                .as_ref()
                .and_then(|r| r.license_plate_number.clone())
                .filter(|p| !p.is_empty()),
            options,
            link,
            ..Listing::new(id, price, photos)
        })
    }
}

/// The minimal projection of a listing that is persisted between cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: String,
    pub price: i64,
    pub has_photos: bool,
}

impl From<&Listing> for SnapshotRecord {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            price: listing.price,
            has_photos: listing.has_photos(),
        }
    }
}

/// Last-known state of every listing, keyed by id.
pub type Snapshot = BTreeMap<String, SnapshotRecord>;

/// Projects a fetched batch into the snapshot that replaces the stored one.
/// Ids not present in `listings` are dropped.
pub fn snapshot_of(listings: &[Listing]) -> Snapshot {
    listings
        .iter()
        .map(|l| (l.id.clone(), SnapshotRecord::from(l)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::models::{OptionCodeSpecs, OptionSpec, OptionSpecs, Photo, Registration};

    fn vehicle() -> Vehicle {
        Vehicle {
            model: Some("m3".into()),
            year: Some(2024),
            vin: Some("LRW3E7EK0RC000001".into()),
            registration_details: Some(Registration {
                license_plate_number: Some("AB24 CDE".into()),
            }),
            odometer: Some(1234.4),
            odometer_type: Some("Miles".into()),
            trim_name: Some("Long Range RWD".into()),
            option_code_specs: Some(OptionCodeSpecs {
                c_opts: Some(OptionSpecs {
                    options: vec![
                        OptionSpec { name: Some("Pearl White".into()) },
                        OptionSpec { name: None },
                        OptionSpec { name: Some("19\" Wheels".into()) },
                    ],
                }),
            }),
            vrl_name: Some("Manchester".into()),
            inventory_price: Some(31990.0),
            vehicle_photos: vec![
                Photo { image_url: Some("https://img/1.jpg".into()) },
                Photo { image_url: Some("https://img/2.jpg".into()) },
            ],
        }
    }

    #[test]
    fn flattens_vehicle_into_listing() {
        let listing = Listing::from_vehicle(&vehicle(), "https://www.tesla.com/en_GB/").unwrap();

        assert_eq!(listing.id, "LRW3E7EK0RC000001");
        assert_eq!(listing.price, 31990);
        assert_eq!(listing.options, vec!["Pearl White", "19\" Wheels"]);
        assert_eq!(listing.plate.as_deref(), Some("AB24 CDE"));
        assert_eq!(listing.odometer, Some(1234));
        assert!(listing.has_photos());
        assert_eq!(
            listing.link,
            "https://www.tesla.com/en_GB/m3/order/LRW3E7EK0RC000001"
        );
    }

    #[test]
    fn rejects_vehicle_without_vin() {
        let mut v = vehicle();
        v.vin = Some("  ".into());
        let err = Listing::from_vehicle(&v, "https://x").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedListing(_)));
    }

    #[test]
    fn rejects_vehicle_without_price() {
        let mut v = vehicle();
        v.inventory_price = None;
        let err = Listing::from_vehicle(&v, "https://x").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedListing(_)));
    }

    #[test]
    fn rounds_fractional_prices() {
        let mut v = vehicle();
        v.inventory_price = Some(29999.6);
        assert_eq!(Listing::from_vehicle(&v, "https://x").unwrap().price, 30000);
    }

    #[test]
    fn no_photos_means_has_photos_false() {
        let mut v = vehicle();
        v.vehicle_photos.clear();
        let listing = Listing::from_vehicle(&v, "https://x").unwrap();
        assert!(!listing.has_photos());
        assert!(!SnapshotRecord::from(&listing).has_photos);
    }

    #[test]
    fn snapshot_of_keys_by_id() {
        let batch = vec![
            Listing::new("A", 100, vec![]),
            Listing::new("B", 200, vec!["p".into()]),
        ];
        let snap = snapshot_of(&batch);

        assert_eq!(snap.len(), 2);
        assert_eq!(
            snap["B"],
            SnapshotRecord { id: "B".into(), price: 200, has_photos: true }
        );
    }
}
