//! Normalization of raw place records into the canonical schema
//!
//! Total and side-effect free: malformed records are dropped, never
//! propagated as errors, because discovery sources are known to return
//! partial and inconsistent shapes.

use crate::models::{LocationRecord, PlaceCategory};
use crate::places::google::RawPlace;

/// Map raw records onto the canonical schema for one category
///
/// Records missing either coordinate, a stable identifier or a name are
/// skipped. Missing ratings and review counts default to zero so
/// downstream consumers can rely on field presence. Duplicate
/// identifiers within the batch keep their first occurrence.
#[must_use]
pub fn normalize(raw: Vec<RawPlace>, category: PlaceCategory) -> Vec<LocationRecord> {
    let mut records: Vec<LocationRecord> = Vec::with_capacity(raw.len());

    for place in raw {
        let Some(record) = to_record(place, category) else {
            continue;
        };
        if records.iter().any(|r| r.place_id == record.place_id) {
            continue;
        }
        records.push(record);
    }

    records
}

fn to_record(place: RawPlace, category: PlaceCategory) -> Option<LocationRecord> {
    let location = place.geometry?.location?;
    let lat = location.lat?;
    let lng = location.lng?;
    let place_id = place.place_id.filter(|id| !id.is_empty())?;
    let name = place.name.filter(|n| !n.trim().is_empty())?;

    Some(LocationRecord {
        name,
        address: place.formatted_address.unwrap_or_default(),
        rating: place.rating.unwrap_or(0.0).clamp(0.0, 5.0),
        reviews: place.user_ratings_total.unwrap_or(0),
        lat,
        lng,
        types: place.types,
        place_id,
        category,
    })
}
