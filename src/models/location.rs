//! Canonical location records and the per-run location bundle

use serde::{Deserialize, Serialize};

/// Category a discovered place belongs to
///
/// Ordered by specificity: an explicitly requested place outranks a
/// general attraction, which outranks hotels and restaurants. The
/// ordering resolves category conflicts when the same place surfaces in
/// more than one discovery query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Hotel,
    Restaurant,
    Attraction,
    SpecificPlace,
}

impl PlaceCategory {
    /// Tie-break rank used when the same place appears in two categories
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            PlaceCategory::Restaurant => 0,
            PlaceCategory::Hotel => 1,
            PlaceCategory::Attraction => 2,
            PlaceCategory::SpecificPlace => 3,
        }
    }
}

/// Canonical representation of a single point of interest
///
/// Every discovery source is mapped onto this schema before anything
/// downstream (synthesis prompt, map rendering) sees it. Ratings and
/// review counts default to zero rather than being omitted so consumers
/// can rely on field presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Display name
    pub name: String,
    /// Formatted address as reported by the source
    pub address: String,
    /// Rating 0.0-5.0, 0.0 when unknown
    pub rating: f64,
    /// Review count, 0 when unknown
    pub reviews: u64,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Raw category/type list from the source API
    pub types: Vec<String>,
    /// External stable identifier, used as the dedup key
    pub place_id: String,
    /// Resolved category tag
    pub category: PlaceCategory,
}

/// Per-run collection of discovered places, grouped by category
///
/// Built once per planning run and owned by that run; never mutated
/// after synthesis is invoked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationBundle {
    pub hotels: Vec<LocationRecord>,
    pub restaurants: Vec<LocationRecord>,
    pub attractions: Vec<LocationRecord>,
    pub specific_places: Vec<LocationRecord>,
}

impl LocationBundle {
    /// Total number of records across all categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.hotels.len()
            + self.restaurants.len()
            + self.attractions.len()
            + self.specific_places.len()
    }

    /// True when no category holds any record
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all records regardless of category
    pub fn iter(&self) -> impl Iterator<Item = &LocationRecord> {
        self.hotels
            .iter()
            .chain(self.restaurants.iter())
            .chain(self.attractions.iter())
            .chain(self.specific_places.iter())
    }

    fn set_mut(&mut self, category: PlaceCategory) -> &mut Vec<LocationRecord> {
        match category {
            PlaceCategory::Hotel => &mut self.hotels,
            PlaceCategory::Restaurant => &mut self.restaurants,
            PlaceCategory::Attraction => &mut self.attractions,
            PlaceCategory::SpecificPlace => &mut self.specific_places,
        }
    }

    fn find_existing(&self, place_id: &str) -> Option<(PlaceCategory, usize)> {
        for category in [
            PlaceCategory::Hotel,
            PlaceCategory::Restaurant,
            PlaceCategory::Attraction,
            PlaceCategory::SpecificPlace,
        ] {
            let set = match category {
                PlaceCategory::Hotel => &self.hotels,
                PlaceCategory::Restaurant => &self.restaurants,
                PlaceCategory::Attraction => &self.attractions,
                PlaceCategory::SpecificPlace => &self.specific_places,
            };
            if let Some(index) = set.iter().position(|r| r.place_id == place_id) {
                return Some((category, index));
            }
        }
        None
    }

    /// Merge normalized records into the bundle, deduplicating across
    /// categories by `place_id`
    ///
    /// On a collision the record keeps its first-seen data; only its
    /// category is re-homed when the incoming tag is more specific.
    /// Absorbing the same records twice leaves the bundle unchanged.
    pub fn absorb(&mut self, records: Vec<LocationRecord>) {
        for record in records {
            match self.find_existing(&record.place_id) {
                None => {
                    let category = record.category;
                    self.set_mut(category).push(record);
                }
                Some((existing_category, index)) => {
                    if record.category.priority() > existing_category.priority() {
                        let mut kept = self.set_mut(existing_category).remove(index);
                        kept.category = record.category;
                        self.set_mut(record.category).push(kept);
                    }
                }
            }
        }
    }
}
