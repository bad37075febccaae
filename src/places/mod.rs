//! Location discovery
//!
//! Fans out one text-search query per category (hotels, restaurants,
//! attractions, plus a targeted lookup per explicitly named place),
//! normalizes the raw results and merges them into a per-run
//! `LocationBundle`. Categories fail independently: one broken query
//! never empties the whole bundle.

pub mod google;
pub mod normalize;

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::error::PlanningError;
use crate::models::{LocationBundle, PlaceCategory};

pub use google::{GooglePlacesClient, PlaceProvider, RawPlace};
pub use normalize::normalize;

/// Per-category discovery over a place provider
pub struct DiscoveryService {
    provider: Arc<dyn PlaceProvider>,
    /// Hard ceiling on records kept per category, bounding the
    /// synthesis prompt size
    max_per_category: usize,
}

impl DiscoveryService {
    pub fn new(provider: Arc<dyn PlaceProvider>, max_per_category: usize) -> Self {
        Self {
            provider,
            max_per_category,
        }
    }

    /// Discover places around a destination
    ///
    /// Returns a bundle holding every category that succeeded; fails
    /// only when every query failed.
    #[instrument(skip(self, places_of_interest), fields(destination = %destination))]
    pub async fn discover(
        &self,
        destination: &str,
        places_of_interest: &[String],
    ) -> Result<LocationBundle> {
        let queries = category_queries(destination, places_of_interest);
        let total = queries.len();

        let searches = queries
            .iter()
            .map(|(category, query)| {
                let provider = Arc::clone(&self.provider);
                async move {
                    let outcome = provider.text_search(query).await;
                    (*category, query.clone(), outcome)
                }
            })
            .collect::<Vec<_>>();

        let mut bundle = LocationBundle::default();
        let mut failures = 0usize;

        for (category, query, outcome) in join_all(searches).await {
            match outcome {
                Ok(mut raw) => {
                    raw.truncate(self.max_per_category);
                    bundle.absorb(normalize(raw, category));
                }
                Err(e) => {
                    failures += 1;
                    warn!("Discovery query '{}' failed: {}", query, e);
                }
            }
        }

        if failures == total {
            return Err(PlanningError::discovery(format!(
                "all {total} discovery queries failed for {destination}"
            )));
        }

        info!(
            "Discovery found {} places for {} ({} of {} queries succeeded)",
            bundle.len(),
            destination,
            total - failures,
            total
        );
        Ok(bundle)
    }
}

/// Build the per-category query list for a destination
fn category_queries(
    destination: &str,
    places_of_interest: &[String],
) -> Vec<(PlaceCategory, String)> {
    let mut queries = vec![
        (PlaceCategory::Hotel, format!("hotels in {destination}")),
        (
            PlaceCategory::Restaurant,
            format!("restaurants in {destination}"),
        ),
        (
            PlaceCategory::Attraction,
            format!("tourist attractions in {destination}"),
        ),
    ];

    for place in places_of_interest {
        queries.push((
            PlaceCategory::SpecificPlace,
            format!("{place}, {destination}"),
        ));
    }

    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::google::{RawGeometry, RawLatLng};
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn raw(place_id: &str) -> RawPlace {
        RawPlace {
            name: Some(format!("Place {place_id}")),
            formatted_address: Some("Mumbai".to_string()),
            rating: Some(4.0),
            user_ratings_total: Some(10),
            geometry: Some(RawGeometry {
                location: Some(RawLatLng {
                    lat: Some(18.9),
                    lng: Some(72.8),
                }),
            }),
            place_id: Some(place_id.to_string()),
            types: vec![],
        }
    }

    /// Stub provider keyed on query substrings
    struct StubProvider {
        responses: HashMap<&'static str, Vec<RawPlace>>,
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl PlaceProvider for StubProvider {
        async fn text_search(&self, query: &str) -> Result<Vec<RawPlace>> {
            if self.failing.iter().any(|f| query.contains(f)) {
                return Err(PlanningError::discovery("stubbed failure"));
            }
            for (needle, places) in &self.responses {
                if query.contains(needle) {
                    return Ok(places.clone());
                }
            }
            Ok(vec![])
        }
    }

    fn service(provider: StubProvider, cap: usize) -> DiscoveryService {
        DiscoveryService::new(Arc::new(provider), cap)
    }

    #[test]
    fn test_category_queries_include_specific_places() {
        let queries = category_queries("Mumbai", &["Gateway of India".to_string()]);
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[3].0, PlaceCategory::SpecificPlace);
        assert!(queries[3].1.contains("Gateway of India"));
    }

    #[tokio::test]
    async fn test_discover_populates_each_category() {
        let provider = StubProvider {
            responses: HashMap::from([
                ("hotels", vec![raw("h1")]),
                ("restaurants", vec![raw("r1"), raw("r2")]),
                ("attractions", vec![raw("a1")]),
            ]),
            failing: vec![],
        };

        let bundle = service(provider, 5).discover("Mumbai", &[]).await.unwrap();
        assert_eq!(bundle.hotels.len(), 1);
        assert_eq!(bundle.restaurants.len(), 2);
        assert_eq!(bundle.attractions.len(), 1);
        assert!(bundle.specific_places.is_empty());
    }

    #[tokio::test]
    async fn test_discover_isolates_category_failures() {
        let provider = StubProvider {
            responses: HashMap::from([("restaurants", vec![raw("r1")])]),
            failing: vec!["hotels", "attractions"],
        };

        let bundle = service(provider, 5).discover("Mumbai", &[]).await.unwrap();
        assert!(bundle.hotels.is_empty());
        assert_eq!(bundle.restaurants.len(), 1);
    }

    #[tokio::test]
    async fn test_discover_fails_when_every_query_fails() {
        let provider = StubProvider {
            responses: HashMap::new(),
            failing: vec!["hotels", "restaurants", "attractions"],
        };

        let err = service(provider, 5).discover("Mumbai", &[]).await.unwrap_err();
        assert!(matches!(err, PlanningError::DiscoveryUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_discover_enforces_category_cap() {
        let provider = StubProvider {
            responses: HashMap::from([(
                "hotels",
                (0..10).map(|i| raw(&format!("h{i}"))).collect(),
            )]),
            failing: vec![],
        };

        let bundle = service(provider, 3).discover("Mumbai", &[]).await.unwrap();
        assert_eq!(bundle.hotels.len(), 3);
    }

    #[tokio::test]
    async fn test_discover_dedups_across_categories() {
        // Same venue from the attractions query and a targeted lookup:
        // the specific-place tag wins.
        let provider = StubProvider {
            responses: HashMap::from([
                ("attractions", vec![raw("gateway")]),
                ("Gateway of India", vec![raw("gateway")]),
            ]),
            failing: vec![],
        };

        let bundle = service(provider, 5)
            .discover("Mumbai", &["Gateway of India".to_string()])
            .await
            .unwrap();
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.specific_places.len(), 1);
    }
}
