//! Trip planning orchestrator
//!
//! Drives the three phases of a planning run: research and discovery
//! fan out concurrently and individually degrade to empty results;
//! synthesis is the single hard join point and the only phase allowed
//! to fail the run.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::config::PlannerConfig;
use crate::models::{LocationBundle, PlanPayload, TravelPlan, TripRequest};
use crate::places::{DiscoveryService, GooglePlacesClient, PlaceProvider};
use crate::research::{ResearchProvider, TavilyClient};
use crate::synthesis::{GeminiClient, ItineraryGenerator, SynthesisEngine};

/// Pipeline controller for a single trip request
///
/// Holds its collaborators behind trait seams; each `plan` call owns
/// its intermediate state, so concurrent runs share nothing mutable.
pub struct TripPlanner {
    research: Arc<dyn ResearchProvider>,
    discovery: DiscoveryService,
    synthesis: SynthesisEngine,
}

impl TripPlanner {
    pub fn new(
        research: Arc<dyn ResearchProvider>,
        discovery: DiscoveryService,
        synthesis: SynthesisEngine,
    ) -> Self {
        Self {
            research,
            discovery,
            synthesis,
        }
    }

    /// Wire up the real external clients from configuration
    pub fn from_config(config: &PlannerConfig) -> anyhow::Result<Self> {
        let research: Arc<dyn ResearchProvider> =
            Arc::new(TavilyClient::new(&config.research, &config.outbound)?);

        let places: Arc<dyn PlaceProvider> =
            Arc::new(GooglePlacesClient::new(&config.discovery, &config.outbound)?);
        let discovery = DiscoveryService::new(places, config.discovery.max_per_category);

        let generator: Arc<dyn ItineraryGenerator> =
            Arc::new(GeminiClient::new(&config.synthesis, &config.outbound)?);
        let synthesis = SynthesisEngine::new(
            generator,
            config.synthesis.max_research_chars,
            config.synthesis.max_prompt_locations,
        );

        Ok(Self::new(research, discovery, synthesis))
    }

    /// Plan a trip from a wire payload
    ///
    /// Validation happens before any external call; research and
    /// discovery degrade instead of aborting; synthesis failure fails
    /// the run.
    #[instrument(skip_all)]
    pub async fn plan(&self, payload: &PlanPayload) -> Result<TravelPlan> {
        let request = TripRequest::from_payload(payload)?;
        let profile = request.tier.resolve();

        info!(
            "Planning {} -> {}, {} days, budget {}, {} travelers",
            request.origin,
            request.destination,
            request.duration_days(),
            profile.ceiling,
            request.travelers
        );

        // Research and discovery have no data dependency on each other.
        let (research_text, bundle) = tokio::join!(
            self.research_phase(&request),
            self.discovery_phase(&request)
        );

        let itinerary = self
            .synthesis
            .synthesize(&request, &profile, &research_text, &bundle)
            .await?;

        Ok(TravelPlan {
            success: true,
            destination: request.destination.clone(),
            origin: request.origin.clone(),
            duration: request.duration_days(),
            budget: profile.ceiling,
            travelers: request.travelers,
            comprehensive_plan: itinerary,
            search_results: research_text,
            maps_results: bundle,
            generated_at: Utc::now(),
        })
    }

    /// Research phase, degraded to an empty blob on failure
    async fn research_phase(&self, request: &TripRequest) -> String {
        match self.research.research(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Research phase degraded: {}", e);
                String::new()
            }
        }
    }

    /// Discovery phase, degraded to an empty bundle on failure
    async fn discovery_phase(&self, request: &TripRequest) -> LocationBundle {
        match self
            .discovery
            .discover(&request.destination, &request.places_of_interest)
            .await
        {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Discovery phase degraded: {}", e);
                LocationBundle::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanningError;
    use crate::models::{Passengers, PlaceCategory};
    use crate::places::RawPlace;
    use crate::places::google::{RawGeometry, RawLatLng};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubResearch {
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ResearchProvider for StubResearch {
        async fn research(&self, _request: &TripRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PlanningError::research("stubbed outage"))
            } else {
                Ok("== Attractions ==\nGateway of India is popular.".to_string())
            }
        }
    }

    struct StubPlaces {
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlaceProvider for StubPlaces {
        async fn text_search(&self, query: &str) -> Result<Vec<RawPlace>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PlanningError::discovery("stubbed outage"));
            }
            let id = if query.contains("hotels") {
                "h1"
            } else if query.contains("restaurants") {
                "r1"
            } else {
                "a1"
            };
            Ok(vec![RawPlace {
                name: Some(format!("Place {id}")),
                formatted_address: Some("Mumbai".to_string()),
                rating: Some(4.5),
                user_ratings_total: Some(500),
                geometry: Some(RawGeometry {
                    location: Some(RawLatLng {
                        lat: Some(18.9),
                        lng: Some(72.8),
                    }),
                }),
                place_id: Some(id.to_string()),
                types: vec![],
            }])
        }
    }

    struct StubGenerator {
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ItineraryGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PlanningError::synthesis("stubbed outage"));
            }
            // Day-labeled section per requested day, like a real plan.
            let days: i64 = prompt
                .lines()
                .find_map(|l| l.strip_prefix("Create a detailed "))
                .and_then(|l| l.split('-').next())
                .and_then(|n| n.parse().ok())
                .unwrap_or(3);
            let mut text = String::from("Executive Summary: a fine trip.\n");
            for day in 1..=days {
                text.push_str(&format!("Day {day}: explore.\n"));
            }
            text.push_str("Budget breakdown: within ceiling.\n");
            Ok(text)
        }
    }

    struct Counters {
        research: Arc<AtomicUsize>,
        places: Arc<AtomicUsize>,
        generate: Arc<AtomicUsize>,
    }

    fn planner(
        research_fails: bool,
        places_fails: bool,
        generator_fails: bool,
    ) -> (TripPlanner, Counters) {
        let counters = Counters {
            research: Arc::new(AtomicUsize::new(0)),
            places: Arc::new(AtomicUsize::new(0)),
            generate: Arc::new(AtomicUsize::new(0)),
        };

        let research = Arc::new(StubResearch {
            fail: research_fails,
            calls: Arc::clone(&counters.research),
        });
        let places = Arc::new(StubPlaces {
            fail: places_fails,
            calls: Arc::clone(&counters.places),
        });
        let generator = Arc::new(StubGenerator {
            fail: generator_fails,
            calls: Arc::clone(&counters.generate),
        });

        let planner = TripPlanner::new(
            research,
            DiscoveryService::new(places, 5),
            SynthesisEngine::new(generator, 6_000, 5),
        );
        (planner, counters)
    }

    fn payload() -> PlanPayload {
        PlanPayload {
            origin: "Delhi (DEL)".to_string(),
            destination: "Mumbai (BOM)".to_string(),
            departure_date: "2025-12-20".to_string(),
            return_date: "2025-12-25".to_string(),
            passengers: Passengers::Text("2".to_string()),
            budget: "mid".to_string(),
            places_of_interest: vec![],
        }
    }

    #[tokio::test]
    async fn test_plan_end_to_end() {
        let (planner, _counters) = planner(false, false, false);
        let plan = planner.plan(&payload()).await.unwrap();

        assert!(plan.success);
        assert_eq!(plan.destination, "Mumbai");
        assert_eq!(plan.origin, "Delhi");
        assert_eq!(plan.duration, 5);
        assert_eq!(plan.budget, 25_000);
        assert_eq!(plan.travelers, 2);
        assert!(!plan.comprehensive_plan.is_empty());
        for day in 1..=5 {
            assert!(plan.comprehensive_plan.contains(&format!("Day {day}")));
        }
        assert!(!plan.search_results.is_empty());
        assert!(!plan.maps_results.is_empty());
        assert_eq!(plan.maps_results.hotels[0].category, PlaceCategory::Hotel);
    }

    #[tokio::test]
    async fn test_discovery_failure_degrades_not_aborts() {
        let (planner, _counters) = planner(false, true, false);
        let plan = planner.plan(&payload()).await.unwrap();

        assert!(plan.success);
        assert!(plan.maps_results.is_empty());
        assert!(!plan.comprehensive_plan.is_empty());
        assert!(!plan.search_results.is_empty());
    }

    #[tokio::test]
    async fn test_research_failure_degrades_not_aborts() {
        let (planner, _counters) = planner(true, false, false);
        let plan = planner.plan(&payload()).await.unwrap();

        assert!(plan.success);
        assert!(plan.search_results.is_empty());
        assert!(!plan.maps_results.is_empty());
    }

    #[tokio::test]
    async fn test_both_phases_degraded_still_succeeds() {
        let (planner, _counters) = planner(true, true, false);
        let plan = planner.plan(&payload()).await.unwrap();

        assert!(plan.success);
        assert!(plan.search_results.is_empty());
        assert!(plan.maps_results.is_empty());
        assert!(plan.comprehensive_plan.contains("Day 1"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_fails_the_run() {
        let (planner, _counters) = planner(false, false, true);
        let err = planner.plan(&payload()).await.unwrap_err();
        assert!(matches!(err, PlanningError::Synthesis { .. }));
    }

    #[tokio::test]
    async fn test_unknown_tier_fails_before_any_call() {
        let (planner, counters) = planner(false, false, false);
        let mut bad = payload();
        bad.budget = "platinum".to_string();

        let err = planner.plan(&bad).await.unwrap_err();
        assert!(matches!(err, PlanningError::UnknownBudgetTier { .. }));
        assert_eq!(counters.research.load(Ordering::SeqCst), 0);
        assert_eq!(counters.places.load(Ordering::SeqCst), 0);
        assert_eq!(counters.generate.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_dates_fail_before_any_call() {
        let (planner, counters) = planner(false, false, false);
        let mut bad = payload();
        bad.return_date = "2025-12-20".to_string();

        let err = planner.plan(&bad).await.unwrap_err();
        assert!(matches!(err, PlanningError::Validation { .. }));
        assert_eq!(counters.research.load(Ordering::SeqCst), 0);
        assert_eq!(counters.places.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_specific_places_reach_discovery() {
        let (planner, counters) = planner(false, false, false);
        let mut p = payload();
        p.places_of_interest = vec!["Gateway of India".to_string()];

        let plan = planner.plan(&p).await.unwrap();
        assert!(plan.success);
        // 3 category queries plus 1 targeted lookup.
        assert_eq!(counters.places.load(Ordering::SeqCst), 4);
    }
}
