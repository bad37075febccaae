//! Final travel plan returned to the caller

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::location::LocationBundle;

/// Complete trip plan assembled by the orchestrator
///
/// Constructed once per request and immutable afterwards. `budget` is
/// the resolved numeric ceiling, not the tier label; `maps_results`
/// feeds the map renderer; `generated_at` serializes as RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPlan {
    pub success: bool,
    pub destination: String,
    pub origin: String,
    /// Trip length in whole days
    pub duration: i64,
    /// Resolved budget ceiling in currency units
    pub budget: u32,
    pub travelers: u32,
    /// Synthesized itinerary text
    pub comprehensive_plan: String,
    /// Labeled research blob, empty when the research phase degraded
    pub search_results: String,
    /// Normalized location bundle, empty when discovery degraded
    pub maps_results: LocationBundle,
    pub generated_at: DateTime<Utc>,
}
