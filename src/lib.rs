//! `TripSmith` - AI-assisted trip planning
//!
//! This library combines web research, geocoded points-of-interest and
//! a generative-language model into a single structured itinerary,
//! tolerating partial failure of the research and discovery phases.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod places;
pub mod planner;
pub mod research;
pub mod synthesis;
pub mod web;

// Re-export core types for public API
pub use config::PlannerConfig;
pub use error::PlanningError;
pub use models::{
    BudgetProfile, BudgetTier, LocationBundle, LocationRecord, PlaceCategory, PlanPayload,
    TravelPlan, TripRequest,
};
pub use places::{DiscoveryService, GooglePlacesClient, PlaceProvider};
pub use planner::TripPlanner;
pub use research::{ResearchProvider, TavilyClient};
pub use synthesis::{GeminiClient, ItineraryGenerator, SynthesisEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlanningError>;
