//! Error types and handling for the trip planning pipeline

use thiserror::Error;

/// Main error type for the trip planning pipeline
///
/// Only `Validation`, `UnknownBudgetTier` and `Synthesis` terminate a
/// planning run; research and discovery failures are absorbed by the
/// orchestrator as degraded partial results.
#[derive(Error, Debug)]
pub enum PlanningError {
    /// Invalid trip request, detected before any external call
    #[error("Invalid trip request: {message}")]
    Validation { message: String },

    /// Budget tier label outside the fixed set; no safe default exists
    #[error("Unknown budget tier: {label}")]
    UnknownBudgetTier { label: String },

    /// Web research phase failed; recovered as an empty research blob
    #[error("Research unavailable: {message}")]
    ResearchUnavailable { message: String },

    /// A discovery category query failed; recovered per category
    #[error("Discovery unavailable: {message}")]
    DiscoveryUnavailable { message: String },

    /// Itinerary synthesis failed; this phase is load-bearing
    #[error("Synthesis failed: {message}")]
    Synthesis { message: String },

    /// Configuration or wiring errors, raised at startup
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PlanningError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new unknown-budget-tier error
    pub fn unknown_tier<S: Into<String>>(label: S) -> Self {
        Self::UnknownBudgetTier {
            label: label.into(),
        }
    }

    /// Create a new research error
    pub fn research<S: Into<String>>(message: S) -> Self {
        Self::ResearchUnavailable {
            message: message.into(),
        }
    }

    /// Create a new discovery error
    pub fn discovery<S: Into<String>>(message: S) -> Self {
        Self::DiscoveryUnavailable {
            message: message.into(),
        }
    }

    /// Create a new synthesis error
    pub fn synthesis<S: Into<String>>(message: S) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlanningError::Validation { message } => {
                format!("Invalid trip request: {message}")
            }
            PlanningError::UnknownBudgetTier { label } => {
                format!("Unknown budget tier '{label}'. Valid tiers: budget, mid, premium, luxury.")
            }
            PlanningError::ResearchUnavailable { .. } => {
                "Destination research is temporarily unavailable.".to_string()
            }
            PlanningError::DiscoveryUnavailable { .. } => {
                "Location discovery is temporarily unavailable.".to_string()
            }
            PlanningError::Synthesis { .. } => {
                "Unable to generate an itinerary right now. Please try again.".to_string()
            }
            PlanningError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}
