//! Configuration management for the trip planning service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::error::PlanningError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the trip planning service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound HTTP policy shared by all external clients
    #[serde(default)]
    pub outbound: OutboundConfig,
    /// Web research (Tavily) settings
    #[serde(default)]
    pub research: ResearchConfig,
    /// Location discovery (Google Places) settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Itinerary synthesis (Gemini) settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the API listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Outbound HTTP policy
///
/// Explicit per-call timeout and retry count; one stalled external call
/// must never block a whole run, and retry behavior must be
/// reproducible rather than inherited from library defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundConfig {
    /// Request timeout in seconds, applied per call
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Transient retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Web research settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Tavily API key
    pub api_key: Option<String>,
    #[serde(default = "default_research_base_url")]
    pub base_url: String,
    /// Results requested per search query
    #[serde(default = "default_research_max_results")]
    pub max_results: u32,
}

/// Location discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Google Maps API key
    pub api_key: Option<String>,
    #[serde(default = "default_discovery_base_url")]
    pub base_url: String,
    /// Hard ceiling on records kept per category
    #[serde(default = "default_max_per_category")]
    pub max_per_category: usize,
}

/// Itinerary synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Gemini API key
    pub api_key: Option<String>,
    #[serde(default = "default_synthesis_base_url")]
    pub base_url: String,
    #[serde(default = "default_synthesis_model")]
    pub model: String,
    /// Cap on research characters embedded in the prompt
    #[serde(default = "default_max_research_chars")]
    pub max_research_chars: usize,
    /// Cap on locations listed per category in the prompt
    #[serde(default = "default_max_prompt_locations")]
    pub max_prompt_locations: usize,
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

fn default_research_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_research_max_results() -> u32 {
    10
}

fn default_discovery_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_max_per_category() -> usize {
    5
}

fn default_synthesis_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_synthesis_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_max_research_chars() -> usize {
    6_000
}

fn default_max_prompt_locations() -> usize {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_research_base_url(),
            max_results: default_research_max_results(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_discovery_base_url(),
            max_per_category: default_max_per_category(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_synthesis_base_url(),
            model: default_synthesis_model(),
            max_research_chars: default_max_research_chars(),
            max_prompt_locations: default_max_prompt_locations(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRIPSMITH_RESEARCH__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TRIPSMITH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripsmith").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.outbound.timeout_seconds == 0 || self.outbound.timeout_seconds > 300 {
            return Err(PlanningError::config(
                "Outbound timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.outbound.max_retries > 3 {
            return Err(PlanningError::config(
                "Outbound max retries cannot exceed 3; unbounded retry breaks latency bounds",
            )
            .into());
        }

        if self.discovery.max_per_category == 0 || self.discovery.max_per_category > 20 {
            return Err(PlanningError::config(
                "Discovery max_per_category must be between 1 and 20",
            )
            .into());
        }

        if self.research.max_results == 0 || self.research.max_results > 20 {
            return Err(PlanningError::config(
                "Research max_results must be between 1 and 20",
            )
            .into());
        }

        if self.synthesis.max_research_chars < 500 {
            return Err(PlanningError::config(
                "Synthesis max_research_chars must be at least 500",
            )
            .into());
        }

        if self.synthesis.model.is_empty() {
            return Err(PlanningError::config("Synthesis model must not be empty").into());
        }

        for (name, url) in [
            ("research", &self.research.base_url),
            ("discovery", &self.discovery.base_url),
            ("synthesis", &self.synthesis.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlanningError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Fetch a required API key or fail with a configuration error
    pub fn require_key<'a>(key: &'a Option<String>, name: &str) -> Result<&'a str> {
        match key.as_deref() {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(PlanningError::config(format!("{name} API key is not set")).into()),
        }
    }
}
