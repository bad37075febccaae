//! Google Places text-search client

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::Result;
use crate::config::{DiscoveryConfig, OutboundConfig};
use crate::error::PlanningError;
use crate::http;

/// Source of raw place records for a free-text query
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Run one text search and return the raw records
    async fn text_search(&self, query: &str) -> Result<Vec<RawPlace>>;
}

/// Raw place record as returned by the source API
///
/// Shapes are known to be partial and inconsistent; every field the
/// canonical schema needs is optional here and resolved by the
/// normalizer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub geometry: Option<RawGeometry>,
    pub place_id: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    pub location: Option<RawLatLng>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    error_message: Option<String>,
}

/// Google Places API client
pub struct GooglePlacesClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    /// Create a new places client
    pub fn new(discovery: &DiscoveryConfig, outbound: &OutboundConfig) -> anyhow::Result<Self> {
        let api_key = crate::config::PlannerConfig::require_key(&discovery.api_key, "Google Maps")?;
        let client = http::build_client(outbound.timeout_seconds, outbound.max_retries)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: discovery.base_url.clone(),
        })
    }
}

#[async_trait]
impl PlaceProvider for GooglePlacesClient {
    #[instrument(skip(self), fields(query = %query))]
    async fn text_search(&self, query: &str) -> Result<Vec<RawPlace>> {
        let url = format!(
            "{}/textsearch/json?query={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PlanningError::discovery(format!("places request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(match status.as_u16() {
                401 | 403 => PlanningError::discovery("places API rejected the API key"),
                429 => PlanningError::discovery("places API rate limit exceeded"),
                _ => PlanningError::discovery(format!("places API returned {status}")),
            });
        }

        let search_response: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| PlanningError::discovery(format!("invalid places response: {e}")))?;

        match search_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                debug!(
                    "Places query '{}' returned {} results",
                    query,
                    search_response.results.len()
                );
                Ok(search_response.results)
            }
            status => Err(PlanningError::discovery(format!(
                "places API status {status}: {}",
                search_response.error_message.as_deref().unwrap_or("no detail")
            ))),
        }
    }
}
