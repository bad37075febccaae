//! Web research client for destination knowledge
//!
//! Issues topic-scoped queries against the Tavily search API and folds
//! the answers into one labeled text blob for the synthesis prompt. The
//! whole phase is best-effort: the orchestrator degrades to an empty
//! blob when research is unavailable.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::{OutboundConfig, ResearchConfig};
use crate::error::PlanningError;
use crate::http;
use crate::models::TripRequest;

/// Source of destination research text
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Gather general destination knowledge for a trip
    async fn research(&self, request: &TripRequest) -> Result<String>;
}

/// Tavily search API client
pub struct TavilyClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    max_results: u32,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    content: Option<String>,
    url: Option<String>,
}

impl TavilyClient {
    /// Create a new research client
    pub fn new(research: &ResearchConfig, outbound: &OutboundConfig) -> anyhow::Result<Self> {
        let api_key = crate::config::PlannerConfig::require_key(&research.api_key, "Tavily")?;
        let client = http::build_client(outbound.timeout_seconds, outbound.max_retries)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: research.base_url.clone(),
            max_results: research.max_results,
        })
    }

    /// Run one search query and format its results
    async fn search(&self, query: &str) -> Result<String> {
        let url = format!("{}/search", self.base_url);
        let payload = SearchRequest {
            api_key: &self.api_key,
            query,
            search_depth: "advanced",
            include_answer: true,
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlanningError::research(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(match status.as_u16() {
                401 | 403 => PlanningError::research("search API rejected the API key"),
                429 => PlanningError::research("search API rate limit exceeded"),
                _ => PlanningError::research(format!("search API returned {status}")),
            });
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| PlanningError::research(format!("invalid search response: {e}")))?;

        let formatted = format_search_results(&search_response);
        if formatted.trim().is_empty() {
            return Err(PlanningError::research(format!(
                "search returned no usable content for '{query}'"
            )));
        }
        Ok(formatted)
    }
}

#[async_trait]
impl ResearchProvider for TavilyClient {
    #[instrument(skip(self, request), fields(destination = %request.destination))]
    async fn research(&self, request: &TripRequest) -> Result<String> {
        let topics = research_topics(request);
        info!("Researching {} across {} topics", request.destination, topics.len());

        let searches = topics
            .iter()
            .map(|(_, query)| self.search(query))
            .collect::<Vec<_>>();
        let outcomes = join_all(searches).await;

        let mut sections = Vec::new();
        for ((label, _), outcome) in topics.iter().zip(outcomes) {
            match outcome {
                Ok(text) => sections.push(format!("== {label} ==\n{text}")),
                Err(e) => warn!("Research topic '{}' failed: {}", label, e),
            }
        }

        if sections.is_empty() {
            return Err(PlanningError::research(format!(
                "all research queries failed for {}",
                request.destination
            )));
        }

        debug!("Research produced {} of {} sections", sections.len(), topics.len());
        Ok(sections.join("\n\n"))
    }
}

/// Topic-scoped queries covering the knowledge the itinerary needs
fn research_topics(request: &TripRequest) -> Vec<(&'static str, String)> {
    let destination = &request.destination;
    vec![
        (
            "Attractions and activities",
            format!("Top attractions, activities and local experiences in {destination} with typical prices"),
        ),
        (
            "Costs and budget",
            format!(
                "Hotel, restaurant and local transport costs in {destination}, daily budget estimates for {} travelers",
                request.travelers
            ),
        ),
        (
            "Safety and customs",
            format!(
                "Safety tips, local customs, weather and best time to visit {destination} when traveling from {}",
                request.origin
            ),
        ),
    ]
}

/// Format a search response the way downstream synthesis expects it
fn format_search_results(response: &SearchResponse) -> String {
    let mut formatted = String::new();

    if let Some(answer) = response.answer.as_deref()
        && !answer.trim().is_empty()
    {
        formatted.push_str(&format!("Search Answer: {answer}\n\n"));
    }

    if !response.results.is_empty() {
        formatted.push_str("Top Results:\n");
        for (i, hit) in response.results.iter().take(5).enumerate() {
            formatted.push_str(&format!(
                "\n{}. {}\n   {}\n   Source: {}\n",
                i + 1,
                hit.title.as_deref().unwrap_or("N/A"),
                hit.content.as_deref().unwrap_or("N/A"),
                hit.url.as_deref().unwrap_or("N/A"),
            ));
        }
    }

    formatted
}
