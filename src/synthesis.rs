//! Itinerary synthesis
//!
//! Builds one structured prompt from everything the earlier phases
//! gathered and makes a single generative-model call per planning run.
//! This phase is load-bearing: a transport failure, an empty response
//! or a structurally unusable itinerary fails the run.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::Result;
use crate::config::{OutboundConfig, SynthesisConfig};
use crate::error::PlanningError;
use crate::http;
use crate::models::{BudgetProfile, LocationBundle, LocationRecord, TripRequest};

/// Generative-model backend producing itinerary text for a prompt
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new synthesis client
    pub fn new(synthesis: &SynthesisConfig, outbound: &OutboundConfig) -> anyhow::Result<Self> {
        let api_key = crate::config::PlannerConfig::require_key(&synthesis.api_key, "Gemini")?;
        let client = http::build_client(outbound.timeout_seconds, outbound.max_retries)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: synthesis.base_url.clone(),
            model: synthesis.model.clone(),
        })
    }
}

#[async_trait]
impl ItineraryGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlanningError::synthesis(format!("model request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(match status.as_u16() {
                401 | 403 => PlanningError::synthesis("model API rejected the API key"),
                429 => PlanningError::synthesis("model API rate limit exceeded"),
                _ => PlanningError::synthesis(format!("model API returned {status}")),
            });
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PlanningError::synthesis(format!("invalid model response: {e}")))?;

        let text = generate_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(PlanningError::synthesis("model returned no text"));
        }
        Ok(text)
    }
}

/// Prompt construction and output validation around a generator
pub struct SynthesisEngine {
    generator: std::sync::Arc<dyn ItineraryGenerator>,
    max_research_chars: usize,
    max_prompt_locations: usize,
}

impl SynthesisEngine {
    pub fn new(
        generator: std::sync::Arc<dyn ItineraryGenerator>,
        max_research_chars: usize,
        max_prompt_locations: usize,
    ) -> Self {
        Self {
            generator,
            max_research_chars,
            max_prompt_locations,
        }
    }

    /// Synthesize the itinerary for a run
    ///
    /// One model call per run; the returned text must pass the
    /// structural validity check before it is accepted.
    #[instrument(skip_all, fields(destination = %request.destination))]
    pub async fn synthesize(
        &self,
        request: &TripRequest,
        profile: &BudgetProfile,
        research: &str,
        bundle: &LocationBundle,
    ) -> Result<String> {
        let prompt = self.build_prompt(request, profile, research, bundle);
        debug!("Synthesis prompt is {} chars", prompt.len());

        let itinerary = self.generator.generate(&prompt).await?;
        validate_itinerary(&itinerary)?;

        info!(
            "Synthesized a {}-day itinerary for {}",
            request.duration_days(),
            request.destination
        );
        Ok(itinerary)
    }

    /// Assemble the single structured prompt for the model
    fn build_prompt(
        &self,
        request: &TripRequest,
        profile: &BudgetProfile,
        research: &str,
        bundle: &LocationBundle,
    ) -> String {
        let duration = request.duration_days();
        let mut prompt = format!(
            "Create a detailed {duration}-day travel plan for {destination}.\n\n\
             TRIP DETAILS:\n\
             - Origin: {origin}\n\
             - Destination: {destination}\n\
             - Duration: {duration} days\n\
             - Dates: {departure} to {return_date}\n\
             - Travelers: {travelers}\n\
             - Total budget: {ceiling}\n\n\
             SPENDING GUIDANCE:\n\
             - Accommodation: about {nightly} per night\n\
             - Meals: about {meals} per day\n\
             - Local transport: about {transport} per day\n\
             - Activities: about {activities} per day\n",
            destination = request.destination,
            origin = request.origin,
            departure = request.departure,
            return_date = request.return_date,
            travelers = request.travelers,
            ceiling = profile.ceiling,
            nightly = profile.nightly_stay,
            meals = profile.daily_meals,
            transport = profile.daily_transport,
            activities = profile.daily_activities,
        );

        let excerpt = truncate_chars(research, self.max_research_chars);
        if excerpt.trim().is_empty() {
            prompt.push_str("\nRESEARCH RESULTS:\n(no research available)\n");
        } else {
            prompt.push_str("\nRESEARCH RESULTS:\n");
            prompt.push_str(excerpt);
            prompt.push('\n');
        }

        prompt.push_str("\nLOCATION DATA:\n");
        if bundle.is_empty() {
            prompt.push_str("(no location data available)\n");
        } else {
            for (heading, records) in [
                ("Hotels", &bundle.hotels),
                ("Restaurants", &bundle.restaurants),
                ("Attractions", &bundle.attractions),
                ("Requested places", &bundle.specific_places),
            ] {
                if records.is_empty() {
                    continue;
                }
                prompt.push_str(&format!("{heading}:\n"));
                for record in records.iter().take(self.max_prompt_locations) {
                    prompt.push_str(&format_location_line(record));
                }
            }
        }

        prompt.push_str(&format!(
            "\nCreate a comprehensive plan with:\n\
             1. Executive Summary\n\
             2. Day-by-day detailed itinerary with timings (label each day \"Day 1\", \"Day 2\", ...)\n\
             3. Accommodation recommendations (3-4 options)\n\
             4. Transportation guide\n\
             5. Food & dining suggestions\n\
             6. Complete budget breakdown\n\
             7. Practical tips\n\
             8. Backup plans\n\n\
             Ensure the plan stays within the {} budget, includes specific costs, \
             and never invents places that are not supported by the data above.\n",
            profile.ceiling
        ));

        prompt
    }
}

/// One prompt line per location: name, address, rating, reviews
///
/// Coordinates are deliberately omitted; they only matter for map
/// rendering.
fn format_location_line(record: &LocationRecord) -> String {
    format!(
        "- {} (rating {:.1}, {} reviews) - {}\n",
        record.name,
        record.rating,
        record.reviews,
        if record.address.is_empty() {
            "address unknown"
        } else {
            &record.address
        }
    )
}

/// Structural validity check on generated itinerary text
///
/// A transport-successful but structurally empty response is not
/// usable: the minimum is a day-by-day breakdown and a budget section.
fn validate_itinerary(text: &str) -> Result<()> {
    let lowered = text.to_lowercase();

    if !lowered.contains("day 1") {
        return Err(PlanningError::synthesis(
            "generated itinerary is missing a day-by-day breakdown",
        ));
    }
    if !lowered.contains("budget") {
        return Err(PlanningError::synthesis(
            "generated itinerary is missing a budget breakdown",
        ));
    }
    Ok(())
}

/// Truncate to a character budget without splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
