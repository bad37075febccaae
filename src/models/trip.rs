//! Trip request model and wire payload validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use crate::models::budget::BudgetTier;

/// Trip request as it arrives from the request layer
///
/// `passengers` may be a JSON string or an integer; upstream clients
/// historically sent both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPayload {
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    #[serde(rename = "departureDate")]
    pub departure_date: String,
    #[serde(rename = "returnDate")]
    pub return_date: String,
    pub passengers: Passengers,
    pub budget: String,
    #[serde(rename = "placesOfInterest", default)]
    pub places_of_interest: Vec<String>,
}

/// Passenger count accepted as either a string or a number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Passengers {
    Count(u32),
    Text(String),
}

impl Passengers {
    fn resolve(&self) -> Result<u32, PlanningError> {
        match self {
            Passengers::Count(n) => Ok(*n),
            Passengers::Text(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| PlanningError::validation(format!("invalid passenger count '{s}'"))),
        }
    }
}

/// Validated trip request driving a single planning run
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDate,
    pub return_date: NaiveDate,
    pub travelers: u32,
    pub tier: BudgetTier,
    pub places_of_interest: Vec<String>,
}

impl TripRequest {
    /// Validate a wire payload into a trip request
    ///
    /// All invariants are checked here, before any external call is
    /// issued: non-empty endpoints, parseable dates with the return
    /// strictly after departure, at least one traveler, and a budget
    /// tier from the fixed set.
    pub fn from_payload(payload: &PlanPayload) -> Result<Self, PlanningError> {
        let origin = clean_place_name(&payload.origin);
        let destination = clean_place_name(&payload.destination);

        if origin.is_empty() {
            return Err(PlanningError::validation("origin must not be empty"));
        }
        if destination.is_empty() {
            return Err(PlanningError::validation("destination must not be empty"));
        }

        let departure = parse_date(&payload.departure_date, "departure date")?;
        let return_date = parse_date(&payload.return_date, "return date")?;

        if return_date <= departure {
            return Err(PlanningError::validation(format!(
                "return date {return_date} must be after departure date {departure}"
            )));
        }

        let travelers = payload.passengers.resolve()?;
        if travelers == 0 {
            return Err(PlanningError::validation("at least one traveler required"));
        }

        let tier: BudgetTier = payload.budget.parse()?;

        let places_of_interest = payload
            .places_of_interest
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            origin,
            destination,
            departure,
            return_date,
            travelers,
            tier,
            places_of_interest,
        })
    }

    /// Trip duration in whole days, derived from the dates
    ///
    /// At least 1 for any request that passed validation.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.return_date - self.departure).num_days()
    }
}

/// Strip a trailing airport code from a place name
///
/// Booking frontends send values like "Mumbai (BOM)"; only the city name
/// is useful for research and discovery queries.
fn clean_place_name(raw: &str) -> String {
    let cleaned = match raw.find('(') {
        Some(index) => &raw[..index],
        None => raw,
    };
    cleaned.trim().to_string()
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, PlanningError> {
    raw.trim()
        .parse::<NaiveDate>()
        .map_err(|_| PlanningError::validation(format!("invalid {field} '{raw}' (expected YYYY-MM-DD)")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

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

    #[test]
    fn test_valid_payload_parses() {
        let request = TripRequest::from_payload(&payload()).unwrap();
        assert_eq!(request.origin, "Delhi");
        assert_eq!(request.destination, "Mumbai");
        assert_eq!(request.travelers, 2);
        assert_eq!(request.tier, BudgetTier::Mid);
        assert_eq!(request.duration_days(), 5);
    }

    #[test]
    fn test_airport_code_stripped() {
        assert_eq!(clean_place_name("Mumbai (BOM)"), "Mumbai");
        assert_eq!(clean_place_name("New York (JFK) "), "New York");
        assert_eq!(clean_place_name("Goa"), "Goa");
    }

    #[test]
    fn test_passengers_accepts_number_and_string() {
        let mut p = payload();
        p.passengers = Passengers::Count(3);
        assert_eq!(TripRequest::from_payload(&p).unwrap().travelers, 3);

        p.passengers = Passengers::Text(" 4 ".to_string());
        assert_eq!(TripRequest::from_payload(&p).unwrap().travelers, 4);
    }

    #[test]
    fn test_zero_travelers_rejected() {
        let mut p = payload();
        p.passengers = Passengers::Count(0);
        let err = TripRequest::from_payload(&p).unwrap_err();
        assert!(matches!(err, PlanningError::Validation { .. }));
    }

    #[rstest]
    #[case("2025-12-25", "2025-12-20")]
    #[case("2025-12-20", "2025-12-20")]
    fn test_return_must_follow_departure(#[case] departure: &str, #[case] ret: &str) {
        let mut p = payload();
        p.departure_date = departure.to_string();
        p.return_date = ret.to_string();
        let err = TripRequest::from_payload(&p).unwrap_err();
        assert!(matches!(err, PlanningError::Validation { .. }));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let mut p = payload();
        p.departure_date = "20-12-2025".to_string();
        let err = TripRequest::from_payload(&p).unwrap_err();
        assert!(matches!(err, PlanningError::Validation { .. }));
    }

    #[test]
    fn test_empty_destination_rejected() {
        let mut p = payload();
        p.destination = "  (BOM)".to_string();
        let err = TripRequest::from_payload(&p).unwrap_err();
        assert!(matches!(err, PlanningError::Validation { .. }));
    }

    #[test]
    fn test_unknown_tier_rejected_at_validation() {
        let mut p = payload();
        p.budget = "platinum".to_string();
        let err = TripRequest::from_payload(&p).unwrap_err();
        assert!(matches!(err, PlanningError::UnknownBudgetTier { .. }));
    }

    #[test]
    fn test_blank_places_of_interest_dropped() {
        let mut p = payload();
        p.places_of_interest = vec!["Gateway of India".to_string(), "  ".to_string()];
        let request = TripRequest::from_payload(&p).unwrap();
        assert_eq!(request.places_of_interest, vec!["Gateway of India"]);
    }

    #[test]
    fn test_payload_deserializes_string_passengers() {
        let json = r#"{
            "from": "Delhi (DEL)",
            "to": "Mumbai (BOM)",
            "departureDate": "2025-12-20",
            "returnDate": "2025-12-25",
            "passengers": "2",
            "budget": "mid"
        }"#;
        let p: PlanPayload = serde_json::from_str(json).unwrap();
        let request = TripRequest::from_payload(&p).unwrap();
        assert_eq!(request.travelers, 2);
    }
}
