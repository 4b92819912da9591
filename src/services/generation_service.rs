//! Language-model client for itinerary generation.
//!
//! Sends a system + user message pair with a JSON-only response format and a
//! fixed temperature, then parses the single JSON document the model returns
//! into a typed [`Itinerary`]. Transport and provider failures are mapped to
//! the [`GenerationError`] taxonomy. No retries happen here; the caller
//! decides.

use std::env;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::models::itinerary::Itinerary;
use crate::models::trip::PlanTripRequest;
use crate::services::prompt_builder;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4o";
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct GenerationService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GenerationService {
    /// Build from `OPENAI_API_KEY` / `OPENAI_BASE_URL`. A missing key does
    /// not fail startup; every generation attempt reports an auth failure
    /// until the key is configured.
    pub fn from_env() -> Self {
        Self::new(
            env::var("OPENAI_API_KEY").ok(),
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )
    }

    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            api_key,
            base_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a full itinerary for one trip request.
    pub async fn generate_itinerary(
        &self,
        request: &PlanTripRequest,
    ) -> Result<Itinerary, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::AuthFailed)?;
        let prompt = prompt_builder::build_prompt(request);

        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt_builder::SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature: TEMPERATURE,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Upstream(format!("unreadable response body: {}", e)))?;

        if !status.is_success() {
            return Err(classify_http_failure(status, &text));
        }

        let completion: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::Upstream(format!("unexpected completion payload: {}", e)))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationError::MalformedResponse("completion contained no content".to_string())
            })?;

        parse_itinerary(&content)
    }
}

/// Map a non-2xx provider response to the error taxonomy. The body is
/// checked for quota wording first: providers report quota exhaustion
/// through 429 as well.
fn classify_http_failure(status: StatusCode, body: &str) -> GenerationError {
    let classified = GenerationError::classify(body);
    if matches!(classified, GenerationError::QuotaExceeded) {
        return classified;
    }
    match status.as_u16() {
        401 | 403 => GenerationError::AuthFailed,
        429 => GenerationError::RateLimited,
        _ => classified,
    }
}

/// Parse the model's JSON content into a typed itinerary, enforcing the
/// declared-vs-listed day count at the boundary. Any mismatch fails the
/// whole operation; there is no partial acceptance.
pub fn parse_itinerary(content: &str) -> Result<Itinerary, GenerationError> {
    let itinerary: Itinerary = serde_json::from_str(content).map_err(|e| {
        GenerationError::MalformedResponse(format!("not the requested JSON shape: {}", e))
    })?;

    if itinerary.days.len() as u32 != itinerary.total_days {
        return Err(GenerationError::MalformedResponse(format!(
            "plan declares {} days but lists {}",
            itinerary.total_days,
            itinerary.days.len()
        )));
    }

    Ok(itinerary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_json(day_number: u32) -> serde_json::Value {
        serde_json::json!({
            "dayNumber": day_number,
            "date": format!("2025-06-0{}", day_number),
            "route": {
                "from": "Seattle, WA",
                "to": "Portland, OR",
                "distance": 174.0,
                "drivingTime": "2h 50m",
                "departureTime": "8:00 AM",
                "arrivalTime": "10:50 AM"
            },
            "attractions": [
                { "name": "Powell's City of Books", "description": "Bookstore" }
            ],
            "overnightLocation": "Portland, OR"
        })
    }

    #[test]
    fn parses_a_well_formed_plan() {
        let content = serde_json::json!({
            "totalDays": 2,
            "totalDistance": 348.0,
            "totalDrivingTime": "5h 40m",
            "totalAttractions": 2,
            "days": [day_json(1), day_json(2)]
        })
        .to_string();

        let itinerary = parse_itinerary(&content).unwrap();
        assert_eq!(itinerary.total_days, 2);
        assert_eq!(itinerary.days.len() as u32, itinerary.total_days);
        assert_eq!(itinerary.days[0].day_number, 1);
    }

    #[test]
    fn day_count_mismatch_is_malformed() {
        let content = serde_json::json!({
            "totalDays": 3,
            "totalDistance": 348.0,
            "totalDrivingTime": "5h 40m",
            "totalAttractions": 2,
            "days": [day_json(1), day_json(2)]
        })
        .to_string();

        let err = parse_itinerary(&content).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn prose_instead_of_json_is_malformed() {
        let err = parse_itinerary("Here is your trip plan! Day 1: drive south.").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn http_429_with_quota_body_is_quota_exceeded() {
        let err = classify_http_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"You exceeded your current quota, please check your plan and billing details."}}"#,
        );
        assert!(matches!(err, GenerationError::QuotaExceeded));
    }

    #[test]
    fn http_429_without_quota_body_is_rate_limited() {
        let err = classify_http_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Requests are coming in too fast, slow down."}}"#,
        );
        assert!(matches!(err, GenerationError::RateLimited));
    }

    #[test]
    fn http_401_is_auth_failed() {
        let err = classify_http_failure(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key provided"}}"#,
        );
        assert!(matches!(err, GenerationError::AuthFailed));
    }

    #[test]
    fn http_500_is_upstream() {
        let err = classify_http_failure(StatusCode::INTERNAL_SERVER_ERROR, "server exploded");
        assert!(matches!(err, GenerationError::Upstream(_)));
    }

    #[test]
    fn unconfigured_service_reports_auth_failure() {
        let service = GenerationService::new(None, DEFAULT_BASE_URL.to_string());
        assert!(!service.is_configured());
        let request = PlanTripRequest {
            start_location: "Seattle, WA".to_string(),
            end_location: "Portland, OR".to_string(),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: "8:00 AM".to_string(),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            check_in_time: "6:00 PM".to_string(),
            is_round_trip: false,
            interests: None,
        };
        let err = tokio_test::block_on(service.generate_itinerary(&request)).unwrap_err();
        assert!(matches!(err, GenerationError::AuthFailed));
    }
}
