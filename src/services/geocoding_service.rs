//! Maps provider adapter: forward geocoding via Places text search, place
//! details by place id, and driving-route computation via the Routes v2
//! endpoint. Provider statuses are normalized into [`MapsError`].
//!
//! Requires `GOOGLE_MAPS_API_KEY` with the Places, Geocoding, and Routes
//! APIs enabled. Without a key every lookup fails with a request-denied
//! error and callers degrade (the itinerary is still served, without
//! coordinates).

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::MapsError;
use crate::models::itinerary::{Coordinates, GeocodeResult, PlaceDetails};

const PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
const ROUTES_FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.legs.duration,routes.legs.distanceMeters,routes.polyline.encodedPolyline";
const DETAILS_FIELDS: &str =
    "name,geometry,formatted_address,rating,user_ratings_total,photos,website,formatted_phone_number";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_PLACE_PHOTOS: usize = 3;
const PHOTO_MAX_WIDTH: u32 = 800;
const METERS_PER_MILE: f64 = 1609.344;

/// The lookup surface the enrichment pipeline needs. `GeocodingService` is
/// the live implementation; tests substitute a scripted one.
pub trait PlaceResolver: Send + Sync {
    /// Forward geocode a free-text location.
    async fn geocode(&self, location: &str) -> Result<GeocodeResult, MapsError>;

    /// Place search plus details lookup for a free-text query.
    async fn resolve_place(&self, query: &str) -> Result<ResolvedPlace, MapsError>;
}

/// A place found by text search, with coordinates and whatever details the
/// provider returned.
#[derive(Debug, Clone)]
pub struct ResolvedPlace {
    pub name: Option<String>,
    pub coordinates: Coordinates,
    pub details: PlaceDetails,
}

#[derive(Clone)]
pub struct GeocodingService {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

// ---- provider wire formats ----

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<TextSearchResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    place_id: String,
    name: Option<String>,
    geometry: Geometry,
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    #[serde(default)]
    photos: Vec<PhotoRef>,
    website: Option<String>,
    formatted_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoRef {
    photo_reference: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutesRequest {
    origin: Waypoint,
    destination: Waypoint,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    intermediates: Vec<Waypoint>,
    travel_mode: &'static str,
    routing_preference: &'static str,
    units: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Waypoint {
    location: WaypointLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLocation {
    lat_lng: WaypointLatLng,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLatLng {
    latitude: f64,
    longitude: f64,
}

impl Waypoint {
    fn from_coordinates(coordinates: &Coordinates) -> Self {
        Self {
            location: WaypointLocation {
                lat_lng: WaypointLatLng {
                    latitude: coordinates.lat,
                    longitude: coordinates.lng,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<RouteData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteData {
    /// Duration in the REST encoding, e.g. `"5700s"`.
    duration: Option<String>,
    distance_meters: Option<u64>,
    #[serde(default)]
    legs: Vec<RouteLegData>,
    polyline: Option<RoutePolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteLegData {
    duration: Option<String>,
    distance_meters: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutePolyline {
    encoded_polyline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoutesErrorBody {
    error: Option<RoutesErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct RoutesErrorDetail {
    status: Option<String>,
    message: Option<String>,
}

// ---- normalized route summary ----

/// Driving route between an ordered list of stops, with distances and
/// durations formatted for display here (the presentation layer for the
/// routing summary).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub polyline: Option<String>,
    pub legs: Vec<RouteLegSummary>,
    pub totals: RouteTotals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLegSummary {
    pub index: usize,
    pub duration_seconds: Option<u64>,
    pub duration_text: Option<String>,
    pub distance_meters: Option<u64>,
    pub distance_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTotals {
    pub duration_text: Option<String>,
    pub distance_text: Option<String>,
}

impl GeocodingService {
    pub fn from_env() -> Self {
        Self::new(env::var("GOOGLE_MAPS_API_KEY").ok())
    }

    pub fn new(api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, MapsError> {
        self.api_key.as_deref().ok_or_else(|| {
            MapsError::RequestDenied("GOOGLE_MAPS_API_KEY is not configured".to_string())
        })
    }

    async fn text_search(&self, query: &str) -> Result<TextSearchResult, MapsError> {
        let key = self.key()?;
        let url = format!("{}/textsearch/json", PLACES_BASE_URL);

        let response = self
            .http_client
            .get(&url)
            .query(&[("query", query), ("key", key)])
            .send()
            .await
            .map_err(|e| MapsError::Upstream(format!("places request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MapsError::Upstream(format!(
                "places API returned HTTP {}",
                response.status()
            )));
        }

        let body: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| MapsError::Upstream(format!("unreadable places response: {}", e)))?;

        first_search_result(query, body)
    }

    async fn fetch_details(&self, place_id: &str) -> Result<DetailsResult, MapsError> {
        let key = self.key()?;
        let url = format!("{}/details/json", PLACES_BASE_URL);

        let response = self
            .http_client
            .get(&url)
            .query(&[("place_id", place_id), ("fields", DETAILS_FIELDS), ("key", key)])
            .send()
            .await
            .map_err(|e| MapsError::Upstream(format!("details request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MapsError::Upstream(format!(
                "details API returned HTTP {}",
                response.status()
            )));
        }

        let body: DetailsResponse = response
            .json()
            .await
            .map_err(|e| MapsError::Upstream(format!("unreadable details response: {}", e)))?;

        match body.status.as_str() {
            "OK" => body
                .result
                .ok_or_else(|| MapsError::NotFound(place_id.to_string())),
            other => Err(map_provider_status(
                other,
                body.error_message,
                place_id,
            )),
        }
    }

    fn photo_url(&self, key: &str, reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            PLACES_BASE_URL, PHOTO_MAX_WIDTH, reference, key
        )
    }

    fn details_from(&self, key: &str, result: DetailsResult) -> PlaceDetails {
        PlaceDetails {
            formatted_address: result.formatted_address,
            rating: result.rating,
            user_ratings_total: result.user_ratings_total,
            photos: result
                .photos
                .iter()
                .take(MAX_PLACE_PHOTOS)
                .map(|photo| self.photo_url(key, &photo.photo_reference))
                .collect(),
            website: result.website,
            formatted_phone_number: result.formatted_phone_number,
        }
    }

    /// Compute the driving route connecting `stops` in order. Distances and
    /// durations are normalized for display; the encoded polyline passes
    /// through untouched.
    pub async fn compute_route(&self, stops: &[Coordinates]) -> Result<RouteSummary, MapsError> {
        if stops.len() < 2 {
            return Err(MapsError::InvalidRequest(
                "at least two stops are required".to_string(),
            ));
        }
        let key = self.key()?;

        let body = RoutesRequest {
            origin: Waypoint::from_coordinates(&stops[0]),
            destination: Waypoint::from_coordinates(&stops[stops.len() - 1]),
            intermediates: stops[1..stops.len() - 1]
                .iter()
                .map(Waypoint::from_coordinates)
                .collect(),
            travel_mode: "DRIVE",
            routing_preference: "TRAFFIC_AWARE",
            units: "IMPERIAL",
        };

        let response = self
            .http_client
            .post(ROUTES_URL)
            .header("X-Goog-Api-Key", key)
            .header("X-Goog-FieldMask", ROUTES_FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| MapsError::Upstream(format!("routes request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MapsError::Upstream(format!("unreadable routes response: {}", e)))?;

        if !status.is_success() {
            let detail: Option<RoutesErrorDetail> = serde_json::from_str::<RoutesErrorBody>(&text)
                .ok()
                .and_then(|body| body.error);
            let message = detail
                .as_ref()
                .and_then(|d| d.message.clone())
                .unwrap_or_else(|| format!("routes API returned HTTP {}", status));
            return Err(match status.as_u16() {
                403 => MapsError::RequestDenied(message),
                400 => MapsError::InvalidRequest(message),
                _ => MapsError::Upstream(format!(
                    "{} ({})",
                    message,
                    detail
                        .and_then(|d| d.status)
                        .unwrap_or_else(|| "UNKNOWN".to_string())
                )),
            });
        }

        let parsed: RoutesResponse = serde_json::from_str(&text)
            .map_err(|e| MapsError::Upstream(format!("unreadable routes response: {}", e)))?;
        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| MapsError::NotFound("no route between the given stops".to_string()))?;

        Ok(summarize_route(route))
    }
}

impl PlaceResolver for GeocodingService {
    async fn geocode(&self, location: &str) -> Result<GeocodeResult, MapsError> {
        let result = self.text_search(location).await?;
        Ok(GeocodeResult {
            lat: result.geometry.location.lat,
            lng: result.geometry.location.lng,
            formatted_address: result
                .formatted_address
                .unwrap_or_else(|| location.to_string()),
        })
    }

    async fn resolve_place(&self, query: &str) -> Result<ResolvedPlace, MapsError> {
        let hit = self.text_search(query).await?;
        let key = self.key()?.to_string();
        let coordinates = Coordinates {
            lat: hit.geometry.location.lat,
            lng: hit.geometry.location.lng,
        };

        // Details are best-effort: a search hit with coordinates is already a
        // usable answer when the details call falls over.
        let (name, details) = match self.fetch_details(&hit.place_id).await {
            Ok(result) => {
                let name = result.name.clone().or(hit.name);
                (name, self.details_from(&key, result))
            }
            Err(e) => {
                log::warn!("place details unavailable for {}: {}", query, e);
                (
                    hit.name,
                    PlaceDetails {
                        formatted_address: hit.formatted_address,
                        rating: None,
                        user_ratings_total: None,
                        photos: Vec::new(),
                        website: None,
                        formatted_phone_number: None,
                    },
                )
            }
        };

        Ok(ResolvedPlace {
            name,
            coordinates,
            details,
        })
    }
}

/// Normalize a Places-style status + optional message into [`MapsError`].
fn map_provider_status(status: &str, error_message: Option<String>, query: &str) -> MapsError {
    match status {
        "ZERO_RESULTS" | "NOT_FOUND" => MapsError::NotFound(query.to_string()),
        "REQUEST_DENIED" => MapsError::RequestDenied(
            error_message.unwrap_or_else(|| "check API key permissions and billing".to_string()),
        ),
        "INVALID_REQUEST" => {
            MapsError::InvalidRequest(error_message.unwrap_or_else(|| query.to_string()))
        }
        other => MapsError::Upstream(
            error_message.unwrap_or_else(|| format!("provider status {}", other)),
        ),
    }
}

fn first_search_result(
    query: &str,
    body: TextSearchResponse,
) -> Result<TextSearchResult, MapsError> {
    match body.status.as_str() {
        "OK" => body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| MapsError::NotFound(query.to_string())),
        other => Err(map_provider_status(other, body.error_message, query)),
    }
}

fn summarize_route(route: RouteData) -> RouteSummary {
    let legs = route
        .legs
        .iter()
        .enumerate()
        .map(|(index, leg)| {
            let seconds = leg.duration.as_deref().and_then(parse_duration_seconds);
            RouteLegSummary {
                index,
                duration_seconds: seconds,
                duration_text: seconds.map(format_driving_time),
                distance_meters: leg.distance_meters,
                distance_text: leg.distance_meters.map(format_miles),
            }
        })
        .collect();

    RouteSummary {
        polyline: route.polyline.and_then(|p| p.encoded_polyline),
        legs,
        totals: RouteTotals {
            duration_text: route
                .duration
                .as_deref()
                .and_then(parse_duration_seconds)
                .map(format_driving_time),
            distance_text: route.distance_meters.map(format_miles),
        },
    }
}

/// Parse the REST duration encoding (`"5700s"`, fractional allowed) into
/// whole seconds.
fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let trimmed = raw.trim().strip_suffix('s').unwrap_or(raw.trim());
    trimmed.parse::<f64>().ok().map(|seconds| seconds.round() as u64)
}

/// `"16h 35m"` / `"35m"` formatting used by both route legs and totals.
fn format_driving_time(seconds: u64) -> String {
    let total_minutes = (seconds + 30) / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn format_miles(meters: u64) -> String {
    format!("{:.1} mi", meters as f64 / METERS_PER_MILE)
}
