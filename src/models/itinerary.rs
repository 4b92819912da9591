use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A bare lat/lng pair.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A geocoded location: coordinates plus the provider's formatted address.
/// Produced per unique location string and cached for one enrichment pass.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

impl GeocodeResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// How much of the enrichment pass succeeded. Always set once enrichment has
/// run; `None` only on a freshly parsed itinerary.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingStatus {
    Ok,
    Partial,
    Failed,
}

/// Rich place metadata from the maps provider's details lookup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub website: Option<String>,
    pub formatted_phone_number: Option<String>,
}

/// A point of interest attached to a day. Created by the language model with
/// name and description only; coordinates and details are added in place by
/// the enrichment pass.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// True when `coordinates` is a synthetic position near the overnight
    /// stop rather than a real lookup result.
    #[serde(default)]
    pub approximate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PlaceDetails>,
}

/// One day's driving segment between two overnight-capable locations.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub distance: f64,
    pub driving_time: String,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_coordinates: Option<GeocodeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_coordinates: Option<GeocodeResult>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day_number: u32,
    pub date: NaiveDate,
    pub route: RouteLeg,
    #[serde(default)]
    pub attractions: Vec<Attraction>,
    pub overnight_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overnight_coordinates: Option<GeocodeResult>,
}

/// The full multi-day plan. Invariant: `days.len() == total_days`, enforced
/// where the language model's response is parsed.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub total_days: u32,
    pub total_distance: f64,
    pub total_driving_time: String,
    pub total_attractions: u32,
    pub days: Vec<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_status: Option<GeocodingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_note: Option<String>,
}
