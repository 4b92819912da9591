use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::itinerary::Itinerary;

/// Immutable trip parameters collected from the planning form. Never mutated
/// after submission.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripRequest {
    pub start_location: String,
    pub end_location: String,
    pub start_date: NaiveDate,
    pub start_time: String,
    pub end_date: NaiveDate,
    pub check_in_time: String,
    #[serde(default)]
    pub is_round_trip: bool,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

impl PlanTripRequest {
    /// Reject bad input before any external call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_location.trim().is_empty() {
            return Err("startLocation must not be empty".to_string());
        }
        if self.end_location.trim().is_empty() {
            return Err("endLocation must not be empty".to_string());
        }
        if self.start_time.trim().is_empty() {
            return Err("startTime must not be empty".to_string());
        }
        if self.check_in_time.trim().is_empty() {
            return Err("checkInTime must not be empty".to_string());
        }
        if self.end_date < self.start_date {
            return Err("endDate must not be before startDate".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Pending,
    Completed,
    Failed,
}

/// A trip request plus its lifecycle: `pending` until the plan either
/// completes (itinerary attached) or fails.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    #[serde(flatten)]
    pub request: PlanTripRequest,
    pub status: TripStatus,
    pub itinerary: Option<Itinerary>,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied to a stored trip; unset fields are left alone.
#[derive(Debug, Default, Clone)]
pub struct TripUpdate {
    pub status: Option<TripStatus>,
    pub itinerary: Option<Itinerary>,
}
