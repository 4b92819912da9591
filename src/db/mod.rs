pub mod memory;

use uuid::Uuid;

use crate::models::trip::{PlanTripRequest, Trip, TripUpdate};

/// Keyed record of trips and their lifecycle. Last write wins per key;
/// each trip is only ever written by the request that owns it. The backing
/// is pluggable; the service ships with the in-memory implementation in
/// [`memory`].
pub trait TripStore: Send + Sync {
    /// Insert a new trip with status `pending` and no itinerary.
    fn create(&self, request: PlanTripRequest) -> Trip;

    fn get(&self, id: Uuid) -> Option<Trip>;

    /// Apply a partial update, returning the updated trip or `None` when the
    /// id is unknown.
    fn update(&self, id: Uuid, update: TripUpdate) -> Option<Trip>;
}
