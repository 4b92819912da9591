use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::db::TripStore;
use crate::models::trip::{PlanTripRequest, Trip, TripStatus, TripUpdate};

/// Volatile trip store backed by a map keyed by generated UUID. The system
/// of record for this service; contents do not survive a restart.
pub struct MemoryTripStore {
    trips: RwLock<HashMap<Uuid, Trip>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self {
            trips: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryTripStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TripStore for MemoryTripStore {
    fn create(&self, request: PlanTripRequest) -> Trip {
        let trip = Trip {
            id: Uuid::new_v4(),
            request,
            status: TripStatus::Pending,
            itinerary: None,
            created_at: Utc::now(),
        };
        self.trips
            .write()
            .expect("trip store lock poisoned")
            .insert(trip.id, trip.clone());
        trip
    }

    fn get(&self, id: Uuid) -> Option<Trip> {
        self.trips
            .read()
            .expect("trip store lock poisoned")
            .get(&id)
            .cloned()
    }

    fn update(&self, id: Uuid, update: TripUpdate) -> Option<Trip> {
        let mut trips = self.trips.write().expect("trip store lock poisoned");
        let trip = trips.get_mut(&id)?;
        if let Some(status) = update.status {
            trip.status = status;
        }
        if let Some(itinerary) = update.itinerary {
            trip.itinerary = Some(itinerary);
        }
        Some(trip.clone())
    }
}
