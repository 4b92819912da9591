use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db::TripStore;
use crate::errors::ApiError;
use crate::models::overlay::EditOverlay;
use crate::models::trip::{PlanTripRequest, TripStatus, TripUpdate};
use crate::services::enrichment_service::EnrichmentService;
use crate::services::generation_service::GenerationService;
use crate::services::geocoding_service::GeocodingService;

/*
    POST /api/trips/plan
*/
pub async fn plan_trip(
    body: web::Json<PlanTripRequest>,
    store: web::Data<dyn TripStore>,
    generator: web::Data<GenerationService>,
    geocoder: web::Data<GeocodingService>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate().map_err(ApiError::InvalidInput)?;

    let trip = store.create(request.clone());
    log::info!(
        "planning trip {} from {} to {}",
        trip.id,
        request.start_location,
        request.end_location
    );

    let itinerary = match generator.generate_itinerary(&request).await {
        Ok(itinerary) => itinerary,
        Err(e) => {
            log::error!("itinerary generation failed for trip {}: {}", trip.id, e);
            store.update(
                trip.id,
                TripUpdate {
                    status: Some(TripStatus::Failed),
                    itinerary: None,
                },
            );
            return Err(ApiError::Generation(e));
        }
    };

    let enriched = EnrichmentService::new(geocoder.get_ref().clone())
        .enrich_itinerary(itinerary)
        .await;

    let updated = store
        .update(
            trip.id,
            TripUpdate {
                status: Some(TripStatus::Completed),
                itinerary: Some(enriched),
            },
        )
        .ok_or_else(|| ApiError::NotFound(format!("trip {}", trip.id)))?;

    Ok(HttpResponse::Ok().json(updated))
}

/*
    GET /api/trips/{id}
*/
pub async fn get_by_id(
    path: web::Path<String>,
    store: web::Data<dyn TripStore>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_trip_id(&path.into_inner())?;
    match store.get(id) {
        Some(trip) => Ok(HttpResponse::Ok().json(trip)),
        None => Err(ApiError::NotFound(format!("trip {}", id))),
    }
}

/*
    POST /api/trips/{id}/edits

    Folds a client edit overlay (removed original indexes plus custom
    attractions per day) into the stored itinerary and returns the updated
    trip.
*/
pub async fn apply_edits(
    path: web::Path<String>,
    body: web::Json<EditOverlay>,
    store: web::Data<dyn TripStore>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_trip_id(&path.into_inner())?;
    let trip = store
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("trip {}", id)))?;
    let itinerary = trip.itinerary.as_ref().ok_or_else(|| {
        ApiError::InvalidInput("trip has no itinerary to edit".to_string())
    })?;

    let mut overlay = body.into_inner();
    log::info!(
        "applying edit overlay to trip {}: {} -> {} attractions",
        id,
        itinerary.total_attractions,
        overlay.effective_attraction_count(itinerary)
    );

    let committed = overlay.commit(itinerary);
    let updated = store
        .update(
            id,
            TripUpdate {
                status: None,
                itinerary: Some(committed),
            },
        )
        .ok_or_else(|| ApiError::NotFound(format!("trip {}", id)))?;

    Ok(HttpResponse::Ok().json(updated))
}

fn parse_trip_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidInput("invalid trip id".to_string()))
}
