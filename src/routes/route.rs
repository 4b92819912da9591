use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::models::itinerary::Coordinates;
use crate::services::geocoding_service::{GeocodingService, PlaceResolver};

#[derive(Debug, Deserialize)]
pub struct Stop {
    #[allow(dead_code)]
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Either resolved stops or bare names to geocode first.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRouteRequest {
    #[serde(default)]
    pub stops: Option<Vec<Stop>>,
    #[serde(default, alias = "ordered_stops")]
    pub ordered_stops: Option<Vec<String>>,
}

/*
    POST /api/routes
*/
pub async fn compute_route(
    body: web::Json<ComputeRouteRequest>,
    geocoder: web::Data<GeocodingService>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let stops: Vec<Coordinates> = if let Some(stops) =
        request.stops.filter(|stops| stops.len() >= 2)
    {
        stops
            .iter()
            .map(|stop| Coordinates {
                lat: stop.lat,
                lng: stop.lng,
            })
            .collect()
    } else if let Some(names) = request.ordered_stops.filter(|names| names.len() >= 2) {
        let mut coordinates = Vec::with_capacity(names.len());
        for name in &names {
            let result = geocoder.geocode(name).await.map_err(ApiError::Maps)?;
            coordinates.push(result.coordinates());
        }
        coordinates
    } else {
        return Err(ApiError::InvalidInput(
            "send \"stops\" ([{name, lat, lng}, ...]) or \"orderedStops\" ([\"City A\", ...]) \
             with at least two entries"
                .to_string(),
        ));
    };

    let summary = geocoder.compute_route(&stops).await.map_err(ApiError::Maps)?;
    Ok(HttpResponse::Ok().json(summary))
}
