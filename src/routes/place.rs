use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::errors::ApiError;
use crate::services::geocoding_service::{GeocodingService, PlaceResolver};

#[derive(Debug, Deserialize)]
pub struct PlaceSearchRequest {
    pub query: String,
}

/*
    POST /api/places/search
*/
pub async fn search_place(
    body: web::Json<PlaceSearchRequest>,
    geocoder: web::Data<GeocodingService>,
) -> Result<HttpResponse, ApiError> {
    let query = body.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::InvalidInput(
            "query parameter is required".to_string(),
        ));
    }

    let place = geocoder.resolve_place(&query).await.map_err(ApiError::Maps)?;
    Ok(HttpResponse::Ok().json(json!({
        "name": place.name,
        "formattedAddress": place.details.formatted_address,
        "rating": place.details.rating,
        "userRatingsTotal": place.details.user_ratings_total,
        "photos": place.details.photos,
        "website": place.details.website,
        "formattedPhoneNumber": place.details.formatted_phone_number,
    })))
}
