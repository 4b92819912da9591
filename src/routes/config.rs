use actix_web::{HttpResponse, Responder};
use serde_json::json;
use std::env;

/*
    GET /api/config/maps-key

    Hands the browser-restricted maps key to the map widget. The server-side
    key never leaves the backend.
*/
pub async fn maps_key() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "apiKey": env::var("GOOGLE_MAPS_FRONTEND_API_KEY").ok(),
    }))
}
