use std::env;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

mod db;
mod errors;
mod models;
mod routes;
mod services;

use db::memory::MemoryTripStore;
use db::TripStore;
use services::generation_service::GenerationService;
use services::geocoding_service::GeocodingService;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let store: Arc<dyn TripStore> = Arc::new(MemoryTripStore::new());
    let generator = GenerationService::from_env();
    let geocoder = GeocodingService::from_env();

    if !generator.is_configured() {
        log::warn!("OPENAI_API_KEY is not set; trip planning will fail until it is configured");
    }
    if !geocoder.is_configured() {
        log::warn!("GOOGLE_MAPS_API_KEY is not set; itineraries will be served without coordinates");
    }

    log::info!("starting server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(generator.clone()))
            .app_data(web::Data::new(geocoder.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .route("/config/maps-key", web::get().to(routes::config::maps_key))
                    .service(
                        web::scope("/trips")
                            .route("/plan", web::post().to(routes::trip::plan_trip))
                            .route("/{id}", web::get().to(routes::trip::get_by_id))
                            .route("/{id}/edits", web::post().to(routes::trip::apply_edits)),
                    )
                    .route("/routes", web::post().to(routes::route::compute_route))
                    .route(
                        "/places/search",
                        web::post().to(routes::place::search_place),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
