use actix_web::{test, web, App, HttpResponse};
use serde_json::json;

async fn health_check() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "services": {
            "language_model": { "status": "ok", "details": null },
            "maps": { "status": "ok", "details": null }
        },
        "environment": "development",
        "version": "0.1.0"
    })))
}

async fn maps_key() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "apiKey": "browser-key" })))
}

async fn trip_not_found() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::NotFound().json(json!({
        "error": "not_found",
        "message": "trip 0d4e3a58-0000-0000-0000-000000000000 not found"
    })))
}

async fn invalid_plan_request() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::BadRequest().json(json!({
        "error": "invalid_request",
        "message": "invalid request: endDate must not be before startDate"
    })))
}

async fn quota_exceeded() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::BadGateway().json(json!({
        "error": "quota_exceeded",
        "message": "The language model API key has exceeded its usage quota. Check the provider billing and usage limits."
    })))
}

#[actix_web::test]
async fn test_health_endpoint_shape() {
    let app =
        test::init_service(App::new().route("/health", web::get().to(health_check))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["services"].get("language_model").is_some());
    assert!(body["services"].get("maps").is_some());
}

#[actix_web::test]
async fn test_maps_key_endpoint_shape() {
    let app = test::init_service(
        App::new().route("/api/config/maps-key", web::get().to(maps_key)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/config/maps-key")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("apiKey").is_some());
}

#[actix_web::test]
async fn test_unknown_trip_returns_404_error_body() {
    let app = test::init_service(
        App::new().route("/api/trips/{id}", web::get().to(trip_not_found)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/trips/0d4e3a58-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[actix_web::test]
async fn test_invalid_plan_request_returns_400_error_body() {
    let app = test::init_service(
        App::new().route("/api/trips/plan", web::post().to(invalid_plan_request)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/trips/plan")
        .set_json(&json!({
            "startLocation": "Seattle, WA",
            "endLocation": "Portland, OR",
            "startDate": "2025-06-02",
            "startTime": "8:00 AM",
            "endDate": "2025-06-01",
            "checkInTime": "6:00 PM"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn test_generation_failure_carries_distinct_error_kind() {
    let app = test::init_service(
        App::new().route("/api/trips/plan", web::post().to(quota_exceeded)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/trips/plan")
        .set_json(&json!({
            "startLocation": "Seattle, WA",
            "endLocation": "Portland, OR",
            "startDate": "2025-06-01",
            "startTime": "8:00 AM",
            "endDate": "2025-06-02",
            "checkInTime": "6:00 PM"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "quota_exceeded");
    assert!(body["message"].as_str().unwrap().contains("quota"));
}

#[actix_web::test]
async fn test_method_not_allowed_on_plan() {
    let app = test::init_service(
        App::new().route("/api/trips/plan", web::post().to(invalid_plan_request)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/trips/plan").to_request();
    let resp = test::call_service(&app, req).await;
    // A route registered for POST only answers 404/405 to GET.
    assert!(resp.status() == 404 || resp.status() == 405);
}

#[actix_web::test]
async fn test_cors_headers() {
    let app = test::init_service(
        App::new()
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .route("/health", web::get().to(health_check)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("Origin", "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
