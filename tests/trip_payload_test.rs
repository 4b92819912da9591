use actix_web::{test, web, App, HttpResponse};
use serde_json::json;

fn completed_trip() -> serde_json::Value {
    json!({
        "id": "7c9a1c1e-4a31-4a89-93a3-61a2a6d7c111",
        "startLocation": "Seattle, WA",
        "endLocation": "Portland, OR",
        "startDate": "2025-06-01",
        "startTime": "8:00 AM",
        "endDate": "2025-06-02",
        "checkInTime": "6:00 PM",
        "isRoundTrip": false,
        "interests": ["Food and dining"],
        "status": "completed",
        "createdAt": "2025-06-01T15:00:00Z",
        "itinerary": {
            "totalDays": 2,
            "totalDistance": 348.0,
            "totalDrivingTime": "5h 40m",
            "totalAttractions": 10,
            "geocodingStatus": "partial",
            "geocodingNote": "1 locations could not be geocoded",
            "days": [
                {
                    "dayNumber": 1,
                    "date": "2025-06-01",
                    "route": {
                        "from": "Seattle, WA",
                        "to": "Portland, OR",
                        "distance": 174.0,
                        "drivingTime": "2h 50m",
                        "departureTime": "8:00 AM",
                        "arrivalTime": "10:50 AM",
                        "fromCoordinates": {
                            "lat": 47.6062, "lng": -122.3321,
                            "formattedAddress": "Seattle, WA, USA"
                        }
                    },
                    "attractions": [
                        {
                            "name": "Powell's City of Books",
                            "description": "Legendary independent bookstore",
                            "coordinates": { "lat": 45.5231, "lng": -122.6812 },
                            "approximate": false
                        }
                    ],
                    "overnightLocation": "Portland, OR",
                    "overnightCoordinates": {
                        "lat": 45.5152, "lng": -122.6784,
                        "formattedAddress": "Portland, OR, USA"
                    }
                },
                {
                    "dayNumber": 2,
                    "date": "2025-06-02",
                    "route": {
                        "from": "Portland, OR",
                        "to": "Portland, OR",
                        "distance": 0.0,
                        "drivingTime": "0m",
                        "departureTime": "9:00 AM",
                        "arrivalTime": "9:00 AM"
                    },
                    "attractions": [],
                    "overnightLocation": "Portland, OR"
                }
            ]
        }
    })
}

async fn get_trip() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(completed_trip()))
}

async fn route_summary() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "polyline": "abc123",
        "legs": [
            {
                "index": 0,
                "durationSeconds": 10200,
                "durationText": "2h 50m",
                "distanceMeters": 280026,
                "distanceText": "174.0 mi"
            }
        ],
        "totals": { "durationText": "2h 50m", "distanceText": "174.0 mi" }
    })))
}

async fn place_details() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "name": "Powell's City of Books",
        "formattedAddress": "1005 W Burnside St, Portland, OR 97209",
        "rating": 4.8,
        "userRatingsTotal": 32000,
        "photos": ["https://example.com/photo1", "https://example.com/photo2"],
        "website": "https://www.powells.com",
        "formattedPhoneNumber": "(800) 878-7323"
    })))
}

#[actix_web::test]
async fn test_trip_payload_invariants() {
    let app =
        test::init_service(App::new().route("/api/trips/{id}", web::get().to(get_trip))).await;

    let req = test::TestRequest::get()
        .uri("/api/trips/7c9a1c1e-4a31-4a89-93a3-61a2a6d7c111")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "completed");

    let itinerary = &body["itinerary"];
    let days = itinerary["days"].as_array().unwrap();
    assert_eq!(days.len() as u64, itinerary["totalDays"].as_u64().unwrap());

    for day in days {
        assert!(day["dayNumber"].as_u64().unwrap() >= 1);
        assert!(day["route"]["from"].is_string());
        assert!(day["route"]["to"].is_string());
        assert!(day["overnightLocation"].is_string());
    }

    // A partially geocoded itinerary still renders: degraded status plus an
    // explanatory note, with coordinates present only where lookups worked.
    assert_eq!(itinerary["geocodingStatus"], "partial");
    assert!(itinerary["geocodingNote"].is_string());
    assert!(days[0]["overnightCoordinates"].is_object());
    assert!(days[1].get("overnightCoordinates").is_none());
}

#[actix_web::test]
async fn test_route_summary_payload_shape() {
    let app =
        test::init_service(App::new().route("/api/routes", web::post().to(route_summary))).await;

    let req = test::TestRequest::post()
        .uri("/api/routes")
        .set_json(&json!({
            "stops": [
                { "name": "Seattle, WA", "lat": 47.6062, "lng": -122.3321 },
                { "name": "Portland, OR", "lat": 45.5152, "lng": -122.6784 }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["polyline"].is_string());
    let legs = body["legs"].as_array().unwrap();
    assert_eq!(legs[0]["index"], 0);
    assert!(legs[0]["durationText"].as_str().unwrap().ends_with('m'));
    assert!(legs[0]["distanceText"].as_str().unwrap().ends_with("mi"));
    assert!(body["totals"]["durationText"].is_string());
}

#[actix_web::test]
async fn test_place_search_payload_shape() {
    let app = test::init_service(
        App::new().route("/api/places/search", web::post().to(place_details)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/places/search")
        .set_json(&json!({ "query": "Powell's City of Books, Portland, OR" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["name"].is_string());
    assert!(body["rating"].is_number());
    assert!(body["photos"].is_array());
    assert!(body["formattedPhoneNumber"].is_string());
}
