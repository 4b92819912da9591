use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check() -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let llm_result = check_key("OPENAI_API_KEY", "language model API key configured");
    health
        .services
        .insert("language_model".to_string(), llm_result.clone());

    let maps_result = check_key("GOOGLE_MAPS_API_KEY", "maps server API key configured");
    health.services.insert("maps".to_string(), maps_result.clone());

    if llm_result.status != "ok" || maps_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

/// Validate key existence only; no test call is made here.
fn check_key(var: &str, ok_detail: &str) -> ServiceStatus {
    match env::var(var) {
        Ok(key) => {
            let masked_key = if key.len() > 8 {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };

            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("{} ({})", ok_detail, masked_key)),
            }
        }
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} not configured", var)),
        },
    }
}
