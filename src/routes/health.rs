use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::env;

use crate::services::memory::store::{PaymentMethodStore, StoreStats};

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    environment: String,
    version: String,
    resources: StoreStats,
}

pub async fn health_check(store: web::Data<PaymentMethodStore>) -> impl Responder {
    let health = HealthStatus {
        status: "ok".to_string(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        resources: store.stats(),
    };

    HttpResponse::Ok().json(health)
}
