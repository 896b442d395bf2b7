//! Health check endpoint.

use std::time::Duration;

use actix_web::{HttpResponse, web};

use blogicum_shared::HealthResponse;

use crate::state::AppState;

const DATABASE_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /health
///
/// Always `200`; `database` reports whether the store answers in time.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = tokio::time::timeout(DATABASE_PING_TIMEOUT, state.database_ok())
        .await
        .unwrap_or(false);

    HttpResponse::Ok().json(HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
