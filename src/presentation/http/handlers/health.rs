//! Health and readiness probes.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::json;

use crate::startup::AppState;

static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Pin the start instant; called once during startup so uptime is measured
/// from boot rather than from the first readiness probe.
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
}

#[derive(Debug, Serialize)]
struct Probe {
    status: &'static str,
    version: &'static str,
}

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    Json(Probe {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health/live`
pub async fn liveness() -> impl IntoResponse {
    Json(Probe {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health/ready`
///
/// 503 when the database is unreachable. Gateway state is reported for
/// observability but never fails the probe; an empty registry is normal.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => json!({
            "status": "healthy",
            "latency_ms": started.elapsed().as_millis() as u64,
        }),
        Err(e) => json!({
            "status": "unhealthy",
            "message": format!("Database connection failed: {e}"),
        }),
    };

    let healthy = database["status"] == "healthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": SERVER_START.elapsed().as_secs(),
        "checks": {
            "database": database,
            "gateway": {
                "status": "healthy",
                "active_connections": state.gateway.connection_count(),
            },
        },
    });

    (status_code, Json(body))
}
