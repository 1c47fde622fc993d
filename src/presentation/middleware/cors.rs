//! CORS configuration.

use axum::http::HeaderValue;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsSettings;

/// Build the CORS layer from the configured origin list. An empty (or
/// entirely unparseable) list falls back to allowing any origin, which is
/// only sensible in development.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_origin(origins)
            .max_age(Duration::from_secs(3600))
    }
}
