//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // WebSocket gateway endpoint
        .route("/gateway", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .nest("/auth", auth_routes())
        .route(
            "/snowflakes/{id}",
            get(handlers::snowflake::get_snowflake_info),
        )
        // Protected routes (require authentication)
        .nest("/users", user_routes(state.clone()))
        .nest("/servers", server_routes(state.clone()))
        .nest("/channels", channel_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Server routes (protected)
fn server_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::server::create_server))
        .route("/{server_id}", get(handlers::server::get_server))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Channel routes (protected)
fn channel_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/{channel_id}/messages",
            get(handlers::message::get_messages).post(handlers::message::send_message),
        )
        .route(
            "/{channel_id}/messages/{message_id}",
            get(handlers::message::get_message),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
