//! Folio Server Library
//!
//! Owner-scoped document, page and annotation actions for a browser PDF
//! reader. The server binary is in main.rs; the router is built here so
//! integration tests can drive it directly.
//!
//! # Modules
//!
//! - `actions`: one handler per remote-callable action
//! - `guard`: document and page ownership checks
//! - `db`: SQLite repositories and schema
//! - `routes`: axum wiring for `/api/actions/*`

pub mod actions;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod guard;
pub mod patch;
pub mod routes;
pub mod state;
pub mod validation;

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/health", routes::health::router())
        .nest("/api/actions", routes::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_identity,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
