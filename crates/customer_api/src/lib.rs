//! # customer_api: HTTP surface for the customer registry
//!
//! | Method | Path               | Handler                              |
//! |--------|--------------------|--------------------------------------|
//! | GET    | `/`                | plain-text banner                    |
//! | GET    | `/health`          | [`routes::health::health`]           |
//! | GET    | `/customers`       | [`routes::customers::list_customers`] |
//! | POST   | `/customers`       | [`routes::customers::create_customer`] |
//! | PUT    | `/customers/{id}`  | [`routes::customers::update_customer`] |
//! | DELETE | `/customers/{id}`  | [`routes::customers::delete_customer`] |
//! | GET    | `/openapi.json`    | generated OpenAPI document           |
//!
//! Middleware (outermost first): CORS, request logging, body limit.

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Customer records are small; 64 KiB is generous.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Assemble the application router with permissive CORS.
pub fn app(state: AppState) -> Router {
    app_with_cors(state, build_cors(None))
}

/// Assemble the application router with the given CORS policy.
pub fn app_with_cors(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::customers::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(middleware::log_requests))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer from a comma-separated origin list.
///
/// `None` or `"*"` allows any origin. Unparseable origins are skipped.
pub fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() != "*" => {
            let origins: Vec<HeaderValue> =
                o.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        }
        _ => CorsLayer::new().allow_origin(Any),
    };

    cors.allow_headers(Any)
        .allow_methods(Any)
        .max_age(Duration::from_secs(3600))
}
