//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer Registry API",
        description = "Create, list, update and delete customers. Identity numbers are validated as CPF (modulo-11 check digits)."
    ),
    paths(
        crate::routes::customers::list_customers,
        crate::routes::customers::create_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,
        crate::routes::health::health,
    ),
    components(schemas(
        crate::routes::customers::CustomerRequest,
        crate::routes::customers::CustomerResponse,
        crate::routes::customers::MutationResponse,
        crate::routes::health::HealthResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "customers", description = "Customer lifecycle"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
