//! # Customer Routes
//!
//! `/customers` CRUD endpoints. Handlers decode a statically typed body,
//! delegate to the core customer service on the blocking pool and encode
//! the result.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use customer_core::{Customer, CustomerId, CustomerInput};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            put(update_customer).delete(delete_customer),
        )
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Full customer record without `id`; every field is required.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CustomerRequest {
    /// Customer full name.
    pub name: String,
    /// CPF, digits with or without punctuation.
    pub identity_number: String,
    /// Birth date in any caller-chosen format.
    pub birth_date: String,
    pub street_address: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

impl From<CustomerRequest> for CustomerInput {
    fn from(value: CustomerRequest) -> Self {
        Self {
            name: value.name,
            identity_number: value.identity_number,
            birth_date: value.birth_date,
            street_address: value.street_address,
            postal_code: value.postal_code,
            city: value.city,
            state: value.state,
        }
    }
}

/// Stored customer record.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    pub identity_number: String,
    pub birth_date: String,
    pub street_address: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

impl From<Customer> for CustomerResponse {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            name: value.name,
            identity_number: value.identity_number,
            birth_date: value.birth_date,
            street_address: value.street_address,
            postal_code: value.postal_code,
            city: value.city,
            state: value.state,
        }
    }
}

/// Acknowledgement for create/update/delete.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MutationResponse {
    /// Customer the mutation applied to.
    pub id: CustomerId,
    pub message: String,
}

fn decode_body(
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<CustomerInput, AppError> {
    let Json(request) =
        body.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;
    Ok(request.into())
}

fn decode_id(id: Result<Path<CustomerId>, PathRejection>) -> Result<CustomerId, AppError> {
    let Path(id) = id.map_err(|rejection| AppError::InvalidPath(rejection.body_text()))?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /customers: List every customer.
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers", body = [CustomerResponse]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.run(|service| service.list_customers()).await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

/// POST /customers: Register a customer.
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = MutationResponse),
        (status = 400, description = "Identity number fails CPF validation", body = ErrorBody),
        (status = 409, description = "Identity number already registered", body = ErrorBody),
        (status = 422, description = "Missing or blank field", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let input = decode_body(body)?;
    let id = state
        .run(move |service| service.create_customer(&input))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            id,
            message: "customer created".to_string(),
        }),
    ))
}

/// PUT /customers/{id}: Replace every field of a customer.
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = MutationResponse),
        (status = 400, description = "Identity number fails CPF validation", body = ErrorBody),
        (status = 404, description = "Customer not found (strict update policy only)", body = ErrorBody),
        (status = 409, description = "Identity number held by another customer (strict update policy only)", body = ErrorBody),
        (status = 422, description = "Missing or blank field", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    id: Result<Path<CustomerId>, PathRejection>,
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = decode_id(id)?;
    let input = decode_body(body)?;
    state
        .run(move |service| service.update_customer(id, &input))
        .await?;

    Ok(Json(MutationResponse {
        id,
        message: "customer updated".to_string(),
    }))
}

/// DELETE /customers/{id}: Remove a customer permanently.
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer removed", body = MutationResponse),
        (status = 404, description = "Customer not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    id: Result<Path<CustomerId>, PathRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = decode_id(id)?;
    state.run(move |service| service.delete_customer(id)).await?;

    Ok(Json(MutationResponse {
        id,
        message: "customer removed".to_string(),
    }))
}
