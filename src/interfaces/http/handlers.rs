//! HTTP request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::application::calculator::LoanCalculator;
use crate::domain::calculation::LoanCalculation;
use crate::domain::loan::LoanRequest;
use crate::error::LoanError;

/// Application state.
pub struct AppState {
    pub calculator: Arc<LoanCalculator>,
}

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Term must be greater than zero and at most 1200 months")]
    pub error: String,
    /// `INVALID_AMOUNT`, `INVALID_RATE`, `INVALID_TERM`, `MALFORMED_REQUEST`
    /// or `STORE_UNAVAILABLE`.
    #[schema(example = "INVALID_TERM")]
    pub code: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Loan(LoanError),
    /// The body is not JSON or not an object.
    Malformed(JsonRejection),
}

impl From<LoanError> for ApiError {
    fn from(e: LoanError) -> Self {
        ApiError::Loan(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Loan(e) if e.is_validation() => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(e.to_string(), e.code()),
            ),
            ApiError::Loan(e) => {
                error!(error = %e, "loan calculation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(e.to_string(), e.code()),
                )
            }
            ApiError::Malformed(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(rejection.body_text(), "MALFORMED_REQUEST"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Calculate (or fetch) the schedule for a loan.
#[utoipa::path(
    post,
    path = "/api/loans/calculate",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Loan schedule calculated", body = LoanCalculation),
        (status = 400, description = "Invalid loan parameters", body = ErrorResponse),
        (status = 500, description = "Loan store unavailable", body = ErrorResponse)
    )
)]
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> Result<Json<LoanCalculation>, ApiError> {
    let Json(request) = payload?;
    let calculation = state.calculator.calculate(&request).await?;
    Ok(Json(calculation))
}

/// Drop the cached result for a loan. Succeeds whether or not anything was cached.
#[utoipa::path(
    post,
    path = "/api/loans/cache/evict",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 204, description = "Cache entry dropped, or there was none"),
        (status = 400, description = "Invalid loan parameters", body = ErrorResponse)
    )
)]
pub async fn evict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    state.calculator.evict(&request).await?;
    Ok(StatusCode::NO_CONTENT)
}
