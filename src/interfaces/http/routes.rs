//! Route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::calculator::LoanCalculator;
use crate::domain::calculation::{LoanCalculation, PaymentScheduleItem};
use crate::domain::loan::LoanRequest;

use super::handlers::{self, AppState, ErrorResponse, HealthResponse};

/// Where the OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI description of the loan API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Loan Calculator API", description = "Annuity loan payment schedules"),
    paths(handlers::health, handlers::calculate, handlers::evict),
    components(schemas(
        LoanRequest,
        LoanCalculation,
        PaymentScheduleItem,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "loans", description = "Loan schedule calculation"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Create the API router.
///
/// # Arguments
/// * `calculator` - The loan calculator shared by all requests
pub fn create_router(calculator: Arc<LoanCalculator>) -> Router {
    let state = Arc::new(AppState { calculator });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/loans/calculate", post(handlers::calculate))
        .route("/api/loans/cache/evict", post(handlers::evict))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}
