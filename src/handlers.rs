use crate::errors::AppError;
use crate::models::*;
use crate::services::PredictionService;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Built once at startup; the model inside the service is read-only from then on.
#[derive(Clone)]
pub struct AppState {
    /// Scoring pipeline and prediction log.
    pub service: PredictionService,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "loan-risk-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /predict
///
/// Scores a loan application and records it in the prediction log.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - JSON body with the applicant fields.
///
/// # Returns
///
/// * `Result<Json<PredictionResponse>, AppError>` - Risk score and decision, or
///   a schema, encoding, scoring or persistence error.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ApplicantPayload>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("Malformed payload: {}", rejection.body_text()))
    })?;

    let scored = state.service.predict(payload).await?;

    tracing::info!(
        "POST /predict - stored prediction {} ({})",
        scored.id,
        scored.decision
    );

    Ok(Json(PredictionResponse {
        risk_score: scored.risk_score,
        decision: scored.decision,
    }))
}

/// GET /history
///
/// Returns the most recent predictions, newest first.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `params` - Optional `limit` query parameter.
pub async fn history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<PredictionRecord>>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid query: {}", rejection.body_text()))
    })?;

    let rows = state.service.history(params.limit).await?;
    tracing::debug!("GET /history - {} rows", rows.len());

    Ok(Json(rows))
}
