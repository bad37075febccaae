//! HTTP API for the trip planner

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde_json::json;

use crate::error::PlanningError;
use crate::models::PlanPayload;
use crate::planner::TripPlanner;

pub fn router(planner: Arc<TripPlanner>) -> Router {
    Router::new()
        .route("/plan", post(plan_trip))
        .with_state(planner)
}

async fn plan_trip(
    State(planner): State<Arc<TripPlanner>>,
    Json(payload): Json<PlanPayload>,
) -> Response {
    match planner.plan(&payload).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => {
            let status = match &e {
                PlanningError::Validation { .. } | PlanningError::UnknownBudgetTier { .. } => {
                    StatusCode::BAD_REQUEST
                }
                PlanningError::Synthesis { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let body = json!({
                "success": false,
                "error": e.user_message(),
                "generated_at": Utc::now(),
            });
            (status, Json(body)).into_response()
        }
    }
}
