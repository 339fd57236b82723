//! Prediction endpoint.

use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::types::PredictionResponse;
use crate::AppState;

/// Create the prediction router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_prediction))
}

/// Run the full prediction pipeline.
async fn get_prediction(State(state): State<AppState>) -> Result<Json<PredictionResponse>> {
    let prediction = state.pipeline.predict().await?;
    Ok(Json(prediction))
}
