//! News impact endpoint.

use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::types::ArticleImpact;
use crate::AppState;

/// Create the news-impact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_news_impact))
}

/// Classify recent articles about the asset.
async fn get_news_impact(State(state): State<AppState>) -> Result<Json<Vec<ArticleImpact>>> {
    let impacts = state.pipeline.news_impact().await?;
    Ok(Json(impacts))
}
