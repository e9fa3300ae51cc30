use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::catalog::categories;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommended_categories: Vec<String>,
    pub categories: Vec<String>,
}

/// POST /recommend_category
/// Returns the predicted category alongside every category already in use.
pub async fn handle_recommend_category(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let records = state.store.load().await?;
    let label = state.recommender.recommend(&req.title, &req.description)?;
    Ok(Json(RecommendResponse {
        recommended_categories: vec![label],
        categories: categories(&records),
    }))
}
