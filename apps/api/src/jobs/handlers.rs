//! Axum route handlers for the job catalog.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::catalog::{categories, create_job, find_job, NewJob};
use crate::jobs::ranking::top_jobs;
use crate::jobs::search::{search, ALL_CATEGORIES};
use crate::models::job::JobRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub categories: Vec<String>,
    pub highest_paying: Vec<JobRecord>,
    pub recent: Vec<JobRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_category() -> String {
    ALL_CATEGORIES.to_string()
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub jobs: Vec<JobRecord>,
    pub num_job: usize,
    pub keyword: String,
    pub category: String,
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct CreateFormResponse {
    pub categories: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let records = state.store.load().await?;
    let top = top_jobs(&records)?;
    Ok(Json(HomeResponse {
        categories: categories(&records),
        highest_paying: top.highest_paying,
        recent: top.recent,
    }))
}

/// GET /search
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let records = state.store.load().await?;
    let results = search(
        &records,
        &params.keyword,
        &params.category,
        params.page,
        state.config.page_size,
    );
    Ok(Json(SearchResponse {
        jobs: results.jobs,
        num_job: results.total_matches,
        keyword: params.keyword.trim().to_lowercase(),
        category: params.category.trim().to_lowercase(),
        page: params.page,
        total_pages: results.total_pages,
    }))
}

/// GET /job/:id
pub async fn handle_job_detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<JobRecord>, AppError> {
    let records = state.store.load().await?;
    find_job(&records, id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// GET /create
pub async fn handle_create_form(
    State(state): State<AppState>,
) -> Result<Json<CreateFormResponse>, AppError> {
    let records = state.store.load().await?;
    Ok(Json(CreateFormResponse {
        categories: categories(&records),
    }))
}

/// POST /create
pub async fn handle_create(
    State(state): State<AppState>,
    Form(new): Form<NewJob>,
) -> Result<Redirect, AppError> {
    let today = Local::now().date_naive();
    let job = create_job(state.store.as_ref(), &state.write_lock, new, today).await?;
    Ok(Redirect::to(&format!("/job/{}", job.id)))
}
