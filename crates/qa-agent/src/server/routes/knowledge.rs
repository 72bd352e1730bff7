//! Knowledge base inspection and maintenance endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{
    response::{BuildResponse, SearchResponse, SourcesResponse, StatsResponse, StatusResponse},
    SearchParams,
};

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        knowledge_base: state.knowledge_base().stats().await?,
        html_files: state.html_files(),
    }))
}

/// POST /api/build-knowledge-base
///
/// Documents are indexed on upload, so this only confirms readiness.
pub async fn build_knowledge_base(State(state): State<AppState>) -> Result<Json<BuildResponse>> {
    Ok(Json(BuildResponse {
        status: "success".to_string(),
        message: "Knowledge base is ready".to_string(),
        stats: state.knowledge_base().stats().await?,
    }))
}

/// DELETE /api/clear - Drop all chunks and uploaded pages
pub async fn clear(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    state.knowledge_base().clear().await?;
    state.clear_html();
    tracing::info!("Knowledge base cleared");

    Ok(Json(StatusResponse {
        status: "success".to_string(),
        message: "Knowledge base cleared".to_string(),
    }))
}

/// GET /api/sources
pub async fn sources(State(state): State<AppState>) -> Result<Json<SourcesResponse>> {
    let stats = state.knowledge_base().stats().await?;
    Ok(Json(SourcesResponse {
        sources: stats.sources,
    }))
}

/// GET /api/search?query=..&n_results=..
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let results = state
        .knowledge_base()
        .search(&params.query, params.n_results)
        .await?;

    Ok(Json(SearchResponse {
        query: params.query,
        results,
    }))
}
