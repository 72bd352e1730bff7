//! Generation endpoints

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    response::ScriptResponse, ScriptGenerationRequest, TestCaseRequest, TestCaseResponse,
};

/// POST /api/generate/test-cases - Generate grounded test cases
pub async fn generate_test_cases(
    State(state): State<AppState>,
    Json(request): Json<TestCaseRequest>,
) -> Result<Json<TestCaseResponse>> {
    if state.knowledge_base().is_empty().await? {
        return Err(Error::EmptyKnowledgeBase);
    }

    let agent = state.agent()?;
    let generation = agent
        .generate_test_cases(&request.query, request.n_context)
        .await?;

    tracing::info!(
        "Generated {} test cases from {} sources",
        generation.test_cases.len(),
        generation.sources_used.len()
    );

    Ok(Json(generation.into()))
}

/// POST /api/generate/selenium-script - Generate a Selenium script for one test case
pub async fn generate_selenium_script(
    State(state): State<AppState>,
    Json(request): Json<ScriptGenerationRequest>,
) -> Result<Json<ScriptResponse>> {
    let html = target_html(&state, &request.html_filename).await?;

    let agent = state.agent()?;
    let script = agent
        .generate_selenium_script(&request.test_case, &html)
        .await?;

    Ok(Json(ScriptResponse {
        status: "success".to_string(),
        test_case_id: request.test_case.id_or_unknown(),
        script,
    }))
}

/// Uploaded page, or its stored chunks joined by newlines when the server
/// restarted since the upload
async fn target_html(state: &AppState, filename: &str) -> Result<String> {
    if let Some(html) = state.html_page(filename).filter(|html| !html.is_empty()) {
        return Ok(html);
    }

    let chunks = state.knowledge_base().get_by_source(filename).await?;
    if chunks.is_empty() {
        return Err(Error::HtmlNotFound(filename.to_string()));
    }

    tracing::debug!("Rebuilding {} from {} stored chunks", filename, chunks.len());
    Ok(chunks
        .into_iter()
        .map(|chunk| chunk.content)
        .collect::<Vec<_>>()
        .join("\n"))
}
