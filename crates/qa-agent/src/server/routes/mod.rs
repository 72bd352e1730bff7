//! API routes for the QA agent server

pub mod generate;
pub mod knowledge;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Uploads - with larger body limit for files
        .route(
            "/upload/documents",
            post(upload::upload_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/upload/html",
            post(upload::upload_html).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Knowledge base
        .route("/build-knowledge-base", post(knowledge::build_knowledge_base))
        .route("/stats", get(knowledge::stats))
        .route("/sources", get(knowledge::sources))
        .route("/search", get(knowledge::search))
        .route("/clear", delete(knowledge::clear))
        // Generation
        .route("/generate/test-cases", post(generate::generate_test_cases))
        .route(
            "/generate/selenium-script",
            post(generate::generate_selenium_script),
        )
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "qa-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document-grounded test case and Selenium script generation",
        "endpoints": {
            "POST /api/upload/documents": "Upload support documents (md, txt, json, pdf, html, docx)",
            "POST /api/upload/html": "Upload the target HTML page",
            "POST /api/build-knowledge-base": "Confirm the knowledge base is ready",
            "POST /api/generate/test-cases": "Generate test cases for a request",
            "POST /api/generate/selenium-script": "Generate a Selenium script for a test case",
            "GET /api/stats": "Knowledge base statistics and uploaded pages",
            "GET /api/sources": "List source documents",
            "GET /api/search": "Semantic search (query, n_results)",
            "DELETE /api/clear": "Clear the knowledge base and uploaded pages"
        }
    }))
}
