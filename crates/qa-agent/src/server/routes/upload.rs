//! Upload endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::ingestion::decode_text;
use crate::server::state::AppState;
use crate::types::{
    response::{HtmlUploadResponse, UploadResponse},
    FileType, UploadResult,
};

/// Filename used when a multipart part carries none
const UNNAMED_UPLOAD: &str = "upload";

/// POST /api/upload/documents - Ingest support documents
///
/// Every part is processed independently; a failing file is reported in its
/// own result and does not abort the others.
pub async fn upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut results = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let filename = field.file_name().unwrap_or(UNNAMED_UPLOAD).to_string();

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                results.push(UploadResult::error(filename, format!("Failed to read file: {}", e)));
                continue;
            }
        };

        if !FileType::from_filename(&filename).is_supported() {
            let suffix = std::path::Path::new(&filename)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            tracing::warn!("Rejected {}: unsupported file type", filename);
            results.push(UploadResult::error(
                filename,
                format!("Unsupported file type: {}", suffix),
            ));
            continue;
        }

        tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

        match state.ingest(&filename, data.to_vec()).await {
            Ok(chunks) => {
                tracing::info!("Ingested {} ({} chunks)", filename, chunks);
                results.push(UploadResult::success(filename, chunks));
            }
            Err(e) => {
                tracing::error!("Failed to process {}: {}", filename, e);
                results.push(UploadResult::error(filename, e.to_string()));
            }
        }
    }

    Ok(Json(UploadResponse { results }))
}

/// POST /api/upload/html - Upload the page scripts will target
///
/// The raw page is kept for script generation and its summary is also added
/// to the knowledge base.
pub async fn upload_html(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<HtmlUploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
        .ok_or_else(|| Error::BadRequest("No file uploaded".to_string()))?;

    let filename = field.file_name().unwrap_or(UNNAMED_UPLOAD).to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read file: {}", e)))?;

    state.store_html(&filename, decode_text(&data));

    let chunks_created = state
        .ingest(&filename, data.to_vec())
        .await
        .map_err(|e| Error::BadRequest(e.to_string()))?;

    tracing::info!("Stored HTML page {} ({} chunks)", filename, chunks_created);

    Ok(Json(HtmlUploadResponse {
        filename,
        status: "success".to_string(),
        chunks_created,
        html_stored: true,
    }))
}
