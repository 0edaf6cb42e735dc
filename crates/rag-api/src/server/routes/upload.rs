//! Document upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

/// POST /upload - Ingest a single document
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| Error::bad_request(e.body_text()))?;

    let Some((file_name, data)) = read_file_field(&mut multipart).await? else {
        return Err(Error::bad_request("No file uploaded."));
    };
    if data.is_empty() {
        tracing::warn!("Rejected empty upload: {}", file_name);
        return Err(Error::bad_request("No file uploaded."));
    }

    tracing::info!("Processing upload: {} ({} bytes)", file_name, data.len());

    if state
        .document_service()
        .ingest_document(Some(data), &file_name)
        .await
    {
        Ok(Json(UploadResponse::ingested(file_name)))
    } else {
        Err(Error::IngestionFailed { file_name })
    }
}

/// First `file` part that carries a non-empty file name; other parts are skipped
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let data = field.bytes().await?;
        return Ok(Some((file_name, data)));
    }
    Ok(None)
}
