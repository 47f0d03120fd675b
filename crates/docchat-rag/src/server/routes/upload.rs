//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::auth::OwnerIdentity;
use crate::server::state::AppState;
use crate::types::{SessionId, UploadResponse};

/// POST /upload/pdf - Upload and index a PDF for the calling owner.
///
/// Multipart body: one file field, plus an optional `session_id` text field
/// binding the document to a conversation.
pub async fn upload_pdf(
    State(state): State<AppState>,
    OwnerIdentity(owner_id): OwnerIdentity,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut session_id: Option<SessionId> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_upload(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "session_id" {
            let value = field.text().await.map_err(|e| {
                Error::invalid_upload(format!("Failed to read session_id field: {}", e))
            })?;
            let value = value.trim();
            if !value.is_empty() {
                session_id = Some(SessionId::parse(value)?);
            }
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_upload(format!("Failed to read file: {}", e)))?;
        file = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file.ok_or_else(|| Error::invalid_upload("no file field in multipart body"))?;

    tracing::info!(
        "Upload from '{}': {} ({} bytes)",
        owner_id,
        filename,
        data.len()
    );

    let summary = state
        .pipeline()
        .ingest(&data, &filename, &owner_id, session_id)
        .await?;

    Ok(Json(UploadResponse::new(summary)))
}
