//! Response types for the HTTP surface

use serde::{Deserialize, Serialize};

use super::message::ConversationSummary;

/// Answer to a chat query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The generated (or degraded-fallback) answer text
    pub results: String,
}

/// Outcome of a document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Processing status
    pub status: String,
    /// Number of pages in the source document
    pub page_count: usize,
    /// Number of chunks stored in the index
    pub chunk_count: usize,
}

impl IngestSummary {
    /// Summary for a successfully processed document
    pub fn processed(page_count: usize, chunk_count: usize) -> Self {
        Self {
            status: "processed".to_string(),
            page_count,
            chunk_count,
        }
    }
}

/// Upload endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub metadata: IngestSummary,
}

impl UploadResponse {
    pub fn new(metadata: IngestSummary) -> Self {
        Self {
            message: "File processed successfully".to_string(),
            metadata,
        }
    }
}

/// Per-tenant conversation listing: one summary row per session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryListResponse {
    pub conversations: Vec<ConversationSummary>,
}
