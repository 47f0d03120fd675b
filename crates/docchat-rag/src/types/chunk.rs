//! Chunk types with tenant/document metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stamped onto every chunk at ingestion time.
///
/// `owner_id` is mandatory and non-empty for any chunk that reaches the
/// vector index; the index rejects ownerless chunks so that no query can
/// ever retrieve them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Tenant/user identity that owns this chunk
    pub owner_id: String,
    /// Source document identity (content-hash derived)
    pub document_id: String,
    /// Original filename as uploaded by the user
    pub filename: String,
    /// Session the document was uploaded into, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

impl ChunkMetadata {
    /// Create metadata for a document owned by `owner_id`
    pub fn new(
        owner_id: impl Into<String>,
        document_id: impl Into<String>,
        filename: impl Into<String>,
        session_id: Option<Uuid>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            document_id: document_id.into(),
            filename: filename.into(),
            session_id,
            ingested_at: Utc::now(),
        }
    }
}

/// A contiguous slice of document text, immutable once stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Tenant/document metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk (embedding attached later by the pipeline)
    pub fn new(content: String, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            embedding: Vec::new(),
            metadata,
        }
    }
}
