//! Vector index provider trait with tenant-scoped filtering

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Chunk, ChunkMetadata};

/// Exact-match metadata filter applied to every search and delete.
///
/// An owner identity is required at construction; the session clause is an
/// optional conjunction on top of it. There is no way to search the index
/// without an owner scope, which is the tenant-isolation invariant of the
/// whole system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFilter {
    owner_id: String,
    session_id: Option<Uuid>,
}

impl ChunkFilter {
    /// Filter scoped to one owner
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            session_id: None,
        }
    }

    /// Narrow the filter to one session (conjunction with the owner clause)
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// The owner this filter is scoped to
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// The session clause, if any
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Whether chunk metadata satisfies every clause of this filter.
    ///
    /// Ownerless chunks never match, regardless of the filter.
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        if metadata.owner_id.is_empty() || metadata.owner_id != self.owner_id {
            return false;
        }
        match self.session_id {
            Some(session_id) => metadata.session_id == Some(session_id),
            None => true,
        }
    }
}

/// Search result from the vector index
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk
    pub chunk: Chunk,
    /// Similarity score (higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `LocalVectorIndex`: in-process cosine index
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Insert or replace embedded chunks.
    ///
    /// Best-effort idempotent; there is no cross-chunk atomicity, and the
    /// caller must not assume partial writes committed on failure. Chunks
    /// with an empty owner identity are rejected.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// Retrieve the `top_k` chunks most similar to `query_embedding` that
    /// satisfy `filter`, ordered by descending similarity with ties broken
    /// by insertion order. An empty index yields an empty result, not an
    /// error.
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<ScoredChunk>>;

    /// Delete every chunk matching `filter`, returning the number removed
    async fn delete(&self, filter: &ChunkFilter) -> Result<usize>;

    /// Total number of chunks stored
    async fn len(&self) -> Result<usize>;

    /// Check if the index is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}
