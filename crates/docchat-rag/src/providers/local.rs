//! In-process vector index with filtered cosine search

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::Chunk;

use super::vector_store::{ChunkFilter, ScoredChunk, VectorIndexProvider};

/// In-process vector index over a single logical collection.
///
/// Entries are kept in insertion order, which doubles as the stable
/// tie-break for equal similarity scores. Upserting a chunk id that is
/// already present replaces it in place, keeping its original position.
pub struct LocalVectorIndex {
    entries: RwLock<Vec<Chunk>>,
}

impl LocalVectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for LocalVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndexProvider for LocalVectorIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        for chunk in chunks {
            if chunk.metadata.owner_id.is_empty() {
                return Err(Error::index_write(format!(
                    "chunk {} has no owner identity",
                    chunk.id
                )));
            }
            if chunk.embedding.is_empty() {
                return Err(Error::index_write(format!(
                    "chunk {} has no embedding",
                    chunk.id
                )));
            }
        }

        let mut entries = self.entries.write();
        for chunk in chunks {
            match entries.iter_mut().find(|existing| existing.id == chunk.id) {
                Some(existing) => *existing = chunk.clone(),
                None => entries.push(chunk.clone()),
            }
        }

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<ScoredChunk>> {
        let entries = self.entries.read();

        let mut results: Vec<(usize, ScoredChunk)> = entries
            .iter()
            .enumerate()
            .filter(|(_, chunk)| filter.matches(&chunk.metadata))
            .map(|(position, chunk)| {
                let similarity = cosine_similarity(query_embedding, &chunk.embedding);
                (
                    position,
                    ScoredChunk {
                        chunk: chunk.clone(),
                        similarity,
                    },
                )
            })
            .collect();

        // Descending similarity, insertion order as the stable tie-break
        results.sort_by(|(pos_a, a), (pos_b, b)| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pos_a.cmp(pos_b))
        });
        results.truncate(top_k);

        Ok(results.into_iter().map(|(_, scored)| scored).collect())
    }

    async fn delete(&self, filter: &ChunkFilter) -> Result<usize> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|chunk| !filter.matches(&chunk.metadata));
        Ok(before - entries.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Cosine similarity; zero for mismatched dimensions or zero-norm vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
