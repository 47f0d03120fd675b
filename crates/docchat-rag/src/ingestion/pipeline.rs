//! Ingestion pipeline orchestration

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::config::{ChunkingConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorIndexProvider};
use crate::types::{ChunkMetadata, IngestSummary, SessionId};

use super::chunker::ChunkSplitter;
use super::extract::TextExtractor;

/// Magic bytes every well-formed PDF starts with
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Main ingestion pipeline: validate → extract → chunk → embed → upsert.
///
/// The operation is synchronous from the caller's perspective and exposes no
/// partial-success state; chunks upserted before a mid-pipeline failure are
/// not rolled back.
pub struct IngestPipeline {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    splitter: ChunkSplitter,
    max_upload_size: usize,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        chunking: &ChunkingConfig,
        server: &ServerConfig,
    ) -> Self {
        Self {
            extractor,
            embedder,
            index,
            splitter: ChunkSplitter::from_config(chunking),
            max_upload_size: server.max_upload_size,
        }
    }

    /// Ingest an uploaded document for one owner, optionally bound to a
    /// session.
    pub async fn ingest(
        &self,
        data: &[u8],
        filename: &str,
        owner_id: &str,
        session_id: Option<SessionId>,
    ) -> Result<IngestSummary> {
        self.validate_upload(data, owner_id)?;

        let extracted = self.extractor.extract(data, filename).await?;
        tracing::info!(
            "Extracted {} pages ({} chars) from '{}'",
            extracted.page_count,
            extracted.text.chars().count(),
            filename
        );

        let document_id = content_hash(data);
        let metadata = ChunkMetadata::new(
            owner_id,
            document_id,
            filename,
            session_id.map(|s| s.as_uuid()),
        );

        let mut chunks = self.splitter.chunk_document(&extracted.text, &metadata);

        if !chunks.is_empty() {
            let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != chunks.len() {
                return Err(Error::embedding(format!(
                    "provider returned {} embeddings for {} chunks",
                    embeddings.len(),
                    chunks.len()
                )));
            }
            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }

            self.index.upsert(&chunks).await?;
        }

        tracing::info!(
            "Ingested '{}' for owner '{}': {} chunks",
            filename,
            owner_id,
            chunks.len()
        );

        Ok(IngestSummary::processed(extracted.page_count, chunks.len()))
    }

    /// Size/type validation; runs before any extraction work
    fn validate_upload(&self, data: &[u8], owner_id: &str) -> Result<()> {
        if owner_id.is_empty() {
            return Err(Error::invalid_request("owner identity must not be empty"));
        }
        if data.is_empty() {
            return Err(Error::invalid_upload("uploaded file is empty"));
        }
        if data.len() > self.max_upload_size {
            return Err(Error::invalid_upload(format!(
                "file size {} exceeds the maximum upload size of {} bytes",
                data.len(),
                self.max_upload_size
            )));
        }
        if !data.starts_with(PDF_MAGIC) {
            return Err(Error::invalid_upload(
                "file is not a PDF (missing %PDF- header)",
            ));
        }
        Ok(())
    }
}

/// Content-addressed document identity: hex sha256 of the uploaded bytes
fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::extract::ExtractedDocument;
    use crate::providers::{ChunkFilter, LocalVectorIndex};
    use async_trait::async_trait;

    /// Extractor that returns canned text regardless of input bytes
    struct StubExtractor {
        text: String,
        page_count: usize,
    }

    #[async_trait]
    impl TextExtractor for StubExtractor {
        async fn extract(&self, _data: &[u8], _filename: &str) -> Result<ExtractedDocument> {
            Ok(ExtractedDocument {
                text: self.text.clone(),
                page_count: self.page_count,
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Extractor that always fails to parse
    struct BrokenExtractor;

    #[async_trait]
    impl TextExtractor for BrokenExtractor {
        async fn extract(&self, _data: &[u8], filename: &str) -> Result<ExtractedDocument> {
            Err(Error::unsupported_document(filename, "not parseable"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    /// Deterministic letter-frequency embedder
    pub struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut embedding = vec![0.0f32; 26];
            for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
                let slot = (c.to_ascii_lowercase() as usize) - ('a' as usize);
                embedding[slot] += 1.0;
            }
            Ok(embedding)
        }

        fn dimensions(&self) -> usize {
            26
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn pipeline_with(
        extractor: Arc<dyn TextExtractor>,
        index: Arc<LocalVectorIndex>,
    ) -> IngestPipeline {
        IngestPipeline::new(
            extractor,
            Arc::new(FakeEmbedder),
            index,
            &ChunkingConfig::default(),
            &ServerConfig {
                max_upload_size: 1024,
                ..ServerConfig::default()
            },
        )
    }

    fn pdf_bytes() -> Vec<u8> {
        b"%PDF-1.7 stub".to_vec()
    }

    #[tokio::test]
    async fn ingest_reports_pages_and_chunks() {
        let index = Arc::new(LocalVectorIndex::new());
        let pipeline = pipeline_with(
            Arc::new(StubExtractor {
                text: "word ".repeat(500),
                page_count: 2,
            }),
            Arc::clone(&index),
        );

        let summary = pipeline
            .ingest(&pdf_bytes(), "report.pdf", "alice", None)
            .await
            .unwrap();

        assert_eq!(summary.status, "processed");
        assert_eq!(summary.page_count, 2);
        assert!(summary.chunk_count > 1);
        assert_eq!(index.len().await.unwrap(), summary.chunk_count);
    }

    #[tokio::test]
    async fn session_id_is_stamped_only_when_provided() {
        let index = Arc::new(LocalVectorIndex::new());
        let pipeline = pipeline_with(
            Arc::new(StubExtractor {
                text: "session scoped words".to_string(),
                page_count: 1,
            }),
            Arc::clone(&index),
        );

        let session = SessionId::random();
        pipeline
            .ingest(&pdf_bytes(), "a.pdf", "alice", Some(session))
            .await
            .unwrap();

        let filter = ChunkFilter::for_owner("alice").with_session(session.as_uuid());
        let query = FakeEmbedder.embed("session scoped words").await.unwrap();
        let hits = index.search(&query, 5, &filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.metadata.session_id, Some(session.as_uuid()));
    }

    #[tokio::test]
    async fn empty_document_stores_nothing() {
        let index = Arc::new(LocalVectorIndex::new());
        let pipeline = pipeline_with(
            Arc::new(StubExtractor {
                text: String::new(),
                page_count: 1,
            }),
            Arc::clone(&index),
        );

        let summary = pipeline
            .ingest(&pdf_bytes(), "empty.pdf", "alice", None)
            .await
            .unwrap();

        assert_eq!(summary.chunk_count, 0);
        assert!(index.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_extraction() {
        let pipeline = pipeline_with(
            Arc::new(BrokenExtractor),
            Arc::new(LocalVectorIndex::new()),
        );

        let mut data = pdf_bytes();
        data.resize(4096, 0);
        let err = pipeline
            .ingest(&data, "big.pdf", "alice", None)
            .await
            .unwrap_err();

        // BrokenExtractor would raise UnsupportedDocument; validation fires first
        assert!(matches!(err, Error::InvalidUpload(_)));
    }

    #[tokio::test]
    async fn non_pdf_upload_is_rejected() {
        let pipeline = pipeline_with(
            Arc::new(BrokenExtractor),
            Arc::new(LocalVectorIndex::new()),
        );

        let err = pipeline
            .ingest(b"GIF89a...", "image.pdf", "alice", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidUpload(_)));
    }

    #[tokio::test]
    async fn unparseable_document_surfaces_as_unsupported() {
        let pipeline = pipeline_with(
            Arc::new(BrokenExtractor),
            Arc::new(LocalVectorIndex::new()),
        );

        let err = pipeline
            .ingest(&pdf_bytes(), "odd.pdf", "alice", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedDocument { .. }));
    }

    #[tokio::test]
    async fn empty_owner_is_rejected() {
        let pipeline = pipeline_with(
            Arc::new(StubExtractor {
                text: "text".to_string(),
                page_count: 1,
            }),
            Arc::new(LocalVectorIndex::new()),
        );

        let err = pipeline
            .ingest(&pdf_bytes(), "a.pdf", "", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
