//! End-to-end flow: ingest a document, ask a question, read the history.
//!
//! External collaborators (text extraction, embeddings, generation) are
//! replaced with deterministic fakes behind the same traits the production
//! wiring uses; the index, pipeline, engine, and store are the real ones.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use docchat_rag::error::Result;
use docchat_rag::ingestion::{ExtractedDocument, IngestPipeline, TextExtractor};
use docchat_rag::providers::{
    ChunkFilter, EmbeddingProvider, LlmProvider, LocalVectorIndex, VectorIndexProvider,
};
use docchat_rag::retrieval::RagQueryEngine;
use docchat_rag::storage::ConversationStore;
use docchat_rag::types::{Role, SessionId};
use docchat_rag::RagConfig;

const ALICE_SESSION: &str = "11111111-1111-4111-8111-111111111111";

/// Two-page document text, stood in for real PDF extraction
struct TwoPageExtractor;

#[async_trait]
impl TextExtractor for TwoPageExtractor {
    async fn extract(&self, _data: &[u8], _filename: &str) -> Result<ExtractedDocument> {
        Ok(ExtractedDocument {
            text: "The document describes the quarterly budget. \
                   Revenue grew in every region.\n\n\
                   The second page lists projected spending for next year."
                .to_string(),
            page_count: 2,
        })
    }

    fn name(&self) -> &str {
        "two-page"
    }
}

/// Deterministic letter-frequency embedder
struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; 26];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            embedding[(c.to_ascii_lowercase() as usize) - ('a' as usize)] += 1.0;
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

/// LLM that answers with a fixed grounded-sounding string
struct CannedLlm;

#[async_trait]
impl LlmProvider for CannedLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("The document covers the quarterly budget and projected spending.".to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned"
    }
}

struct Harness {
    pipeline: IngestPipeline,
    engine: RagQueryEngine,
    conversations: Arc<ConversationStore>,
    index: Arc<LocalVectorIndex>,
    _tmp: tempfile::TempDir,
}

fn harness() -> Harness {
    let config = RagConfig::default();
    let tmp = tempfile::tempdir().expect("temp dir");
    let conversations =
        Arc::new(ConversationStore::open(tmp.path().join("conversations.db")).expect("store"));
    let index = Arc::new(LocalVectorIndex::new());
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbedder);

    let pipeline = IngestPipeline::new(
        Arc::new(TwoPageExtractor),
        Arc::clone(&embedder),
        Arc::clone(&index) as Arc<dyn VectorIndexProvider>,
        &config.chunking,
        &config.server,
    );

    let engine = RagQueryEngine::new(
        embedder,
        Arc::new(CannedLlm),
        Arc::clone(&index) as Arc<dyn VectorIndexProvider>,
        Arc::clone(&conversations),
        Duration::from_secs(5),
    );

    Harness {
        pipeline,
        engine,
        conversations,
        index,
        _tmp: tmp,
    }
}

#[tokio::test]
async fn ingest_then_ask_then_read_history() {
    let h = harness();
    let session = SessionId::parse(ALICE_SESSION).unwrap();

    // Ingest a two-page document for alice, bound to her session
    let summary = h
        .pipeline
        .ingest(b"%PDF-1.7 test fixture", "report.pdf", "alice", Some(session))
        .await
        .unwrap();
    assert_eq!(summary.status, "processed");
    assert_eq!(summary.page_count, 2);
    assert!(summary.chunk_count >= 1);

    // Ask a question in the same session
    let results = h
        .engine
        .answer("What is in the document?", "alice", &session, 3)
        .await
        .unwrap();
    assert!(!results.is_empty());

    // Both turns are retrievable, in order
    let messages = h.conversations.list_session("alice", &session).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "What is in the document?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, results);
    assert!(messages[0].timestamp <= messages[1].timestamp);

    // And the session shows up in alice's conversation listing
    let summaries = h.conversations.list_summaries("alice").unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].session_id, session.as_uuid());
    assert_eq!(summaries[0].role, Role::User);
}

#[tokio::test]
async fn another_tenant_sees_nothing() {
    let h = harness();
    let session = SessionId::parse(ALICE_SESSION).unwrap();

    h.pipeline
        .ingest(b"%PDF-1.7 test fixture", "report.pdf", "alice", Some(session))
        .await
        .unwrap();

    // Bob searches with the same query embedding; alice's chunks stay hers
    let query = FakeEmbedder.embed("What is in the document?").await.unwrap();
    let hits = h
        .index
        .search(&query, 10, &ChunkFilter::for_owner("bob"))
        .await
        .unwrap();
    assert!(hits.is_empty());

    // Bob's conversation listing is empty too
    assert!(h.conversations.list_summaries("bob").unwrap().is_empty());
}

#[tokio::test]
async fn malformed_session_ids_are_rejected() {
    // Version-1 UUID
    assert!(SessionId::parse("11111111-1111-1111-8111-111111111111").is_err());
    // Not a UUID at all
    assert!(SessionId::parse("conversation-42").is_err());
    // Version-4 UUID is accepted
    assert!(SessionId::parse(ALICE_SESSION).is_ok());
}
