//! Application state for the document Q&A server

use std::sync::Arc;
use std::time::Duration;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{IngestPipeline, PdfTextExtractor, TextExtractor};
use crate::providers::{
    EmbeddingProvider, LlmProvider, LocalVectorIndex, OllamaProvider, VectorIndexProvider,
};
use crate::retrieval::RagQueryEngine;
use crate::storage::ConversationStore;

/// Shared application state.
///
/// Every collaborator is constructed once at startup and injected here;
/// nothing is lazily initialized from module state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Ingestion pipeline
    pipeline: IngestPipeline,
    /// Query engine
    engine: RagQueryEngine,
    /// Conversation store
    conversations: Arc<ConversationStore>,
}

impl AppState {
    /// Create application state with the default wiring: Ollama providers,
    /// the in-process vector index, and the SQLite conversation store.
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let provider = OllamaProvider::new(&config.llm, config.embeddings.dimensions);
        let (embedder, llm) = provider.split();
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
        let llm: Arc<dyn LlmProvider> = Arc::new(llm);
        tracing::info!(
            "Ollama providers initialized (embed: {}, generate: {})",
            config.llm.embed_model,
            config.llm.generate_model
        );

        let index: Arc<dyn VectorIndexProvider> = Arc::new(LocalVectorIndex::new());
        let extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor::new());
        let conversations = Arc::new(ConversationStore::open(&config.conversations.path)?);
        tracing::info!(
            "Conversation store opened at {}",
            config.conversations.path.display()
        );

        Ok(Self::with_providers(
            config,
            extractor,
            embedder,
            llm,
            index,
            conversations,
        ))
    }

    /// Create application state from explicit collaborators.
    pub fn with_providers(
        config: RagConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndexProvider>,
        conversations: Arc<ConversationStore>,
    ) -> Self {
        let pipeline = IngestPipeline::new(
            extractor,
            Arc::clone(&embedder),
            Arc::clone(&index),
            &config.chunking,
            &config.server,
        );

        let engine = RagQueryEngine::new(
            embedder,
            llm,
            index,
            Arc::clone(&conversations),
            Duration::from_secs(config.llm.timeout_secs),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                engine,
                conversations,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the query engine
    pub fn engine(&self) -> &RagQueryEngine {
        &self.inner.engine
    }

    /// Get the conversation store
    pub fn conversations(&self) -> &ConversationStore {
        &self.inner.conversations
    }
}
