//! Retrieval-augmented answer generation with degraded fallback

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{ChunkFilter, EmbeddingProvider, LlmProvider, VectorIndexProvider};
use crate::storage::ConversationStore;
use crate::types::message::{Role, SessionId};
use crate::types::query::{MAX_TOP_K, MIN_TOP_K};

/// Fixed answer returned when any part of the retrieval/generation pipeline
/// fails. The user-facing contract is "always get a response".
pub const DEGRADED_SERVICE_ANSWER: &str =
    "An error occurred while processing your request. Please try again later.";

/// Retrieval-augmented query engine.
///
/// All collaborators are injected at construction; the engine owns no
/// global state.
pub struct RagQueryEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index: Arc<dyn VectorIndexProvider>,
    conversations: Arc<ConversationStore>,
    /// Upper bound on one generative call
    generate_timeout: Duration,
}

impl RagQueryEngine {
    /// Create a new query engine
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndexProvider>,
        conversations: Arc<ConversationStore>,
        generate_timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            llm,
            index,
            conversations,
            generate_timeout,
        }
    }

    /// Answer a question for one owner within one conversation, persisting
    /// the user/assistant turn.
    ///
    /// Downstream failures (embedding, search, generation) never surface to
    /// the caller; they degrade into a fixed fallback answer. Only request
    /// validation can return an error here.
    pub async fn answer(
        &self,
        question: &str,
        owner_id: &str,
        session_id: &SessionId,
        top_k: usize,
    ) -> Result<String> {
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
            return Err(Error::invalid_request(format!(
                "top_k must be between {} and {}, got {}",
                MIN_TOP_K, MAX_TOP_K, top_k
            )));
        }

        let asked_at = Utc::now();
        let answer = self
            .generate(question, owner_id, Some(session_id), top_k)
            .await;
        let answered_at = Utc::now();

        // The answer is already computed; losing history is acceptable,
        // losing the answer is not.
        if let Err(e) =
            self.conversations
                .append(owner_id, session_id, Role::User, question, asked_at)
        {
            tracing::error!("Failed to persist user message: {}", e);
        }
        if let Err(e) = self.conversations.append(
            owner_id,
            session_id,
            Role::Assistant,
            &answer,
            answered_at,
        ) {
            tracing::error!("Failed to persist assistant message: {}", e);
        }

        Ok(answer)
    }

    /// Retrieve context and generate an answer without touching the
    /// conversation store. Scoped to `owner_id`, and to one session when
    /// given. Infallible by contract: failures degrade into the fixed
    /// fallback answer.
    pub async fn generate(
        &self,
        question: &str,
        owner_id: &str,
        session_id: Option<&SessionId>,
        top_k: usize,
    ) -> String {
        match self.try_generate(question, owner_id, session_id, top_k).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Query pipeline failed, returning degraded answer: {}", e);
                DEGRADED_SERVICE_ANSWER.to_string()
            }
        }
    }

    async fn try_generate(
        &self,
        question: &str,
        owner_id: &str,
        session_id: Option<&SessionId>,
        top_k: usize,
    ) -> Result<String> {
        // The filter is what keeps one tenant's documents out of another
        // tenant's answers; it is never optional.
        let mut filter = ChunkFilter::for_owner(owner_id);
        if let Some(session) = session_id {
            filter = filter.with_session(session.as_uuid());
        }

        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, top_k, &filter).await?;

        tracing::debug!(
            "Retrieved {} chunks for owner '{}' (top_k={})",
            results.len(),
            owner_id,
            top_k
        );

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);

        match timeout(self.generate_timeout, self.llm.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(Error::llm(format!(
                "generation timed out after {:?}",
                self.generate_timeout
            ))),
        }
    }
}
