//! Query request types

use serde::{Deserialize, Serialize};

/// Default number of chunks retrieved per question
pub const DEFAULT_TOP_K: usize = 3;
/// Smallest accepted `top_k`
pub const MIN_TOP_K: usize = 1;
/// Largest accepted `top_k`
pub const MAX_TOP_K: usize = 10;

/// Chat query request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Conversation this question belongs to (must be a version-4 UUID)
    pub session_id: String,

    /// Number of chunks to retrieve (default: 3, bounds: [1, 10])
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl QueryRequest {
    /// Create a new query for a session
    pub fn new(question: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: session_id.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of chunks to retrieve
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}
