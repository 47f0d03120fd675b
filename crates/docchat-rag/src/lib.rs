//! docchat-rag: multi-tenant document Q&A backend
//!
//! Users upload PDF documents, the system chunks and indexes their text
//! per tenant, and questions are answered with retrieval-augmented
//! generation over the asking user's own documents, with conversation
//! history persisted per chat session.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    chunk::{Chunk, ChunkMetadata},
    message::{Conversation, ConversationSummary, Message, Role, SessionId},
    query::QueryRequest,
    response::{IngestSummary, QueryResponse},
};
