//! Core data types

pub mod chunk;
pub mod message;
pub mod query;
pub mod response;

pub use chunk::{Chunk, ChunkMetadata};
pub use message::{Conversation, ConversationSummary, Message, Role, SessionId};
pub use query::QueryRequest;
pub use response::{IngestSummary, QueryResponse, SummaryListResponse, UploadResponse};
