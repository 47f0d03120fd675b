//! Capability providers: embeddings, LLM, and the vector index

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use local::LocalVectorIndex;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm, OllamaProvider};
pub use vector_store::{ChunkFilter, ScoredChunk, VectorIndexProvider};
