//! Retrieval-augmented query engine

pub mod engine;

pub use engine::{RagQueryEngine, DEGRADED_SERVICE_ANSWER};
