//! Document ingestion: text extraction, chunking, and indexing

pub mod chunker;
pub mod extract;
pub mod pipeline;

pub use chunker::ChunkSplitter;
pub use extract::{ExtractedDocument, PdfTextExtractor, TextExtractor};
pub use pipeline::IngestPipeline;
