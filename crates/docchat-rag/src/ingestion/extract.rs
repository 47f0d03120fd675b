//! Document text extraction boundary

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{Error, Result};

/// Page-ordered plain text extracted from an uploaded document
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Full document text in page order
    pub text: String,
    /// Number of pages in the source document
    pub page_count: usize,
}

/// Capability boundary for turning uploaded bytes into plain text.
///
/// Extraction failures surface as `Error::UnsupportedDocument`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract page-ordered text from the raw file bytes
    async fn extract(&self, data: &[u8], filename: &str) -> Result<ExtractedDocument>;

    /// Extractor name for logging
    fn name(&self) -> &str;
}

/// PDF text extractor backed by pdf-extract, with lopdf for page counting.
///
/// Extraction runs on a blocking thread under a timeout so a pathological
/// PDF cannot stall the async runtime.
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl PdfTextExtractor {
    /// Create an extractor with the default 60s extraction timeout
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }

    /// Override the extraction timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, data: &[u8], filename: &str) -> Result<ExtractedDocument> {
        let data = data.to_vec();
        let name = filename.to_string();

        let task = tokio::task::spawn_blocking(move || extract_pdf(&data, &name));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(Error::internal(format!(
                "PDF extraction task failed: {}",
                join_err
            ))),
            Err(_) => {
                tracing::error!(
                    "PDF extraction of '{}' timed out after {:?}",
                    filename,
                    self.timeout
                );
                Err(Error::unsupported_document(
                    filename,
                    format!("text extraction timed out after {:?}", self.timeout),
                ))
            }
        }
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

fn extract_pdf(data: &[u8], filename: &str) -> Result<ExtractedDocument> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::unsupported_document(filename, e.to_string()))?;

    // pdf-extract flattens pages into one string; the page count comes from
    // the document structure itself.
    let page_count = lopdf::Document::load_mem(data)
        .map(|doc| doc.get_pages().len())
        .unwrap_or(0)
        .max(1);

    Ok(ExtractedDocument { text, page_count })
}
