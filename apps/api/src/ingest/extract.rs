//! Document text extraction.
//!
//! `TextExtract` is the boundary to the document parsing backend. The
//! default implementation runs `pdf-extract` on a blocking thread; swap the
//! trait object in `AppState` for an OCR-capable backend without touching
//! the pipeline.

use async_trait::async_trait;

use crate::errors::AppError;

#[async_trait]
pub trait TextExtract: Send + Sync {
    /// Extracts plain text from a document. An empty string is a valid
    /// return (image-only documents); backend failures are
    /// `ExtractionBackend`.
    async fn extract(&self, bytes: &[u8]) -> Result<String, AppError>;
}

pub struct PdfTextExtractor;

#[async_trait]
impl TextExtract for PdfTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
        let bytes = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::ExtractionBackend(format!("extraction task failed: {e}")))?
            .map_err(|e| AppError::ExtractionBackend(e.to_string()))?;
        Ok(text)
    }
}
