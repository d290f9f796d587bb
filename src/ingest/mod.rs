//! Transcript file ingestion.
//!
//! Accepts plain text and PDF transcripts, enforces the configured size
//! limit before reading content, and produces the raw text handed to
//! the pipeline. Word documents are recognized but rejected; converting
//! them is out of scope for ingestion.

use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type: .{extension} (supported: .txt, .pdf)")]
    UnsupportedType { extension: String },

    #[error("File is {size_mb} MB, over the {limit_mb} MB limit")]
    Oversize { size_mb: u64, limit_mb: u64 },

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a transcript file into raw text.
///
/// The size gate runs on file metadata, before any content is read or
/// parsed.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn read_transcript(path: &Path, max_file_size_mb: u64) -> Result<String, IngestError> {
    let metadata = tokio::fs::metadata(path).await?;
    // Round up so a rejected file never reports a size equal to the limit.
    let size_mb = metadata.len().div_ceil(1024 * 1024);
    if metadata.len() > max_file_size_mb * 1024 * 1024 {
        return Err(IngestError::Oversize {
            size_mb,
            limit_mb: max_file_size_mb,
        });
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt" => tokio::fs::read_to_string(path).await?,
        "pdf" => extract_pdf_text(path)?,
        _ => return Err(IngestError::UnsupportedType { extension }),
    };

    debug!(chars = text.chars().count(), "Read transcript");
    Ok(text)
}

/// Extract text from every page of a PDF, in page order.
fn extract_pdf_text(path: &Path) -> Result<String, IngestError> {
    let document = lopdf::Document::load(path).map_err(|e| IngestError::Pdf(e.to_string()))?;

    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    document
        .extract_text(&pages)
        .map_err(|e| IngestError::Pdf(e.to_string()))
}

/// Short content digest used to detect re-ingestion of the same
/// transcript: first 16 hex characters of the sha256 of the raw text.
pub fn content_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)[..16].to_string()
}
