//! PDF text extraction: `pdf-extract` first, whole-document retry with `lopdf`.
//!
//! Both libraries can panic on malformed input, so each attempt runs inside
//! [`std::panic::catch_unwind`] and a panic counts as a failed attempt.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use actscan_core::{CleanMode, ExtractionMethod, ExtractionResult, clean};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("pdf-extract error: {0}")]
    PdfExtract(#[from] pdf_extract::OutputError),

    #[error("lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),

    #[error("lopdf failed on page {page}: {source}")]
    Page { page: u32, source: lopdf::Error },

    #[error("{backend} panicked (malformed document)")]
    Panicked { backend: &'static str },
}

/// A single extraction attempt over a whole document.
type Backend = fn(&Path) -> Result<String, ExtractError>;

/// Extracts and cleans the text of a single PDF.
pub struct DocumentExtractor {
    path: PathBuf,
    mode: CleanMode,
}

impl DocumentExtractor {
    pub fn new(path: impl Into<PathBuf>, mode: CleanMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the document text. Never fails: if both backends fail the
    /// result is empty with [`ExtractionMethod::None`].
    pub fn extract(&self) -> ExtractionResult {
        self.extract_using(extract_with_pdf_extract, extract_with_lopdf)
    }

    /// Raw text and the backend that produced it. Returns the fallback
    /// backend's error when both fail.
    pub fn extract_raw(&self) -> Result<(String, ExtractionMethod), ExtractError> {
        self.extract_raw_using(extract_with_pdf_extract, extract_with_lopdf)
    }

    fn extract_using(&self, primary: Backend, fallback: Backend) -> ExtractionResult {
        match self.extract_raw_using(primary, fallback) {
            Ok((raw, method)) => {
                let cleaned = clean(&raw, self.mode);
                let result = ExtractionResult::new(raw, cleaned, method);
                info!(
                    path = %self.path.display(),
                    method = method.as_str(),
                    chars = result.length,
                    "extracted document text"
                );
                result
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "all extraction backends failed");
                ExtractionResult::empty()
            }
        }
    }

    fn extract_raw_using(
        &self,
        primary: Backend,
        fallback: Backend,
    ) -> Result<(String, ExtractionMethod), ExtractError> {
        match primary(&self.path) {
            Ok(text) => return Ok((text, ExtractionMethod::PdfExtract)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "pdf-extract failed, falling back to lopdf");
            }
        }
        let text = fallback(&self.path)?;
        Ok((text, ExtractionMethod::Lopdf))
    }
}

/// Layout-aware extraction: every page through `pdf-extract`, concatenated
/// with no separator.
pub fn extract_with_pdf_extract(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }))
    .map_err(|_| ExtractError::Panicked {
        backend: "pdf-extract",
    })??;
    Ok(pages.concat())
}

/// Plain page-text extraction with `lopdf`. One failing page aborts the
/// whole attempt.
pub fn extract_with_lopdf(path: &Path) -> Result<String, ExtractError> {
    panic::catch_unwind(AssertUnwindSafe(|| -> Result<String, ExtractError> {
        let doc = lopdf::Document::load(path)?;
        // get_pages is keyed by page number, so iteration is in page order.
        let mut text = String::new();
        for page in doc.get_pages().into_keys() {
            let page_text = doc
                .extract_text(&[page])
                .map_err(|source| ExtractError::Page { page, source })?;
            text.push_str(&page_text);
        }
        Ok(text)
    }))
    .map_err(|_| ExtractError::Panicked { backend: "lopdf" })?
}
