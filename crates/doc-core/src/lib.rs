//! Doc Core - PDF loading and page geometry
//!
//! This crate provides:
//! - Opening PDF documents from bytes
//! - Page size and intrinsic rotation lookup (with inherited attributes)
//! - The `PageRenderer` adapter used by the viewer
//! - One-time rendering engine configuration
//!
//! # Example
//!
//! ```ignore
//! use doc_core::{LopdfRenderer, PageRenderer, Rotation};
//!
//! let renderer = LopdfRenderer::new();
//! let doc = renderer.load(&pdf_bytes)?;
//! let surface = renderer.render_page(&doc, 1, 1.5, Rotation::Deg90)?;
//! println!("{} x {}", surface.width, surface.height);
//! ```

mod document;
pub mod engine;
mod renderer;
mod surface;

pub use document::{PageSize, PdfDocument};
pub use engine::EngineConfig;
pub use renderer::{LopdfRenderer, PageRenderer};
pub use surface::{PageSurface, Rotation};

use thiserror::Error;

/// Errors that can occur while loading or rendering a document
#[derive(Debug, Error)]
pub enum DocError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Invalid scale: {0}")]
    InvalidScale(f64),

    #[error("Invalid rotation: {0} (must be a multiple of 90)")]
    InvalidRotation(i64),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DocError::InvalidPage(7, 5).to_string(),
            "Invalid page number: 7 (document has 5 pages)"
        );
        assert_eq!(DocError::EmptyDocument.to_string(), "Document has no pages");
    }
}
