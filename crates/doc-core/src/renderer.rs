//! Page renderer adapter

use crate::{engine, PageSurface, PdfDocument, Result, Rotation};

/// Adapter over a PDF rendering engine
///
/// Implementations load documents and compute rendered page surfaces. They
/// never clamp page numbers: navigation bounds belong to the viewer.
pub trait PageRenderer {
    /// Loaded document handle
    type Document;

    /// Parse a document from file bytes
    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;

    /// Total number of pages in a loaded document
    fn page_count(&self, document: &Self::Document) -> usize;

    /// Render a page (1-indexed) at `scale` with the viewer `rotation`
    fn render_page(
        &self,
        document: &Self::Document,
        page_number: usize,
        scale: f64,
        rotation: Rotation,
    ) -> Result<PageSurface>;
}

/// Default renderer backed by lopdf
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for LopdfRenderer {
    type Document = PdfDocument;

    fn load(&self, bytes: &[u8]) -> Result<PdfDocument> {
        engine::ensure_initialized();
        PdfDocument::open_from_bytes(bytes)
    }

    fn page_count(&self, document: &PdfDocument) -> usize {
        document.page_count()
    }

    fn render_page(
        &self,
        document: &PdfDocument,
        page_number: usize,
        scale: f64,
        rotation: Rotation,
    ) -> Result<PageSurface> {
        let size = document.page_size(page_number)?;
        let intrinsic = document.page_rotation(page_number)?;

        PageSurface::new(page_number, size, scale, intrinsic.combine(rotation))
    }
}
