//! PDF Document wrapper

use crate::{DocError, Result, Rotation};
use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

/// Maximum depth followed along the `Parent` chain for inherited attributes
const MAX_INHERITANCE_DEPTH: usize = 10;

/// Page dimensions in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// A4 portrait, used when a page carries no usable MediaBox
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

/// Read-only PDF document
///
/// Wraps a parsed `lopdf::Document`. The wrapper is never mutated after
/// loading; selecting a new file produces a new `PdfDocument`.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Page object IDs in page order (index 0 is page 1)
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.page_ids.len())
            .finish()
    }
}

impl PdfDocument {
    /// Open a PDF document from bytes
    ///
    /// # Arguments
    /// * `data` - PDF file bytes
    ///
    /// Fails with `DocError::OpenError` for corrupt or unsupported input and
    /// with `DocError::EmptyDocument` when the page tree is empty.
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| DocError::OpenError(e.to_string()))?;
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();

        if page_ids.is_empty() {
            return Err(DocError::EmptyDocument);
        }

        log::debug!("Opened PDF with {} pages ({} bytes)", page_ids.len(), data.len());

        Ok(Self { inner, page_ids })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Get the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Get page size in points
    ///
    /// Reads the MediaBox (or CropBox), following the `Parent` chain when the
    /// attribute is inherited. Pages without a usable box default to A4.
    pub fn page_size(&self, page: usize) -> Result<PageSize> {
        let page_id = self.page_id(page)?;

        let Some(media_box) = self.inherited_attribute(page_id, &[&b"MediaBox"[..], &b"CropBox"[..]])?
        else {
            return Ok(PageSize::A4);
        };

        let media_box_array = media_box
            .as_array()
            .map_err(|_| DocError::ParseError("MediaBox is not an array".to_string()))?;

        size_from_media_box(media_box_array)
    }

    /// Get the intrinsic page rotation (`/Rotate`, inherited)
    ///
    /// Invalid values (not a multiple of 90) are ignored and treated as 0,
    /// the same way PDF viewers tolerate them.
    pub fn page_rotation(&self, page: usize) -> Result<Rotation> {
        let page_id = self.page_id(page)?;

        let degrees = match self.inherited_attribute(page_id, &[&b"Rotate"[..]])? {
            Some(value) => number(&value).map(|v| v as i64).unwrap_or(0),
            None => 0,
        };

        Ok(Rotation::from_degrees(degrees).unwrap_or_else(|_| {
            log::warn!("Ignoring invalid /Rotate {} on page {}", degrees, page);
            Rotation::Deg0
        }))
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        if page == 0 || page > self.page_ids.len() {
            return Err(DocError::InvalidPage(page, self.page_ids.len()));
        }
        Ok(self.page_ids[page - 1])
    }

    /// Look up the first of `keys` on the page or its ancestors
    ///
    /// References are resolved, so the returned object is always direct.
    fn inherited_attribute(&self, page_id: ObjectId, keys: &[&[u8]]) -> Result<Option<Object>> {
        let mut current_id = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| DocError::ParseError("Object is not a dictionary".to_string()))?;

            for key in keys {
                if let Ok(value) = dict.get(key) {
                    let resolved = match value {
                        Object::Reference(ref_id) => self.inner.get_object(*ref_id)?.clone(),
                        other => other.clone(),
                    };
                    return Ok(Some(resolved));
                }
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(None)
    }
}

/// Extract width and height from a MediaBox array
fn size_from_media_box(media_box: &[Object]) -> Result<PageSize> {
    if media_box.len() < 4 {
        return Err(DocError::ParseError("Invalid MediaBox format".to_string()));
    }

    let mut coords = [0.0; 4];
    for (slot, value) in coords.iter_mut().zip(media_box) {
        *slot = number(value)
            .ok_or_else(|| DocError::ParseError("Invalid MediaBox coordinate".to_string()))?;
    }

    Ok(PageSize {
        width: (coords[2] - coords[0]).abs(),
        height: (coords[3] - coords[1]).abs(),
    })
}

fn number(value: &Object) -> Option<f64> {
    value
        .as_f32()
        .map(|v| v as f64)
        .ok()
        .or_else(|| value.as_i64().ok().map(|v| v as f64))
}
