//! Overlay - annotation elements placed over a rendered page
//!
//! This crate provides:
//! - Annotation element types (text, signature image, signature request)
//! - An element store with immutable snapshots
//! - A drag controller that turns pointer gestures into position deltas
//! - Freehand signature capture, serialized as a PNG data URL
//!
//! # Example
//!
//! ```ignore
//! use overlay::{DragController, ElementKind, ElementStore, Point};
//!
//! let mut store = ElementStore::new();
//! let text = store.add(ElementKind::Text, Point::new(50.0, 50.0));
//!
//! let mut drag = DragController::default();
//! drag.begin(text.id.clone())?;
//! drag.end(Point::new(30.0, 12.0), 1.5, &mut store);
//! ```

mod drag;
mod element;
mod signature;
mod store;

pub use drag::{DragController, DragSpace};
pub use element::{Element, ElementId, ElementKind, IdGenerator, Point, Size, DEFAULT_TEXT};
pub use signature::{
    SignatureCapture, SignaturePad, StrokePath, DEFAULT_PAD_HEIGHT, DEFAULT_PAD_WIDTH,
};
pub use store::{ElementStore, Snapshot};

use thiserror::Error;

/// Errors that can occur while editing the overlay
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Element {0} is already being dragged")]
    DragInProgress(String),

    #[error("Signature canvas error: {0}")]
    Canvas(String),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;
