//! Viewer - document viewer state machine
//!
//! This crate provides:
//! - File selection and load completion with last-selection-wins ordering
//! - Page navigation, zoom and rotation with bounds enforcement
//! - Edit mode over the annotation overlay (elements, drags, signatures)
//! - JSON configuration for the tunable parts
//!
//! # Example
//!
//! ```ignore
//! use doc_core::LopdfRenderer;
//! use overlay::ElementKind;
//! use viewer::Viewer;
//!
//! let mut viewer = Viewer::new(LopdfRenderer::new());
//! viewer.open(&pdf_bytes);
//! viewer.change_page(1);
//! viewer.toggle_edit_mode();
//! viewer.add_element(ElementKind::Text)?;
//! let overlay = viewer.overlay();
//! ```

mod config;
mod state;
mod viewer;

pub use config::{ViewerConfig, DEFAULT_LOAD_ERROR};
pub use state::{Phase, ViewerState};
pub use viewer::{LoadOutcome, LoadTicket, Overlay, PlacedElement, Viewer};

use thiserror::Error;

/// Errors returned by viewer commands
///
/// None of these are fatal: the viewer stays usable after any of them.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Edit mode is off")]
    NotEditing,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Document error: {0}")]
    DocError(#[from] doc_core::DocError),

    #[error("Overlay error: {0}")]
    OverlayError(#[from] overlay::OverlayError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
