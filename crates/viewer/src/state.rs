//! Viewer state snapshot

use doc_core::Rotation;
use serde::{Deserialize, Serialize};

/// Document lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// No file selected yet
    NoDocument,
    /// A file was selected and its load has not completed
    Loading,
    /// The latest load completed, successfully or with `error` set
    Ready,
}

/// Everything the page chrome needs to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    pub phase: Phase,
    /// Current page (1-indexed)
    pub page_number: usize,
    /// Total pages; `None` until a load succeeds
    pub page_count: Option<usize>,
    pub scale: f64,
    pub rotation: Rotation,
    pub edit_mode: bool,
    /// User-facing load error
    pub error: Option<String>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            phase: Phase::NoDocument,
            page_number: 1,
            page_count: None,
            scale: 1.0,
            rotation: Rotation::Deg0,
            edit_mode: false,
            error: None,
        }
    }
}

impl ViewerState {
    /// A loaded document with no error: editor controls are shown
    pub fn has_document(&self) -> bool {
        self.phase == Phase::Ready && self.error.is_none() && self.page_count.is_some()
    }
}
