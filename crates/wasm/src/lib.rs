//! WASM bindings for docsign
//!
//! This crate exposes the document viewer and annotation editor to the
//! browser page. The page draws the PDF itself (with the engine worker
//! named by `PdfViewer.workerSrc()`) and drives this state machine.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { PdfViewer } from 'docsign-wasm';
//!
//! await init();
//!
//! const viewer = new PdfViewer();
//! viewer.selectFile(new Uint8Array(await file.arrayBuffer()));
//!
//! // Or let the browser engine parse the file
//! const generation = viewer.beginLoad();
//! pdfjs.getDocument(data).promise
//!   .then((doc) => viewer.loadSucceeded(generation, doc.numPages))
//!   .catch((err) => viewer.loadFailed(generation, String(err)));
//!
//! viewer.toggleEditMode();
//! const id = viewer.addText();
//! viewer.dragStart(id);
//! viewer.dragEnd(30, 12);
//! render(viewer.overlay());
//! ```

use doc_core::LopdfRenderer;
use overlay::{Element, ElementId, ElementKind, Point};
use viewer::{LoadOutcome, LoadTicket, Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;

mod logging;

// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Debug);
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// PDF viewer with annotation overlay
#[wasm_bindgen]
pub struct PdfViewer {
    inner: Viewer<LopdfRenderer>,
}

#[wasm_bindgen]
impl PdfViewer {
    /// Create a viewer
    ///
    /// @param configJson - Optional viewer configuration (JSON string)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PdfViewer, JsValue> {
        let config = match config_json {
            Some(json) => ViewerConfig::from_json(&json).map_err(to_js_error)?,
            None => ViewerConfig::default(),
        };
        let inner = Viewer::with_config(LopdfRenderer::new(), config).map_err(to_js_error)?;
        Ok(PdfViewer { inner })
    }

    /// URL of the engine worker script the page must register
    #[wasm_bindgen(js_name = workerSrc)]
    pub fn worker_src() -> String {
        doc_core::engine::ensure_initialized().worker_src.clone()
    }

    // === Loading ===

    /// Select and parse a file in one step
    ///
    /// @param data - PDF file bytes (Uint8Array)
    /// @returns true when the document loaded, false when the error message is shown
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&mut self, data: &[u8]) -> bool {
        self.inner.open(data);
        self.inner.has_document()
    }

    /// Start a load that the browser engine will complete
    ///
    /// @returns Load generation to pass to loadSucceeded/loadFailed
    #[wasm_bindgen(js_name = beginLoad)]
    pub fn begin_load(&mut self) -> f64 {
        self.inner.select_file().generation() as f64
    }

    /// @returns false if a newer file was selected in the meantime
    #[wasm_bindgen(js_name = loadSucceeded)]
    pub fn load_succeeded(&mut self, generation: f64, page_count: u32) -> bool {
        let ticket = LoadTicket::new(generation as u64);
        self.inner
            .complete_external_load(ticket, Ok(page_count as usize))
            == LoadOutcome::Applied
    }

    /// @returns false if a newer file was selected in the meantime
    #[wasm_bindgen(js_name = loadFailed)]
    pub fn load_failed(&mut self, generation: f64, message: String) -> bool {
        let ticket = LoadTicket::new(generation as u64);
        self.inner.complete_external_load(ticket, Err(message)) == LoadOutcome::Applied
    }

    // === View ===

    #[wasm_bindgen(js_name = changePage)]
    pub fn change_page(&mut self, delta: i32) {
        self.inner.change_page(delta as i64);
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    pub fn rotate(&mut self) {
        self.inner.rotate();
    }

    #[wasm_bindgen(js_name = toggleEditMode)]
    pub fn toggle_edit_mode(&mut self) {
        self.inner.toggle_edit_mode();
    }

    #[wasm_bindgen(js_name = pageNumber)]
    pub fn page_number(&self) -> u32 {
        self.inner.state().page_number as u32
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> Option<u32> {
        self.inner.state().page_count.map(|count| count as u32)
    }

    pub fn scale(&self) -> f64 {
        self.inner.state().scale
    }

    /// Viewer rotation in degrees
    pub fn rotation(&self) -> i32 {
        self.inner.state().rotation.degrees() as i32
    }

    #[wasm_bindgen(js_name = editMode)]
    pub fn edit_mode(&self) -> bool {
        self.inner.state().edit_mode
    }

    #[wasm_bindgen(js_name = hasDocument)]
    pub fn has_document(&self) -> bool {
        self.inner.has_document()
    }

    /// Load error message, if the last load failed
    pub fn error(&self) -> Option<String> {
        self.inner.state().error.clone()
    }

    /// Full viewer state (phase, page, scale, rotation, edit mode, error)
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.state())?)
    }

    /// Footprint of the current page, or null without a parsed document
    pub fn surface(&self) -> Result<JsValue, JsValue> {
        let surface = self
            .inner
            .render_current_page()
            .transpose()
            .map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&surface)?)
    }

    // === Elements ===

    /// Add a text box at the default position (edit mode only)
    ///
    /// @returns Element id
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self) -> Result<String, JsValue> {
        self.add(ElementKind::Text)
    }

    /// Add a signature request placeholder at the default position (edit mode only)
    ///
    /// @returns Element id
    #[wasm_bindgen(js_name = requestSignature)]
    pub fn request_signature(&mut self) -> Result<String, JsValue> {
        self.add(ElementKind::SignatureRequest)
    }

    /// @returns false for an unknown id
    #[wasm_bindgen(js_name = updateContent)]
    pub fn update_content(&mut self, id: &str, content: String) -> bool {
        self.inner
            .update_element_content(&ElementId::from(id), content)
    }

    /// All elements as an array of plain objects
    pub fn elements(&self) -> Result<js_sys::Array, JsValue> {
        let snapshot = self.inner.elements();
        snapshot
            .iter()
            .map(|element: &Element| serde_wasm_bindgen::to_value(element).map_err(JsValue::from))
            .collect()
    }

    /// Placed elements, or null when edit mode is off
    pub fn overlay(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.overlay())?)
    }

    // === Dragging ===

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner
            .begin_drag(ElementId::from(id))
            .map_err(to_js_error)
    }

    /// @param dx - Cumulative horizontal offset since dragStart
    /// @param dy - Cumulative vertical offset since dragStart
    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, dx: f64, dy: f64) {
        self.inner.drag_to(Point::new(dx, dy));
    }

    /// @returns Id of the moved element, if any
    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self, dx: f64, dy: f64) -> Option<String> {
        self.inner
            .end_drag(Point::new(dx, dy))
            .map(|id| id.to_string())
    }

    #[wasm_bindgen(js_name = dragCancel)]
    pub fn drag_cancel(&mut self) {
        self.inner.cancel_drag();
    }

    // === Signature ===

    #[wasm_bindgen(js_name = openSignaturePad)]
    pub fn open_signature_pad(&mut self) -> Result<(), JsValue> {
        self.inner.open_signature_pad().map_err(to_js_error)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = penDown)]
    pub fn pen_down(&mut self, x: f64, y: f64) {
        if let Some(pad) = self.inner.signature_pad_mut() {
            pad.begin_stroke(Point::new(x, y));
        }
    }

    #[wasm_bindgen(js_name = penMove)]
    pub fn pen_move(&mut self, x: f64, y: f64) {
        if let Some(pad) = self.inner.signature_pad_mut() {
            pad.extend_stroke(Point::new(x, y));
        }
    }

    #[wasm_bindgen(js_name = penUp)]
    pub fn pen_up(&mut self) {
        if let Some(pad) = self.inner.signature_pad_mut() {
            pad.end_stroke();
        }
    }

    #[wasm_bindgen(js_name = clearSignature)]
    pub fn clear_signature(&mut self) {
        self.inner.clear_signature();
    }

    /// Save the drawing as a signature element and close the pad
    ///
    /// @returns Id of the new element, or undefined if the pad was not open
    #[wasm_bindgen(js_name = saveSignature)]
    pub fn save_signature(&mut self) -> Result<Option<String>, JsValue> {
        let element = self.inner.save_signature().map_err(to_js_error)?;
        Ok(element.map(|element| element.id.to_string()))
    }

    #[wasm_bindgen(js_name = cancelSignature)]
    pub fn cancel_signature(&mut self) {
        self.inner.cancel_signature();
    }

    #[wasm_bindgen(js_name = isSignaturePadOpen)]
    pub fn is_signature_pad_open(&self) -> bool {
        self.inner.is_signature_pad_open()
    }
}

impl PdfViewer {
    fn add(&mut self, kind: ElementKind) -> Result<String, JsValue> {
        let element = self.inner.add_element(kind).map_err(to_js_error)?;
        Ok(element.id.to_string())
    }
}
