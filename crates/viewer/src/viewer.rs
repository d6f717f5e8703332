//! Viewer state machine

use crate::{Phase, Result, ViewerConfig, ViewerError, ViewerState};
use doc_core::{PageRenderer, PageSurface};
use overlay::{
    DragController, DragSpace, Element, ElementId, ElementKind, ElementStore, Point,
    SignatureCapture, SignaturePad, Snapshot,
};
use serde::Serialize;

/// Handle for one file selection
///
/// Only the ticket from the most recent [`Viewer::select_file`] can complete
/// a load; results carrying an older ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whether a completed load changed the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Superseded by a later selection (or already completed)
    Stale,
}

/// An element positioned on the rendered page, in screen pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedElement {
    pub element: Element,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub dragging: bool,
}

/// Interactive overlay drawn on top of the current page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub scale: f64,
    pub elements: Vec<PlacedElement>,
}

/// Document viewer and annotation editor
///
/// Owns the loaded document, the view parameters (page, zoom, rotation,
/// edit mode, error) and the overlay elements. Every command is
/// synchronous; only document loading may be split across calls through
/// [`select_file`](Self::select_file) and [`complete_load`](Self::complete_load).
pub struct Viewer<R: PageRenderer> {
    renderer: R,
    config: ViewerConfig,
    state: ViewerState,
    document: Option<R::Document>,
    generation: u64,
    elements: ElementStore,
    drag: DragController,
    signature: SignatureCapture,
}

impl<R: PageRenderer> Viewer<R> {
    /// Create a viewer with the default configuration
    pub fn new(renderer: R) -> Self {
        Self::build(renderer, ViewerConfig::default())
    }

    /// Create a viewer with `config`, rejecting unusable bounds
    pub fn with_config(renderer: R, config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(renderer, config))
    }

    fn build(renderer: R, config: ViewerConfig) -> Self {
        let drag = DragController::new(config.drag_space);
        let mut viewer = Self {
            renderer,
            config,
            state: ViewerState::default(),
            document: None,
            generation: 0,
            elements: ElementStore::new(),
            drag,
            signature: SignatureCapture::new(),
        };
        viewer.state.scale = viewer.config.clamp_scale(1.0);
        viewer
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The loaded document, if the last load went through the renderer
    pub fn document(&self) -> Option<&R::Document> {
        self.document.as_ref()
    }

    // === Loading ===

    /// Start a new file selection
    ///
    /// Drops the current document and resets page, zoom, rotation, edit
    /// mode, error and elements. Returns the ticket that must accompany the
    /// load result.
    pub fn select_file(&mut self) -> LoadTicket {
        self.generation += 1;
        self.document = None;
        self.reset_view();
        self.state.phase = Phase::Loading;
        self.state.page_count = None;
        self.state.error = None;

        log::debug!("Selected file (load generation {})", self.generation);
        LoadTicket::new(self.generation)
    }

    /// Parse `bytes` with the renderer without touching viewer state
    pub fn load_document(&self, bytes: &[u8]) -> doc_core::Result<R::Document> {
        self.renderer.load(bytes)
    }

    /// Apply a load result if `ticket` is still current
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: doc_core::Result<R::Document>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }

        match result {
            Ok(document) => {
                let page_count = self.renderer.page_count(&document);
                self.document = Some(document);
                self.finish_load(Ok(page_count));
            }
            Err(e) => self.finish_load(Err(e.to_string())),
        }
        LoadOutcome::Applied
    }

    /// Apply a load completed by a renderer outside this process
    ///
    /// Used when the page is drawn by the browser-side engine: only the page
    /// count (or an error message) comes back, no document handle.
    pub fn complete_external_load(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<usize, String>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }

        self.finish_load(result);
        LoadOutcome::Applied
    }

    /// Select, load and complete in one step
    pub fn open(&mut self, bytes: &[u8]) -> LoadOutcome {
        let ticket = self.select_file();
        let result = self.load_document(bytes);
        self.complete_load(ticket, result)
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation || self.state.phase != Phase::Loading {
            log::debug!(
                "Discarding stale load (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        true
    }

    fn finish_load(&mut self, result: std::result::Result<usize, String>) {
        self.reset_view();
        self.state.phase = Phase::Ready;

        match result {
            Ok(page_count) if page_count > 0 => {
                log::info!("Document loaded: {} pages", page_count);
                self.state.page_count = Some(page_count);
                self.state.error = None;
            }
            Ok(_) => self.fail_load("document has no pages"),
            Err(reason) => self.fail_load(&reason),
        }
    }

    fn fail_load(&mut self, reason: &str) {
        log::warn!("PDF load error: {}", reason);
        self.document = None;
        self.state.page_count = None;
        self.state.error = Some(self.config.load_error_message.clone());
    }

    fn reset_view(&mut self) {
        self.state.page_number = 1;
        self.state.scale = self.config.clamp_scale(1.0);
        self.state.rotation = Default::default();
        self.state.edit_mode = false;
        self.elements.clear();
        self.drag.cancel();
        self.signature.cancel();
    }

    // === View commands ===

    /// Move by `delta` pages, clamped to the document
    ///
    /// Ignored unless a document is loaded.
    pub fn change_page(&mut self, delta: i64) {
        let Some(page_count) = self.loaded_page_count() else {
            return;
        };

        let target = (self.state.page_number as i64).saturating_add(delta);
        self.state.page_number = target.clamp(1, page_count as i64) as usize;
    }

    pub fn can_go_previous(&self) -> bool {
        self.loaded_page_count().is_some() && self.state.page_number > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.loaded_page_count()
            .is_some_and(|count| self.state.page_number < count)
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.state.scale + self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.state.scale - self.config.zoom_step);
    }

    /// Set the zoom, rounded to hundredths and clamped to the bounds
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        let rounded = (scale * 100.0).round() / 100.0;
        self.state.scale = self.config.clamp_scale(rounded);
    }

    /// Rotate the page a quarter turn clockwise
    pub fn rotate(&mut self) {
        self.state.rotation = self.state.rotation.rotated_cw();
    }

    /// Flip edit mode
    ///
    /// Ignored unless a document is loaded. Elements survive edit mode being
    /// turned off; only their interactivity is hidden. A drag in progress is
    /// abandoned and the signature modal closes.
    pub fn toggle_edit_mode(&mut self) {
        if !self.has_document() {
            return;
        }
        self.state.edit_mode = !self.state.edit_mode;
        if !self.state.edit_mode {
            self.drag.cancel();
            self.signature.cancel();
        }
    }

    /// Editor controls are shown (document loaded, no error)
    pub fn has_document(&self) -> bool {
        self.state.has_document()
    }

    /// Render the current page with the active scale and rotation
    ///
    /// `None` when no document handle is held.
    pub fn render_current_page(&self) -> Option<doc_core::Result<PageSurface>> {
        let document = self.document.as_ref()?;
        Some(self.renderer.render_page(
            document,
            self.state.page_number,
            self.state.scale,
            self.state.rotation,
        ))
    }

    fn loaded_page_count(&self) -> Option<usize> {
        match self.state.phase {
            Phase::Ready => self.state.page_count,
            Phase::NoDocument | Phase::Loading => None,
        }
    }

    // === Elements ===

    /// Add an element of `kind` at the configured default position
    /// (edit mode only)
    pub fn add_element(&mut self, kind: ElementKind) -> Result<Element> {
        self.ensure_editing()?;
        Ok(self.elements.add(kind, self.config.default_position))
    }

    pub fn update_element_content(&mut self, id: &ElementId, content: impl Into<String>) -> bool {
        self.elements.update_content(id, content)
    }

    pub fn elements(&self) -> Snapshot {
        self.elements.list()
    }

    /// Elements placed in screen pixels over the current page
    ///
    /// `None` unless edit mode is on. Elements are not tied to a page: the
    /// same overlay is drawn on every page.
    pub fn overlay(&self) -> Option<Overlay> {
        if !self.state.edit_mode {
            return None;
        }

        let scale = self.state.scale;
        let elements = self
            .elements
            .list()
            .iter()
            .map(|element| {
                let preview = self.drag.preview_offset(&element.id);
                let offset = match (preview, self.drag.space()) {
                    (Some(offset), DragSpace::Screen) => offset,
                    (Some(offset), DragSpace::Page) => offset.scale(scale),
                    (None, _) => Point::default(),
                };

                PlacedElement {
                    left: element.position.x * scale + offset.x,
                    top: element.position.y * scale + offset.y,
                    width: element.size.width * scale,
                    height: element.size.height * scale,
                    dragging: preview.is_some(),
                    element: element.clone(),
                }
            })
            .collect();

        Some(Overlay { scale, elements })
    }

    // === Dragging ===

    /// Start dragging an element (edit mode only)
    pub fn begin_drag(&mut self, id: ElementId) -> Result<()> {
        self.ensure_editing()?;
        self.drag.begin(id)?;
        Ok(())
    }

    /// Report the cumulative gesture offset
    pub fn drag_to(&mut self, total_delta: Point) {
        self.drag.update(total_delta);
    }

    /// Finish the gesture and move the element
    pub fn end_drag(&mut self, total_delta: Point) -> Option<ElementId> {
        self.drag
            .end(total_delta, self.state.scale, &mut self.elements)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn active_drag(&self) -> Option<&ElementId> {
        self.drag.active()
    }

    // === Signature capture ===

    /// Show the signature modal (edit mode only)
    pub fn open_signature_pad(&mut self) -> Result<&mut SignaturePad> {
        self.ensure_editing()?;
        Ok(self
            .signature
            .open(self.config.signature_width, self.config.signature_height))
    }

    pub fn is_signature_pad_open(&self) -> bool {
        self.signature.is_open()
    }

    pub fn signature_pad_mut(&mut self) -> Option<&mut SignaturePad> {
        self.signature.pad_mut()
    }

    pub fn clear_signature(&mut self) {
        self.signature.clear();
    }

    /// Turn the drawing into a signature element and close the modal
    pub fn save_signature(&mut self) -> Result<Option<Element>> {
        Ok(self
            .signature
            .save(&mut self.elements, self.config.default_position)?)
    }

    pub fn cancel_signature(&mut self) {
        self.signature.cancel();
    }

    fn ensure_editing(&self) -> Result<()> {
        if self.state.edit_mode {
            Ok(())
        } else {
            Err(ViewerError::NotEditing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_core::{DocError, PageSize, Rotation};
    use pretty_assertions::assert_eq;

    /// Renderer whose "documents" are page counts encoded in the first byte
    struct FakeRenderer;

    impl PageRenderer for FakeRenderer {
        type Document = usize;

        fn load(&self, bytes: &[u8]) -> doc_core::Result<usize> {
            match bytes.first() {
                Some(&count) if count > 0 => Ok(count as usize),
                Some(_) => Err(DocError::EmptyDocument),
                None => Err(DocError::OpenError("empty file".to_string())),
            }
        }

        fn page_count(&self, document: &usize) -> usize {
            *document
        }

        fn render_page(
            &self,
            document: &usize,
            page_number: usize,
            scale: f64,
            rotation: Rotation,
        ) -> doc_core::Result<PageSurface> {
            if page_number == 0 || page_number > *document {
                return Err(DocError::InvalidPage(page_number, *document));
            }
            PageSurface::new(
                page_number,
                PageSize {
                    width: 100.0,
                    height: 200.0,
                },
                scale,
                rotation,
            )
        }
    }

    fn loaded(pages: u8) -> Viewer<FakeRenderer> {
        let mut viewer = Viewer::new(FakeRenderer);
        assert_eq!(viewer.open(&[pages]), LoadOutcome::Applied);
        viewer
    }

    #[test]
    fn test_successful_load_enters_ready() {
        let viewer = loaded(5);
        let state = viewer.state();

        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.page_count, Some(5));
        assert_eq!(state.page_number, 1);
        assert!(viewer.has_document());
    }

    #[test]
    fn test_failed_load_sets_error() {
        let mut viewer = Viewer::new(FakeRenderer);
        viewer.open(&[]);

        let state = viewer.state();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.page_count, None);
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to load PDF. Please try again.")
        );
        assert!(!viewer.has_document());
        assert!(viewer.render_current_page().is_none());
    }

    #[test]
    fn test_change_page_clamps() {
        let mut viewer = loaded(5);

        viewer.change_page(-1);
        assert_eq!(viewer.state().page_number, 1);

        viewer.change_page(3);
        assert_eq!(viewer.state().page_number, 4);

        viewer.change_page(10);
        assert_eq!(viewer.state().page_number, 5);
        assert!(!viewer.can_go_next());
        assert!(viewer.can_go_previous());
    }

    #[test]
    fn test_change_page_ignored_without_document() {
        let mut viewer = Viewer::new(FakeRenderer);
        viewer.change_page(2);
        assert_eq!(viewer.state().page_number, 1);

        viewer.select_file();
        viewer.change_page(2);
        assert_eq!(viewer.state().page_number, 1);
    }

    #[test]
    fn test_change_page_saturates_on_huge_deltas() {
        let mut viewer = loaded(5);
        viewer.change_page(2);

        viewer.change_page(i64::MAX);
        assert_eq!(viewer.state().page_number, 5);

        viewer.change_page(i64::MIN);
        assert_eq!(viewer.state().page_number, 1);
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut viewer = loaded(1);
        for _ in 0..20 {
            viewer.zoom_in();
        }
        assert_eq!(viewer.state().scale, 2.0);

        for _ in 0..30 {
            viewer.zoom_out();
        }
        assert_eq!(viewer.state().scale, 0.5);

        viewer.zoom_in();
        assert_eq!(viewer.state().scale, 0.6);
    }

    #[test]
    fn test_rotate_cycles() {
        let mut viewer = loaded(1);
        viewer.rotate();
        viewer.rotate();
        viewer.rotate();
        assert_eq!(viewer.state().rotation, Rotation::Deg270);
        viewer.rotate();
        assert_eq!(viewer.state().rotation, Rotation::Deg0);
    }

    #[test]
    fn test_new_file_resets_everything() {
        let mut viewer = loaded(5);
        viewer.change_page(2);
        viewer.zoom_in();
        viewer.rotate();
        viewer.toggle_edit_mode();
        viewer.add_element(ElementKind::Text).unwrap();

        viewer.open(&[3]);

        let state = viewer.state();
        assert_eq!(state.page_number, 1);
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.rotation, Rotation::Deg0);
        assert!(!state.edit_mode);
        assert!(viewer.elements().is_empty());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut viewer = Viewer::new(FakeRenderer);

        let first = viewer.select_file();
        let second = viewer.select_file();

        let late_second = viewer.load_document(&[7]);
        assert_eq!(viewer.complete_load(second, late_second), LoadOutcome::Applied);

        let late_first = viewer.load_document(&[2]);
        assert_eq!(viewer.complete_load(first, late_first), LoadOutcome::Stale);

        assert_eq!(viewer.state().page_count, Some(7));
    }

    #[test]
    fn test_ticket_completes_only_once() {
        let mut viewer = Viewer::new(FakeRenderer);
        let ticket = viewer.select_file();

        assert_eq!(
            viewer.complete_external_load(ticket, Ok(4)),
            LoadOutcome::Applied
        );
        viewer.toggle_edit_mode();
        viewer.add_element(ElementKind::Text).unwrap();

        assert_eq!(
            viewer.complete_external_load(ticket, Ok(9)),
            LoadOutcome::Stale
        );
        assert_eq!(viewer.state().page_count, Some(4));
        assert_eq!(viewer.elements().len(), 1);
    }

    #[test]
    fn test_external_load_failure_and_zero_pages() {
        let mut viewer = Viewer::new(FakeRenderer);

        let ticket = viewer.select_file();
        viewer.complete_external_load(ticket, Err("InvalidPDFException".to_string()));
        assert!(viewer.state().error.is_some());

        let ticket = viewer.select_file();
        assert_eq!(viewer.state().error, None);
        viewer.complete_external_load(ticket, Ok(0));
        assert!(viewer.state().error.is_some());
        assert_eq!(viewer.state().page_count, None);
    }

    #[test]
    fn test_edit_mode_toggle_preserves_elements() {
        let mut viewer = loaded(2);
        viewer.toggle_edit_mode();
        let element = viewer.add_element(ElementKind::SignatureRequest).unwrap();
        let before = viewer.elements();

        viewer.toggle_edit_mode();
        assert!(viewer.overlay().is_none());
        viewer.toggle_edit_mode();

        assert_eq!(viewer.elements(), before);
        assert_eq!(viewer.elements()[0].id, element.id);
    }

    #[test]
    fn test_edit_mode_requires_document() {
        let mut viewer = Viewer::new(FakeRenderer);
        viewer.toggle_edit_mode();
        assert!(!viewer.state().edit_mode);

        let ticket = viewer.select_file();
        viewer.toggle_edit_mode();
        assert!(!viewer.state().edit_mode);
        assert!(matches!(
            viewer.add_element(ElementKind::Text),
            Err(ViewerError::NotEditing)
        ));

        viewer.complete_external_load(ticket, Err("broken".to_string()));
        viewer.toggle_edit_mode();
        assert!(!viewer.state().edit_mode);

        viewer.open(&[3]);
        viewer.toggle_edit_mode();
        assert!(viewer.state().edit_mode);
    }

    #[test]
    fn test_editor_commands_require_edit_mode() {
        let mut viewer = loaded(2);

        assert!(matches!(
            viewer.add_element(ElementKind::SignatureRequest),
            Err(ViewerError::NotEditing)
        ));
        assert!(matches!(
            viewer.open_signature_pad(),
            Err(ViewerError::NotEditing)
        ));
        assert!(viewer.elements().is_empty());
        assert!(!viewer.is_signature_pad_open());
    }

    #[test]
    fn test_leaving_edit_mode_closes_signature_pad() {
        let mut viewer = loaded(1);
        viewer.toggle_edit_mode();
        viewer.open_signature_pad().unwrap();

        viewer.toggle_edit_mode();
        assert!(!viewer.is_signature_pad_open());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ViewerConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..ViewerConfig::default()
        };
        assert!(matches!(
            Viewer::with_config(FakeRenderer, config),
            Err(ViewerError::InvalidConfig(_))
        ));

        let config = ViewerConfig {
            max_scale: f64::NAN,
            ..ViewerConfig::default()
        };
        assert!(Viewer::with_config(FakeRenderer, config).is_err());
    }

    #[test]
    fn test_drag_requires_edit_mode() {
        let mut viewer = loaded(1);
        viewer.toggle_edit_mode();
        let element = viewer.add_element(ElementKind::Text).unwrap();
        viewer.toggle_edit_mode();

        assert!(matches!(
            viewer.begin_drag(element.id.clone()),
            Err(ViewerError::NotEditing)
        ));
    }

    #[test]
    fn test_drag_commits_in_page_units() {
        let mut viewer = loaded(1);
        viewer.toggle_edit_mode();
        viewer.set_scale(2.0);
        let element = viewer.add_element(ElementKind::Text).unwrap();

        viewer.begin_drag(element.id.clone()).unwrap();
        viewer.drag_to(Point::new(10.0, 10.0));

        let overlay = viewer.overlay().unwrap();
        assert_eq!(overlay.elements[0].left, 110.0);
        assert!(overlay.elements[0].dragging);

        viewer.end_drag(Point::new(20.0, 40.0));
        assert_eq!(viewer.elements()[0].position, Point::new(60.0, 70.0));

        let overlay = viewer.overlay().unwrap();
        assert_eq!(overlay.elements[0].left, 120.0);
        assert_eq!(overlay.elements[0].top, 140.0);
        assert_eq!(overlay.elements[0].width, 400.0);
        assert!(!overlay.elements[0].dragging);
    }

    #[test]
    fn test_leaving_edit_mode_cancels_drag() {
        let mut viewer = loaded(1);
        viewer.toggle_edit_mode();
        let element = viewer.add_element(ElementKind::Text).unwrap();
        viewer.begin_drag(element.id).unwrap();

        viewer.toggle_edit_mode();
        assert!(viewer.active_drag().is_none());
        assert_eq!(viewer.end_drag(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_signature_save_and_cancel() {
        let mut viewer = loaded(1);
        viewer.toggle_edit_mode();

        viewer.open_signature_pad().unwrap();
        viewer.cancel_signature();
        assert!(viewer.elements().is_empty());

        let pad = viewer.open_signature_pad().unwrap();
        pad.begin_stroke(Point::new(5.0, 5.0));
        pad.extend_stroke(Point::new(50.0, 25.0));
        pad.end_stroke();

        let element = viewer.save_signature().unwrap().unwrap();
        assert_eq!(element.kind, ElementKind::SignatureImage);
        assert_eq!(element.position, Point::new(50.0, 50.0));
        assert!(!viewer.is_signature_pad_open());
        assert_eq!(viewer.elements().len(), 1);
    }

    #[test]
    fn test_render_current_page_uses_view_parameters() {
        let mut viewer = loaded(3);
        viewer.change_page(1);
        viewer.rotate();
        viewer.zoom_out();

        let surface = viewer.render_current_page().unwrap().unwrap();
        assert_eq!(surface.page_number, 2);
        assert_eq!(surface.rotation, Rotation::Deg90);
        assert_eq!(surface.scale, 0.9);
        assert_eq!(surface.width, 180.0);
    }
}
