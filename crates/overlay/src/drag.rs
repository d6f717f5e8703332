//! Drag gestures over overlay elements

use crate::{ElementId, ElementStore, OverlayError, Point, Result};
use serde::{Deserialize, Serialize};

/// Coordinate space of the deltas reported by the pointer layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragSpace {
    /// Screen pixels: divided by the zoom scale before committing
    #[default]
    Screen,
    /// Already in unscaled page units: committed as-is
    Page,
}

impl DragSpace {
    /// Convert a reported delta into page units
    pub fn to_page_delta(self, delta: Point, scale: f64) -> Point {
        match self {
            DragSpace::Screen if scale > 0.0 => delta.scale(1.0 / scale),
            DragSpace::Screen | DragSpace::Page => delta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    id: ElementId,
    /// Cumulative gesture offset as reported so far (screen or page units)
    offset: Point,
}

/// Tracks at most one in-flight drag
///
/// The controller only records the gesture; the element store is touched
/// once, when the gesture ends.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    space: DragSpace,
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new(space: DragSpace) -> Self {
        Self {
            space,
            active: None,
        }
    }

    pub fn space(&self) -> DragSpace {
        self.space
    }

    /// Start dragging `id`
    ///
    /// Fails when another element is already being dragged. Restarting the
    /// drag of the same element resets its offset.
    pub fn begin(&mut self, id: ElementId) -> Result<()> {
        if let Some(active) = &self.active {
            if active.id != id {
                return Err(OverlayError::DragInProgress(active.id.to_string()));
            }
        }

        self.active = Some(ActiveDrag {
            id,
            offset: Point::default(),
        });
        Ok(())
    }

    /// Record the cumulative offset since the gesture started
    pub fn update(&mut self, total_delta: Point) {
        if let Some(active) = self.active.as_mut() {
            active.offset = total_delta;
        }
    }

    /// Live offset for rendering `id` while it is dragged (reported units)
    pub fn preview_offset(&self, id: &ElementId) -> Option<Point> {
        self.active
            .as_ref()
            .filter(|active| &active.id == id)
            .map(|active| active.offset)
    }

    /// Id of the element being dragged
    pub fn active(&self) -> Option<&ElementId> {
        self.active.as_ref().map(|active| &active.id)
    }

    /// Finish the gesture and commit its delta into `store`
    ///
    /// `total_delta` is the cumulative offset of the whole gesture and
    /// `scale` the zoom in effect. Returns the moved id, or `None` when no
    /// drag was active.
    pub fn end(
        &mut self,
        total_delta: Point,
        scale: f64,
        store: &mut ElementStore,
    ) -> Option<ElementId> {
        let active = self.active.take()?;
        let delta = self.space.to_page_delta(total_delta, scale);

        if !store.update_position(&active.id, delta) {
            log::debug!("Drag ended on unknown element {}", active.id);
        }
        Some(active.id)
    }

    /// Abandon the gesture without moving anything
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    #[test]
    fn test_screen_deltas_are_divided_by_scale() {
        let mut store = ElementStore::new();
        let element = store.add(ElementKind::Text, Point::new(50.0, 50.0));
        let mut drag = DragController::new(DragSpace::Screen);

        drag.begin(element.id.clone()).unwrap();
        drag.update(Point::new(20.0, 10.0));
        let moved = drag.end(Point::new(40.0, 20.0), 2.0, &mut store);

        assert_eq!(moved, Some(element.id.clone()));
        assert_eq!(
            store.get(&element.id).unwrap().position,
            Point::new(70.0, 60.0)
        );
        assert!(drag.active().is_none());
    }

    #[test]
    fn test_page_deltas_are_committed_as_is() {
        let mut store = ElementStore::new();
        let element = store.add(ElementKind::Text, Point::new(50.0, 50.0));
        let mut drag = DragController::new(DragSpace::Page);

        drag.begin(element.id.clone()).unwrap();
        drag.end(Point::new(40.0, 20.0), 2.0, &mut store);

        assert_eq!(
            store.get(&element.id).unwrap().position,
            Point::new(90.0, 70.0)
        );
    }

    #[test]
    fn test_second_drag_is_rejected_while_active() {
        let mut drag = DragController::default();
        drag.begin(ElementId::new("1")).unwrap();

        let err = drag.begin(ElementId::new("2")).unwrap_err();
        assert!(matches!(err, OverlayError::DragInProgress(ref id) if id == "1"));
        assert_eq!(drag.active(), Some(&ElementId::new("1")));
    }

    #[test]
    fn test_preview_offset_tracks_active_element_only() {
        let mut drag = DragController::default();
        drag.begin(ElementId::new("1")).unwrap();
        drag.update(Point::new(3.0, 4.0));

        assert_eq!(
            drag.preview_offset(&ElementId::new("1")),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(drag.preview_offset(&ElementId::new("2")), None);
    }

    #[test]
    fn test_cancel_leaves_store_untouched() {
        let mut store = ElementStore::new();
        let element = store.add(ElementKind::Text, Point::new(50.0, 50.0));
        let mut drag = DragController::default();

        drag.begin(element.id.clone()).unwrap();
        drag.update(Point::new(100.0, 100.0));
        drag.cancel();

        assert_eq!(drag.end(Point::new(1.0, 1.0), 1.0, &mut store), None);
        assert_eq!(
            store.get(&element.id).unwrap().position,
            Point::new(50.0, 50.0)
        );
    }

    #[test]
    fn test_end_for_unknown_element_is_harmless() {
        let mut store = ElementStore::new();
        let mut drag = DragController::default();

        drag.begin(ElementId::new("ghost")).unwrap();
        assert_eq!(
            drag.end(Point::new(1.0, 1.0), 1.0, &mut store),
            Some(ElementId::new("ghost"))
        );
        assert!(store.is_empty());
    }
}
