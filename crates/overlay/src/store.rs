//! Element store with copy-on-write snapshots

use crate::{Element, ElementId, ElementKind, IdGenerator, Point, Result};
use std::sync::Arc;

/// Immutable view of the store at one point in time
pub type Snapshot = Arc<[Element]>;

/// Ordered collection of annotation elements
///
/// Every mutation builds a new collection and swaps it in. Snapshots handed
/// out by [`ElementStore::list`] are therefore never modified afterwards, so
/// a render pass holding one cannot observe a half-applied update.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Snapshot,
    ids: IdGenerator,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    pub fn new() -> Self {
        Self {
            elements: Arc::from(Vec::new()),
            ids: IdGenerator::new(),
        }
    }

    /// Add an element with the kind's default content and size
    pub fn add(&mut self, kind: ElementKind, position: Point) -> Element {
        self.add_with_content(kind, kind.default_content(), position)
    }

    /// Add an element with explicit content
    pub fn add_with_content(
        &mut self,
        kind: ElementKind,
        content: impl Into<String>,
        position: Point,
    ) -> Element {
        let element = Element {
            id: self.ids.next_id(),
            kind,
            content: content.into(),
            position,
            size: kind.default_size(),
        };

        let mut next = self.elements.to_vec();
        next.push(element.clone());
        self.elements = next.into();

        log::debug!("Added {:?} element {}", kind, element.id);
        element
    }

    /// Replace an element's content
    ///
    /// Returns `false` (and changes nothing) when `id` is unknown.
    pub fn update_content(&mut self, id: &ElementId, content: impl Into<String>) -> bool {
        let content = content.into();
        self.replace(id, |element| Element {
            content: content.clone(),
            ..element.clone()
        })
    }

    /// Move an element by `delta` (accumulated onto its current position)
    ///
    /// Returns `false` (and changes nothing) when `id` is unknown.
    pub fn update_position(&mut self, id: &ElementId, delta: Point) -> bool {
        self.replace(id, |element| Element {
            position: element.position + delta,
            ..element.clone()
        })
    }

    /// Look up an element by id
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| &element.id == id)
    }

    /// Current snapshot, in insertion order
    pub fn list(&self) -> Snapshot {
        Arc::clone(&self.elements)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drop all elements
    pub fn clear(&mut self) {
        self.elements = Arc::from(Vec::new());
    }

    /// Serialize the current elements as a JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.elements)?)
    }

    fn replace(&mut self, id: &ElementId, update: impl Fn(&Element) -> Element) -> bool {
        if self.get(id).is_none() {
            return false;
        }

        self.elements = self
            .elements
            .iter()
            .map(|element| {
                if &element.id == id {
                    update(element)
                } else {
                    element.clone()
                }
            })
            .collect();
        true
    }
}
