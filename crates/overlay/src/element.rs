//! Annotation element types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Placeholder text for new text elements
pub const DEFAULT_TEXT: &str = "Click to edit";

/// 2D offset in unscaled page coordinates (origin at the page's top-left)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply both components by `factor`
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Element footprint in unscaled page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Kind of annotation element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Editable text box
    #[serde(rename = "text")]
    Text,
    /// Drawn signature, stored as a PNG data URL
    #[serde(rename = "signature")]
    SignatureImage,
    /// "Sign here" placeholder
    #[serde(rename = "signatureRequest")]
    SignatureRequest,
}

impl ElementKind {
    /// Content a freshly added element starts with
    pub fn default_content(self) -> &'static str {
        match self {
            ElementKind::Text => DEFAULT_TEXT,
            ElementKind::SignatureImage | ElementKind::SignatureRequest => "",
        }
    }

    /// Footprint a freshly added element starts with
    pub fn default_size(self) -> Size {
        match self {
            ElementKind::Text => Size::new(200.0, 40.0),
            ElementKind::SignatureImage | ElementKind::SignatureRequest => Size::new(200.0, 80.0),
        }
    }
}

/// Unique element identifier, derived from the creation time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Annotation overlaid on the rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Literal text, a PNG data URL, or empty for placeholders
    pub content: String,
    /// Top-left corner; may be negative or beyond the page
    pub position: Point,
    pub size: Size,
}

/// Issues time-derived ids that never repeat
///
/// Ids are the current Unix time in milliseconds. When two ids are requested
/// within the same millisecond (or the clock steps backwards) the previous
/// id plus one is used instead, so ids stay strictly increasing.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id based on the system clock
    pub fn next_id(&mut self) -> ElementId {
        self.next_id_at(chrono::Utc::now().timestamp_millis())
    }

    /// Next id given the current time in milliseconds
    pub fn next_id_at(&mut self, now_millis: i64) -> ElementId {
        self.last = now_millis.max(self.last + 1);
        ElementId(self.last.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase_within_same_millisecond() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id_at(1_700_000_000_000);
        let b = ids.next_id_at(1_700_000_000_000);
        let c = ids.next_id_at(1_699_999_999_999);

        assert_eq!(a.as_str(), "1700000000000");
        assert_eq!(b.as_str(), "1700000000001");
        assert_eq!(c.as_str(), "1700000000002");
    }

    #[test]
    fn test_ids_follow_the_clock() {
        let mut ids = IdGenerator::new();
        ids.next_id_at(1_000);
        assert_eq!(ids.next_id_at(5_000).as_str(), "5000");
    }

    #[test]
    fn test_kind_defaults() {
        assert_eq!(ElementKind::Text.default_content(), "Click to edit");
        assert_eq!(ElementKind::SignatureRequest.default_content(), "");
        assert_eq!(ElementKind::Text.default_size(), Size::new(200.0, 40.0));
        assert_eq!(
            ElementKind::SignatureImage.default_size(),
            Size::new(200.0, 80.0)
        );
    }

    #[test]
    fn test_element_wire_format() {
        let element = Element {
            id: ElementId::new("42"),
            kind: ElementKind::SignatureRequest,
            content: String::new(),
            position: Point::new(50.0, 50.0),
            size: Size::new(200.0, 80.0),
        };

        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["type"], "signatureRequest");
        assert_eq!(json["position"]["x"], 50.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(10.0, 20.0) + Point::new(5.0, -5.0);
        assert_eq!(p, Point::new(15.0, 15.0));
        assert_eq!(p - Point::new(15.0, 15.0), Point::default());
        assert_eq!(p.scale(2.0), Point::new(30.0, 30.0));
    }
}
