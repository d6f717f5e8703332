//! Freehand signature capture
//!
//! A [`SignaturePad`] collects pen strokes in canvas pixels and rasterizes
//! them into a transparent PNG. [`SignatureCapture`] wraps the pad in the
//! open/save/cancel lifecycle of the signature modal.

use crate::{Element, ElementKind, ElementStore, OverlayError, Point, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::io::Cursor;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Default canvas width in pixels
pub const DEFAULT_PAD_WIDTH: u32 = 400;
/// Default canvas height in pixels
pub const DEFAULT_PAD_HEIGHT: u32 = 200;

/// Pen width in canvas pixels
const PEN_WIDTH: f32 = 2.5;

/// One continuous pen stroke
pub type StrokePath = Vec<Point>;

/// Freehand drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    strokes: Vec<StrokePath>,
    drawing: bool,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new(DEFAULT_PAD_WIDTH, DEFAULT_PAD_HEIGHT)
    }
}

impl SignaturePad {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            drawing: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pen down at `point`
    pub fn begin_stroke(&mut self, point: Point) {
        self.strokes.push(vec![point]);
        self.drawing = true;
    }

    /// Pen moved to `point`; ignored while the pen is up
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    /// Pen up
    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    /// Erase everything drawn so far
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn strokes(&self) -> &[StrokePath] {
        &self.strokes
    }

    /// Rasterize the drawing and encode it as PNG
    ///
    /// Strokes are drawn in black with round caps and joins on a transparent
    /// background. A stroke with a single point becomes a dot.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let pixmap = self.rasterize()?;

        let rgba: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();

        let image = image::RgbaImage::from_raw(self.width, self.height, rgba)
            .ok_or_else(|| OverlayError::Canvas("pixel buffer size mismatch".to_string()))?;

        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, image::ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    /// PNG drawing wrapped as a `data:image/png;base64,...` URL
    pub fn to_data_url(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", BASE64.encode(self.to_png()?)))
    }

    fn rasterize(&self) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or_else(|| {
            OverlayError::Canvas(format!(
                "invalid canvas size {}x{}",
                self.width, self.height
            ))
        })?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: PEN_WIDTH,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for points in &self.strokes {
            match points.as_slice() {
                [] => {}
                [dot] => {
                    if let Some(path) =
                        PathBuilder::from_circle(dot.x as f32, dot.y as f32, PEN_WIDTH / 2.0)
                    {
                        pixmap.fill_path(
                            &path,
                            &paint,
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        );
                    }
                }
                [first, rest @ ..] => {
                    let mut builder = PathBuilder::new();
                    builder.move_to(first.x as f32, first.y as f32);
                    for point in rest {
                        builder.line_to(point.x as f32, point.y as f32);
                    }
                    if let Some(path) = builder.finish() {
                        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                    }
                }
            }
        }

        Ok(pixmap)
    }
}

/// Signature modal lifecycle
#[derive(Debug, Clone, Default)]
pub struct SignatureCapture {
    pad: Option<SignaturePad>,
}

impl SignatureCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the modal with a blank canvas (an open modal keeps its drawing)
    pub fn open(&mut self, width: u32, height: u32) -> &mut SignaturePad {
        self.pad.get_or_insert_with(|| SignaturePad::new(width, height))
    }

    pub fn is_open(&self) -> bool {
        self.pad.is_some()
    }

    pub fn pad(&self) -> Option<&SignaturePad> {
        self.pad.as_ref()
    }

    pub fn pad_mut(&mut self) -> Option<&mut SignaturePad> {
        self.pad.as_mut()
    }

    /// Reset the canvas, keeping the modal open
    pub fn clear(&mut self) {
        if let Some(pad) = self.pad.as_mut() {
            pad.clear();
        }
    }

    /// Serialize the drawing into a new signature element and close
    ///
    /// Returns `None` when the modal is not open. An empty drawing still
    /// produces a (blank) signature image. On error the modal stays open.
    pub fn save(&mut self, store: &mut ElementStore, position: Point) -> Result<Option<Element>> {
        let Some(pad) = self.pad.as_ref() else {
            return Ok(None);
        };

        let data_url = pad.to_data_url()?;
        let element = store.add_with_content(ElementKind::SignatureImage, data_url, position);

        self.pad = None;
        Ok(Some(element))
    }

    /// Close the modal, discarding the drawing
    pub fn cancel(&mut self) {
        self.pad = None;
    }
}
