//! Rendered page geometry

use crate::{DocError, PageSize, Result};
use serde::{Deserialize, Serialize};

/// Clockwise page rotation in quarter turns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation in degrees (0, 90, 180 or 270)
    pub fn degrees(self) -> i64 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Build a rotation from any multiple of 90 degrees
    ///
    /// Negative values and values above 360 are normalized, so `-90`
    /// and `450` map to `Deg270` and `Deg90`.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(DocError::InvalidRotation(degrees));
        }

        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        })
    }

    /// Next rotation step, clockwise
    pub fn rotated_cw(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Combine two rotations (e.g. page `/Rotate` plus viewer rotation)
    pub fn combine(self, other: Rotation) -> Self {
        match (self.degrees() + other.degrees()).rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Whether width and height swap under this rotation
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<i64> for Rotation {
    type Error = DocError;

    fn try_from(degrees: i64) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i64 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// On-screen footprint of a rendered page
///
/// Width and height are in screen pixels (page points x scale), already
/// swapped for quarter-turn rotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSurface {
    /// Page number (1-indexed)
    pub page_number: usize,
    /// Rendered width in pixels
    pub width: f64,
    /// Rendered height in pixels
    pub height: f64,
    /// Zoom factor applied to the page
    pub scale: f64,
    /// Effective rotation (page `/Rotate` combined with the viewer rotation)
    pub rotation: Rotation,
}

impl PageSurface {
    /// Compute the surface for a page of `size` at `scale` and `rotation`
    pub fn new(page_number: usize, size: PageSize, scale: f64, rotation: Rotation) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DocError::InvalidScale(scale));
        }

        let (width, height) = if rotation.is_quarter_turn() {
            (size.height, size.width)
        } else {
            (size.width, size.height)
        };

        Ok(Self {
            page_number,
            width: width * scale,
            height: height * scale,
            scale,
            rotation,
        })
    }

    /// Map an unscaled page coordinate to surface pixels
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale, y * self.scale)
    }

    /// Map surface pixels back to unscaled page coordinates
    pub fn to_page(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.scale, y / self.scale)
    }
}
