//! Viewer configuration

use crate::{Result, ViewerError};
use overlay::{DragSpace, Point, DEFAULT_PAD_HEIGHT, DEFAULT_PAD_WIDTH};
use serde::{Deserialize, Serialize};

/// Message shown when a document cannot be loaded
pub const DEFAULT_LOAD_ERROR: &str = "Failed to load PDF. Please try again.";

/// Tunable viewer behavior
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Scale change per zoom step
    pub zoom_step: f64,
    /// Smallest allowed scale
    pub min_scale: f64,
    /// Largest allowed scale
    pub max_scale: f64,
    /// Where new elements are placed (page coordinates)
    pub default_position: Point,
    /// User-facing message for load failures
    pub load_error_message: String,
    /// Units of the drag deltas reported by the pointer layer
    pub drag_space: DragSpace,
    /// Signature canvas width in pixels
    pub signature_width: u32,
    /// Signature canvas height in pixels
    pub signature_height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            min_scale: 0.5,
            max_scale: 2.0,
            default_position: Point::new(50.0, 50.0),
            load_error_message: DEFAULT_LOAD_ERROR.to_string(),
            drag_space: DragSpace::Screen,
            signature_width: DEFAULT_PAD_WIDTH,
            signature_height: DEFAULT_PAD_HEIGHT,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the scale bounds and canvas size are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "minScale must be positive, got {}",
                self.min_scale
            )));
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            return Err(ViewerError::InvalidConfig(format!(
                "maxScale ({}) must not be below minScale ({})",
                self.max_scale, self.min_scale
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "zoomStep must be positive, got {}",
                self.zoom_step
            )));
        }
        if self.signature_width == 0 || self.signature_height == 0 {
            return Err(ViewerError::InvalidConfig(
                "signature canvas must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp `scale` into the configured bounds
    ///
    /// Never panics, even on a configuration that fails [`validate`](Self::validate).
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            ViewerConfig::from_json(r#"{ "maxScale": 3.0, "dragSpace": "page" }"#).unwrap();
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.drag_space, DragSpace::Page);
        assert_eq!(config.min_scale, 0.5);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let result = ViewerConfig::from_json(r#"{ "minScale": 2.0, "maxScale": 1.0 }"#);
        assert!(matches!(result, Err(ViewerError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_json_is_rejected() {
        assert!(matches!(
            ViewerConfig::from_json("{ nope"),
            Err(ViewerError::JsonError(_))
        ));
    }

    #[test]
    fn test_clamp_scale_tolerates_unvalidated_bounds() {
        let config = ViewerConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..ViewerConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.clamp_scale(1.5), 1.0);
        assert_eq!(ViewerConfig::default().clamp_scale(3.0), 2.0);
    }

    #[test]
    fn test_zero_zoom_step_is_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "zoomStep": 0 }"#).is_err());
    }
}
