//! Editor configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use wireframe_core::EditorConfig;
//!
//! let config = EditorConfig::from_json(r#"{"max_zoom": 8.0}"#).unwrap();
//! assert_eq!(config.max_zoom, 8.0);
//! assert_eq!(config.min_zoom, 0.1);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult, GridSettings, Size};

/// Tunables for the viewport and the gesture engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Lowest allowed zoom level.
    pub min_zoom: f32,
    /// Highest allowed zoom level.
    pub max_zoom: f32,
    /// Multiplier applied by zoom in/out.
    pub zoom_step: f32,
    /// Wheel zoom factor per pixel of wheel delta.
    pub wheel_zoom_sensitivity: f32,
    /// Grid settings applied on document load.
    pub grid: GridSettings,
    /// Smallest size a resize gesture may produce.
    pub min_section_size: Size,
    /// Degrees of skew per canvas pixel of pointer travel.
    pub skew_sensitivity: f32,
    /// Largest absolute skew angle in degrees.
    pub max_skew: f32,
    /// Rotation increment used when rotation snapping is requested.
    pub rotation_snap_step: f32,
    /// Arrow-key nudge distance in canvas pixels (the grid size with Shift).
    pub nudge_step: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.1,
            wheel_zoom_sensitivity: 0.002,
            grid: GridSettings::default(),
            min_section_size: Size::new(1.0, 1.0),
            skew_sensitivity: 0.5,
            max_skew: 89.0,
            rotation_snap_step: 15.0,
            nudge_step: 1.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            tracing::warn!("Rejected editor config: {e}");
            return Err(e);
        }
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loaded editor config from {}", path.as_ref().display());
        Self::from_json(&contents)
    }

    /// Check that zoom bounds and steps make sense.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> EditorResult<()> {
        if self.min_zoom.is_nan() || self.min_zoom <= 0.0 {
            return Err(EditorError::InvalidConfig(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.max_zoom.is_nan() || self.max_zoom < self.min_zoom {
            return Err(EditorError::InvalidConfig(format!(
                "max_zoom ({}) is below min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if self.zoom_step.is_nan() || self.zoom_step <= 1.0 {
            return Err(EditorError::InvalidConfig(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if !(0.0..90.0).contains(&self.max_skew) {
            return Err(EditorError::InvalidConfig(format!(
                "max_skew must be within [0, 90), got {}",
                self.max_skew
            )));
        }
        if self.min_section_size.width < 0.0 || self.min_section_size.height < 0.0 {
            return Err(EditorError::InvalidConfig(
                "min_section_size must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// A copy with every out-of-range value repaired.
    ///
    /// Inverted zoom bounds are swapped; other bad values fall back to their
    /// defaults. Used wherever a config enters the engine, so hand-built
    /// configs are clamped instead of rejected.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let Err(e) = self.validate() else {
            return self;
        };
        tracing::warn!("Repairing editor config: {e}");

        let defaults = Self::default();
        let mut config = self;
        if config.min_zoom.is_nan() || config.min_zoom <= 0.0 {
            config.min_zoom = defaults.min_zoom;
        }
        if config.max_zoom.is_nan() || config.max_zoom <= 0.0 {
            config.max_zoom = defaults.max_zoom.max(config.min_zoom);
        }
        if config.max_zoom < config.min_zoom {
            std::mem::swap(&mut config.min_zoom, &mut config.max_zoom);
        }
        if config.zoom_step.is_nan() || config.zoom_step <= 1.0 {
            config.zoom_step = defaults.zoom_step;
        }
        if !(0.0..90.0).contains(&config.max_skew) {
            config.max_skew = defaults.max_skew;
        }
        config.min_section_size = config.min_section_size.non_negative();
        config
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EditorConfig::default().validate().expect("defaults should validate");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{"zoom_step": 1.25, "grid": {"size": 8.0}}"#)
            .expect("should parse");
        assert_eq!(config.zoom_step, 1.25);
        assert_eq!(config.grid.size, 8.0);
        assert!(config.grid.enabled);
        assert_eq!(config.max_zoom, 5.0);
    }

    #[test]
    fn test_inverted_zoom_bounds_rejected() {
        let err = EditorConfig::from_json(r#"{"min_zoom": 2.0, "max_zoom": 1.0}"#)
            .expect_err("should reject");
        assert!(matches!(err, EditorError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_positive_zoom_rejected() {
        assert!(EditorConfig::from_json(r#"{"min_zoom": 0.0}"#).is_err());
        assert!(EditorConfig::from_json(r#"{"zoom_step": 1.0}"#).is_err());
    }

    #[test]
    fn test_sanitized_swaps_inverted_zoom() {
        let config = EditorConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..EditorConfig::default()
        }
        .sanitized();
        assert_eq!((config.min_zoom, config.max_zoom), (1.0, 2.0));
        config.validate().expect("repaired config validates");
    }

    #[test]
    fn test_sanitized_restores_defaults() {
        let defaults = EditorConfig::default();
        let config = EditorConfig {
            min_zoom: -1.0,
            zoom_step: 0.5,
            max_skew: f32::NAN,
            min_section_size: Size::new(-3.0, 2.0),
            ..EditorConfig::default()
        }
        .sanitized();
        assert_eq!(config.min_zoom, defaults.min_zoom);
        assert_eq!(config.zoom_step, defaults.zoom_step);
        assert_eq!(config.max_skew, defaults.max_skew);
        assert_eq!(config.min_section_size, Size::new(0.0, 2.0));
        assert_eq!(EditorConfig::default().sanitized(), defaults);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"nudge_step": 4.0}}"#).expect("write");
        let config = EditorConfig::from_file(file.path()).expect("should load");
        assert_eq!(config.nudge_step, 4.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = EditorConfig::from_file(dir.path().join("missing.json")).expect_err("missing");
        assert!(matches!(err, EditorError::Io(_)));
    }
}
