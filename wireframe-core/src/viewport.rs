//! Canvas viewport: zoom, pan, grid and the space-bar pan mode.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point};
use crate::EditorConfig;

/// Grid display and snapping flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Whether the grid is drawn.
    pub enabled: bool,
    /// Grid cell size in canvas pixels.
    pub size: f32,
    /// Whether gestures snap to the grid.
    pub snap_enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 20.0,
            snap_enabled: true,
        }
    }
}

impl GridSettings {
    /// Smallest grid size accepted by [`Viewport::set_grid_size`].
    pub const MIN_SIZE: f32 = 1.0;

    /// Snap a value if snapping is on, identity otherwise.
    #[must_use]
    pub fn snap(&self, value: f32) -> f32 {
        if self.snap_enabled {
            geometry::snap(value, self.size)
        } else {
            value
        }
    }

    /// Snap both coordinates of a point if snapping is on.
    #[must_use]
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap(point.x), self.snap(point.y))
    }
}

/// Zoom and pan of the canvas, plus grid flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Current zoom level (1.0 = 100%).
    pub zoom: f32,
    /// Pan offset in screen pixels.
    pub pan: Point,
    /// Grid settings.
    pub grid: GridSettings,
    /// Whether pointer drags pan instead of manipulating sections.
    #[serde(skip)]
    pan_mode: bool,
    #[serde(skip)]
    limits: ZoomLimits,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomLimits {
    min: f32,
    max: f32,
    step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self::from(&config)
    }
}

impl From<&EditorConfig> for ZoomLimits {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min: config.min_zoom,
            max: config.max_zoom,
            step: config.zoom_step,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Viewport {
    /// Create a viewport at 100% with no pan, using the config's zoom bounds and grid.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        let config = config.clone().sanitized();
        let mut grid = config.grid;
        if grid.size < GridSettings::MIN_SIZE {
            tracing::warn!(
                "Grid size {} below minimum, using {}",
                grid.size,
                GridSettings::MIN_SIZE
            );
            grid.size = GridSettings::MIN_SIZE;
        }
        Self {
            zoom: 1.0_f32.clamp(config.min_zoom, config.max_zoom),
            pan: Point::ZERO,
            grid,
            pan_mode: false,
            limits: ZoomLimits::from(&config),
        }
    }

    /// Adopt zoom/pan/grid from a stored viewport while keeping this viewport's limits.
    pub(crate) fn restore(&mut self, stored: &Self) {
        self.zoom = stored.zoom.clamp(self.limits.min, self.limits.max);
        self.pan = stored.pan;
        self.grid = stored.grid;
        self.grid.size = self.grid.size.max(GridSettings::MIN_SIZE);
        self.pan_mode = false;
    }

    /// Convert a screen point into canvas space.
    #[must_use]
    pub fn screen_to_canvas(&self, point: Point) -> Point {
        geometry::screen_to_canvas(point, self)
    }

    /// Convert a canvas point into screen space.
    #[must_use]
    pub fn canvas_to_screen(&self, point: Point) -> Point {
        geometry::canvas_to_screen(point, self)
    }

    /// Set the zoom level, clamped to the configured bounds.
    ///
    /// Returns `true` if the zoom changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let zoom = zoom.clamp(self.limits.min, self.limits.max);
        if (zoom - self.zoom).abs() < f32::EPSILON {
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Multiply the zoom by the configured step.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom * self.limits.step)
    }

    /// Divide the zoom by the configured step.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom / self.limits.step)
    }

    /// Scale the zoom by `factor`, keeping the canvas point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, factor: f32, anchor: Point) -> bool {
        let canvas_point = self.screen_to_canvas(anchor);
        if !self.set_zoom(self.zoom * factor) {
            return false;
        }
        self.pan = Point::new(
            anchor.x - canvas_point.x * self.zoom,
            anchor.y - canvas_point.y * self.zoom,
        );
        true
    }

    /// Back to 100% with no pan.
    pub fn reset_zoom(&mut self) -> bool {
        let changed = (self.zoom - 1.0).abs() > f32::EPSILON || self.pan != Point::ZERO;
        self.zoom = 1.0_f32.clamp(self.limits.min, self.limits.max);
        self.pan = Point::ZERO;
        changed
    }

    /// Add a screen-space delta to the pan offset. Panning is unbounded.
    pub fn pan_by(&mut self, delta: Point) -> bool {
        if delta == Point::ZERO {
            return false;
        }
        self.pan = self.pan + delta;
        true
    }

    /// Replace the pan offset.
    pub fn set_pan(&mut self, pan: Point) -> bool {
        if pan == self.pan {
            return false;
        }
        self.pan = pan;
        true
    }

    /// Flip grid visibility.
    pub fn toggle_grid(&mut self) {
        self.grid.enabled = !self.grid.enabled;
    }

    /// Flip grid snapping.
    pub fn toggle_snap_to_grid(&mut self) {
        self.grid.snap_enabled = !self.grid.snap_enabled;
    }

    /// Change the grid size (at least [`GridSettings::MIN_SIZE`]).
    pub fn set_grid_size(&mut self, size: f32) -> bool {
        let size = size.max(GridSettings::MIN_SIZE);
        if (size - self.grid.size).abs() < f32::EPSILON {
            return false;
        }
        self.grid.size = size;
        true
    }

    /// Whether pointer drags currently pan the viewport.
    #[must_use]
    pub fn is_pan_mode_active(&self) -> bool {
        self.pan_mode
    }

    /// Enter or leave pan mode. Returns `true` if the flag changed.
    pub fn set_pan_mode(&mut self, active: bool) -> bool {
        let changed = self.pan_mode != active;
        self.pan_mode = active;
        changed
    }
}

/// An in-flight viewport pan drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    /// Pointer position when the drag began.
    pub start_pointer: Point,
    /// Pan offset when the drag began.
    pub start_pan: Point,
}

impl PanDrag {
    /// Begin a pan drag.
    #[must_use]
    pub fn start(pointer: Point, viewport: &Viewport) -> Self {
        Self {
            start_pointer: pointer,
            start_pan: viewport.pan,
        }
    }

    /// Pan offset for the current pointer position.
    #[must_use]
    pub fn pan_for(&self, pointer: Point) -> Point {
        self.start_pan + (pointer - self.start_pointer)
    }
}
