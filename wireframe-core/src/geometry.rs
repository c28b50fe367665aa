//! Geometry primitives and the pure math behind every transform gesture.
//!
//! Nothing in here holds state. Angles are in degrees, coordinates in canvas
//! space unless a function says otherwise. `NaN` and infinite inputs are not
//! guarded against; callers never produce them.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::Viewport;

/// A 2D point (or vector) in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component along the given axis.
    #[must_use]
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Zero-sized.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `width / height`, or `None` when either side is zero or negative.
    #[must_use]
    pub fn aspect_ratio(self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }

    /// Clamp both sides to be non-negative.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }
}

/// Skew angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Skew {
    /// Horizontal skew in degrees.
    pub x: f32,
    /// Vertical skew in degrees.
    pub y: f32,
}

impl Skew {
    /// Create a new skew.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Skew along the given axis.
    #[must_use]
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Copy with the given axis replaced.
    #[must_use]
    pub fn with(self, axis: Axis, degrees: f32) -> Self {
        match axis {
            Axis::X => Self::new(degrees, self.y),
            Axis::Y => Self::new(self.x, degrees),
        }
    }
}

/// A canvas axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// One of the eight resize handles around a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl HandleDirection {
    /// All eight handles, clockwise from the top edge.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// `1.0` if the handle sits on the right edge, `-1.0` on the left, `0.0` otherwise.
    #[must_use]
    pub fn horizontal_sign(self) -> f32 {
        match self {
            Self::E | Self::Ne | Self::Se => 1.0,
            Self::W | Self::Nw | Self::Sw => -1.0,
            Self::N | Self::S => 0.0,
        }
    }

    /// `1.0` if the handle sits on the bottom edge, `-1.0` on the top, `0.0` otherwise.
    #[must_use]
    pub fn vertical_sign(self) -> f32 {
        match self {
            Self::S | Self::Se | Self::Sw => 1.0,
            Self::N | Self::Ne | Self::Nw => -1.0,
            Self::E | Self::W => 0.0,
        }
    }

    /// Whether this is a corner handle.
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Nw | Self::Se | Self::Sw)
    }

    /// The axis that drives the other one under an aspect lock.
    ///
    /// Corners use width-drives-height.
    #[must_use]
    pub fn driving_axis(self) -> Axis {
        match self {
            Self::N | Self::S => Axis::Y,
            _ => Axis::X,
        }
    }
}

/// Position and size of an unrotated box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top-left corner.
    pub position: Point,
    /// Width and height.
    pub size: Size,
}

impl Bounds {
    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }
}

/// The full transform of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Top-left corner in canvas space (before rotation).
    pub position: Point,
    /// Width and height.
    pub size: Size,
    /// Rotation around the centre in degrees, within `[0, 360)`.
    #[serde(default)]
    pub rotation: f32,
    /// Skew in degrees.
    #[serde(default)]
    pub skew: Skew,
}

impl Geometry {
    /// Position and size.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            position: self.position,
            size: self.size,
        }
    }

    /// Centre of the unrotated box, which is also the rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// Convert a screen-space point into canvas space.
#[must_use]
pub fn screen_to_canvas(point: Point, viewport: &Viewport) -> Point {
    Point::new(
        (point.x - viewport.pan.x) / viewport.zoom,
        (point.y - viewport.pan.y) / viewport.zoom,
    )
}

/// Convert a canvas-space point into screen space.
#[must_use]
pub fn canvas_to_screen(point: Point, viewport: &Viewport) -> Point {
    Point::new(
        point.x * viewport.zoom + viewport.pan.x,
        point.y * viewport.zoom + viewport.pan.y,
    )
}

/// Round `value` to the nearest multiple of `grid_size`.
///
/// A non-positive grid size leaves the value untouched.
#[must_use]
pub fn snap(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Round an angle to the nearest multiple of `step` degrees.
#[must_use]
pub fn snap_angle(degrees: f32, step: f32) -> f32 {
    snap(degrees, step)
}

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can land exactly on 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Rotate `point` around `center` by `angle_degrees` (clockwise on a y-down canvas).
#[must_use]
pub fn rotate_point(point: Point, center: Point, angle_degrees: f32) -> Point {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Signed angle in degrees swept from `center→from` to `center→to`.
#[must_use]
pub fn angle_between(center: Point, from: Point, to: Point) -> f32 {
    let start = (from.y - center.y).atan2(from.x - center.x);
    let end = (to.y - center.y).atan2(to.x - center.x);
    (end - start).to_degrees()
}

/// Apply the aspect lock and minimum size to a candidate width/height.
///
/// With an aspect ratio, only the `driving` axis is taken from the candidate
/// and the other is derived from it.
#[must_use]
pub fn constrain_size(
    width: f32,
    height: f32,
    driving: Axis,
    aspect_ratio: Option<f32>,
    min: Size,
) -> Size {
    let min = min.non_negative();
    match aspect_ratio {
        Some(ratio) => match driving {
            Axis::X => {
                let width = width.max(min.width).max(min.height * ratio);
                Size::new(width, width / ratio)
            }
            Axis::Y => {
                let height = height.max(min.height).max(min.width / ratio);
                Size::new(height * ratio, height)
            }
        },
        None => Size::new(width.max(min.width), height.max(min.height)),
    }
}

/// New size for a handle drag, given the delta in section-local space.
#[must_use]
pub fn resized_size(
    start: Size,
    direction: HandleDirection,
    local_delta: Point,
    aspect_ratio: Option<f32>,
    min: Size,
) -> Size {
    constrain_size(
        start.width + local_delta.x * direction.horizontal_sign(),
        start.height + local_delta.y * direction.vertical_sign(),
        direction.driving_axis(),
        aspect_ratio,
        min,
    )
}

/// Place a resized box so the side opposite the dragged handle stays put.
///
/// For rotated sections the fixed point is kept in place on screen, not
/// just in the unrotated frame.
#[must_use]
pub fn anchored_bounds(start: &Geometry, direction: HandleDirection, size: Size) -> Bounds {
    let left = start.position.x;
    let top = start.position.y;
    let right = left + start.size.width;
    let bottom = top + start.size.height;

    let pulls_left = direction.horizontal_sign() < 0.0;
    let pulls_up = direction.vertical_sign() < 0.0;

    let mut bounds = Bounds {
        position: Point::new(
            if pulls_left { right - size.width } else { left },
            if pulls_up { bottom - size.height } else { top },
        ),
        size,
    };

    if normalize_rotation(start.rotation) != 0.0 {
        let anchor = Point::new(
            if pulls_left { right } else { left },
            if pulls_up { bottom } else { top },
        );
        let before = rotate_point(anchor, start.center(), start.rotation);
        let after = rotate_point(anchor, bounds.center(), start.rotation);
        bounds.position = bounds.position + (before - after);
    }

    bounds
}

/// Resize `start` by dragging `direction` by a canvas-space delta.
///
/// Corner handles change both axes, edge handles one. With `aspect_locked`
/// the ratio of `start.size` is preserved; an edge handle drives its own
/// axis and corners drive height from width. Sizes never go negative.
#[must_use]
pub fn resize_with_handle(
    start: &Geometry,
    direction: HandleDirection,
    pointer_delta_canvas: Point,
    aspect_locked: bool,
) -> Bounds {
    let ratio = if aspect_locked {
        start.size.aspect_ratio()
    } else {
        None
    };
    let local_delta = to_local_delta(pointer_delta_canvas, start.rotation);
    let size = resized_size(start.size, direction, local_delta, ratio, Size::ZERO);
    anchored_bounds(start, direction, size)
}

/// Express a canvas-space delta in the frame of a section rotated by `rotation`.
#[must_use]
pub fn to_local_delta(delta: Point, rotation: f32) -> Point {
    if normalize_rotation(rotation) == 0.0 {
        return delta;
    }
    rotate_point(delta, Point::ZERO, -rotation)
}
