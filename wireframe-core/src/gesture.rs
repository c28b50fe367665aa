//! Transform gestures: the idle → moving/resizing/rotating/skewing → idle machine.
//!
//! A gesture captures a snapshot of its target's geometry when it starts and
//! computes every update from that snapshot plus the total pointer travel,
//! never from the previous update. Repeated pointer moves therefore cannot
//! accumulate rounding drift, and snapping never compounds.
//!
//! ```text
//!             start (unlocked, visible, not panning)
//!   ┌──────┐ ───────────────────────────────────────▶ ┌───────────────┐
//!   │ Idle │                                          │ Moving        │
//!   │      │ ◀─────────────────────────────────────── │ Resizing      │
//!   └──────┘   stop / target removed, locked, hidden  │ Rotating      │
//!                                                     │ Skewing       │
//!                                                     └───────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::{
    anchored_bounds, angle_between, constrain_size, normalize_rotation, resized_size, snap_angle,
    to_local_delta, Axis, Bounds, Geometry, HandleDirection, Point, Size, Skew,
};
use crate::{
    Document, EditorConfig, GeometryUpdate, GridSettings, Section, SectionId, Selection,
    StartRefused, Viewport,
};

/// Which transform a gesture performs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureKind {
    /// Drag the whole section.
    Move,
    /// Drag one of the eight resize handles.
    Resize {
        /// Handle being dragged.
        direction: HandleDirection,
        /// Keep the starting aspect ratio.
        #[serde(default)]
        aspect_locked: bool,
    },
    /// Drag the rotation handle.
    Rotate {
        /// Snap the angle to the configured rotation step.
        #[serde(default)]
        snap: bool,
    },
    /// Drag a skew handle.
    Skew {
        /// Axis being skewed.
        axis: Axis,
    },
}

impl GestureKind {
    /// State the machine enters for this kind.
    #[must_use]
    pub fn state(self) -> GestureState {
        match self {
            Self::Move => GestureState::Moving,
            Self::Resize { .. } => GestureState::Resizing,
            Self::Rotate { .. } => GestureState::Rotating,
            Self::Skew { .. } => GestureState::Skewing,
        }
    }
}

/// State of the gesture machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    /// No gesture in flight.
    #[default]
    Idle,
    /// A move gesture is in flight.
    Moving,
    /// A resize gesture is in flight.
    Resizing,
    /// A rotate gesture is in flight.
    Rotating,
    /// A skew gesture is in flight.
    Skewing,
}

/// Constraints fixed for the lifetime of one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    /// Grid size and snapping, captured from the viewport at start.
    pub grid: GridSettings,
    /// Aspect ratio to hold, for locked resizes of non-degenerate sections.
    pub aspect_ratio: Option<f32>,
    /// Rotation snap step, for snapped rotations.
    pub rotation_step: Option<f32>,
    /// Smallest allowed size.
    pub min_size: Size,
    /// Degrees of skew per canvas pixel.
    pub skew_sensitivity: f32,
    /// Largest absolute skew.
    pub max_skew: f32,
}

/// The tracking state of one in-flight gesture.
///
/// Created when a gesture starts and dropped when it stops or aborts.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    kind: GestureKind,
    target: SectionId,
    origin: Point,
    start: Geometry,
    constraints: Constraints,
}

impl GestureSession {
    fn begin(
        target: &Section,
        origin: Point,
        kind: GestureKind,
        viewport: &Viewport,
        config: &EditorConfig,
    ) -> Self {
        let start = target.geometry;
        let aspect_ratio = match kind {
            GestureKind::Resize {
                aspect_locked: true,
                ..
            } => start.size.aspect_ratio(),
            _ => None,
        };
        let rotation_step = match kind {
            GestureKind::Rotate { snap: true } if config.rotation_snap_step > 0.0 => {
                Some(config.rotation_snap_step)
            }
            _ => None,
        };
        Self {
            kind,
            target: target.id,
            origin,
            start,
            constraints: Constraints {
                grid: viewport.grid,
                aspect_ratio,
                rotation_step,
                min_size: config.min_section_size,
                skew_sensitivity: config.skew_sensitivity,
                max_skew: config.max_skew,
            },
        }
    }

    /// Gesture kind.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// Target section.
    #[must_use]
    pub fn target(&self) -> SectionId {
        self.target
    }

    /// Pointer position (screen space) when the gesture started.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Geometry of the target when the gesture started.
    #[must_use]
    pub fn start_geometry(&self) -> &Geometry {
        &self.start
    }

    /// Constraints captured at start.
    #[must_use]
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The geometry write for the pointer now being at `pointer` (screen space).
    #[must_use]
    pub fn update_for(&self, pointer: Point, viewport: &Viewport) -> GeometryUpdate {
        let delta = viewport.screen_to_canvas(pointer) - viewport.screen_to_canvas(self.origin);
        match self.kind {
            GestureKind::Move => GeometryUpdate::Position {
                position: self.moved(delta),
            },
            GestureKind::Resize { direction, .. } => {
                let Bounds { position, size } = self.resized(direction, delta);
                GeometryUpdate::Bounds { position, size }
            }
            GestureKind::Rotate { .. } => GeometryUpdate::Rotation {
                degrees: self.rotated(pointer, viewport),
            },
            GestureKind::Skew { axis } => GeometryUpdate::Skew {
                skew: self.skewed(axis, delta),
            },
        }
    }

    fn moved(&self, delta: Point) -> Point {
        self.constraints.grid.snap_point(self.start.position + delta)
    }

    fn resized(&self, direction: HandleDirection, delta: Point) -> Bounds {
        let c = &self.constraints;
        let local = to_local_delta(delta, self.start.rotation);
        let mut size = resized_size(self.start.size, direction, local, c.aspect_ratio, c.min_size);

        if c.grid.snap_enabled {
            // Only the axes the handle drives snap; under a lock the other is derived.
            let driving = direction.driving_axis();
            let (snap_width, snap_height) = match c.aspect_ratio {
                Some(_) => (driving == Axis::X, driving == Axis::Y),
                None => (
                    direction.horizontal_sign() != 0.0,
                    direction.vertical_sign() != 0.0,
                ),
            };
            let width = if snap_width {
                c.grid.snap(size.width)
            } else {
                size.width
            };
            let height = if snap_height {
                c.grid.snap(size.height)
            } else {
                size.height
            };
            size = constrain_size(width, height, driving, c.aspect_ratio, c.min_size);
        }

        anchored_bounds(&self.start, direction, size)
    }

    fn rotated(&self, pointer: Point, viewport: &Viewport) -> f32 {
        let center = self.start.center();
        let from = viewport.screen_to_canvas(self.origin);
        let to = viewport.screen_to_canvas(pointer);
        let mut degrees = self.start.rotation + angle_between(center, from, to);
        if let Some(step) = self.constraints.rotation_step {
            degrees = snap_angle(degrees, step);
        }
        normalize_rotation(degrees)
    }

    fn skewed(&self, axis: Axis, delta: Point) -> Skew {
        let c = &self.constraints;
        let degrees = self.start.skew.along(axis) + delta.along(axis) * c.skew_sensitivity;
        self.start
            .skew
            .with(axis, degrees.clamp(-c.max_skew, c.max_skew))
    }
}

/// Result of feeding one pointer move to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture was in flight.
    Idle,
    /// The target's geometry changed.
    Applied(SectionId),
    /// The update produced the geometry the target already had.
    Unchanged(SectionId),
    /// The target vanished, or became locked or hidden; the gesture was dropped.
    Aborted(SectionId),
}

/// The document-wide gesture machine. At most one gesture is in flight.
#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    config: EditorConfig,
    session: Option<GestureSession>,
}

impl GestureMachine {
    /// Create an idle machine using the config's gesture limits.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            config: config.clone().sanitized(),
            session: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.session
            .as_ref()
            .map_or(GestureState::Idle, |s| s.kind.state())
    }

    /// The in-flight gesture, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Start a gesture on `id` with the pointer at `pointer` (screen space).
    ///
    /// # Errors
    ///
    /// Refuses when a gesture is already in flight, pan mode is active, or the
    /// section is unknown, locked or hidden. Refusal changes nothing.
    pub fn start(
        &mut self,
        document: &Document,
        viewport: &Viewport,
        selection: &mut Selection,
        id: SectionId,
        pointer: Point,
        kind: GestureKind,
    ) -> Result<GestureState, StartRefused> {
        if let Some(session) = &self.session {
            return Err(StartRefused::GestureInFlight(session.target));
        }
        if viewport.is_pan_mode_active() {
            return Err(StartRefused::PanModeActive);
        }
        let section = document
            .get_section(id)
            .ok_or(StartRefused::SectionNotFound(id))?;
        if section.locked {
            return Err(StartRefused::Locked(id));
        }
        if section.hidden {
            return Err(StartRefused::Hidden(id));
        }

        let session = GestureSession::begin(section, pointer, kind, viewport, &self.config);
        let state = kind.state();
        tracing::debug!(
            "Gesture {state:?} started on {id} at ({}, {})",
            pointer.x,
            pointer.y
        );
        self.session = Some(session);
        selection.set_dragging(Some(id));
        Ok(state)
    }

    /// Apply the in-flight gesture for the pointer at `pointer` (screen space).
    pub fn update(
        &mut self,
        document: &mut Document,
        viewport: &Viewport,
        selection: &mut Selection,
        pointer: Point,
    ) -> DragOutcome {
        let Some(session) = &self.session else {
            return DragOutcome::Idle;
        };
        let target = session.target;

        let still_valid = document
            .get_section(target)
            .is_some_and(|s| !s.locked && !s.hidden);
        if !still_valid {
            tracing::debug!("Gesture target {target} gone, aborting");
            self.session = None;
            selection.set_dragging(None);
            return DragOutcome::Aborted(target);
        }

        let update = session.update_for(pointer, viewport);
        tracing::trace!("Gesture update on {target}: {update:?}");
        if document.update_section_geometry(target, update) {
            DragOutcome::Applied(target)
        } else {
            DragOutcome::Unchanged(target)
        }
    }

    /// End the in-flight gesture, returning its target. Idempotent.
    pub fn stop(&mut self, selection: &mut Selection) -> Option<SectionId> {
        let session = self.session.take()?;
        selection.set_dragging(None);
        tracing::debug!("Gesture {:?} ended on {}", session.kind.state(), session.target);
        Some(session.target)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{NewSection, SectionType};

    struct Fixture {
        document: Document,
        viewport: Viewport,
        selection: Selection,
        machine: GestureMachine,
        id: SectionId,
    }

    fn fixture(new: NewSection, snap_enabled: bool) -> Fixture {
        let config = EditorConfig::default();
        let mut document = Document::new();
        let id = document.add_section(new);
        let mut viewport = Viewport::new(&config);
        viewport.grid.snap_enabled = snap_enabled;
        viewport.grid.size = 10.0;
        Fixture {
            document,
            viewport,
            selection: Selection::default(),
            machine: GestureMachine::new(&config),
            id,
        }
    }

    impl Fixture {
        fn start(&mut self, pointer: Point, kind: GestureKind) -> Result<GestureState, StartRefused> {
            self.machine.start(
                &self.document,
                &self.viewport,
                &mut self.selection,
                self.id,
                pointer,
                kind,
            )
        }

        fn drag(&mut self, pointer: Point) -> DragOutcome {
            self.machine.update(
                &mut self.document,
                &self.viewport,
                &mut self.selection,
                pointer,
            )
        }

        fn geometry(&self) -> Geometry {
            self.document.get_section(self.id).expect("exists").geometry
        }
    }

    #[test]
    fn test_move_with_snap() {
        let mut f = fixture(NewSection::new(SectionType::Hero).at(103.0, 57.0), true);
        f.start(Point::new(500.0, 500.0), GestureKind::Move).expect("start");
        assert_eq!(f.drag(Point::new(504.0, 502.0)), DragOutcome::Applied(f.id));
        assert_eq!(f.geometry().position, Point::new(110.0, 60.0));
    }

    #[test]
    fn test_move_respects_zoom() {
        let mut f = fixture(NewSection::new(SectionType::Hero), false);
        f.viewport.zoom = 2.0;
        f.start(Point::new(0.0, 0.0), GestureKind::Move).expect("start");
        f.drag(Point::new(40.0, 20.0));
        assert_eq!(f.geometry().position, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_updates_are_relative_to_start() {
        let mut f = fixture(NewSection::new(SectionType::Hero).at(10.0, 10.0), false);
        f.start(Point::ZERO, GestureKind::Move).expect("start");
        f.drag(Point::new(5.0, 5.0));
        f.drag(Point::new(7.0, 3.0));
        assert_eq!(f.geometry().position, Point::new(17.0, 13.0));
    }

    #[test]
    fn test_second_start_refused() {
        let mut f = fixture(NewSection::new(SectionType::Hero), false);
        f.start(Point::ZERO, GestureKind::Move).expect("start");
        let err = f
            .start(Point::ZERO, GestureKind::Rotate { snap: false })
            .expect_err("refused");
        assert_eq!(err, StartRefused::GestureInFlight(f.id));
        assert_eq!(f.machine.state(), GestureState::Moving);
    }

    #[test]
    fn test_locked_refused() {
        let mut f = fixture(NewSection::new(SectionType::Hero).locked(), false);
        let err = f.start(Point::ZERO, GestureKind::Move).expect_err("refused");
        assert_eq!(err, StartRefused::Locked(f.id));
        assert_eq!(f.selection.dragging_section_id(), None);
    }

    #[test]
    fn test_pan_mode_refused() {
        let mut f = fixture(NewSection::new(SectionType::Hero), false);
        f.viewport.set_pan_mode(true);
        assert_eq!(
            f.start(Point::ZERO, GestureKind::Move),
            Err(StartRefused::PanModeActive)
        );
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut f = fixture(NewSection::new(SectionType::Custom).sized(50.0, 50.0), false);
        f.start(
            Point::ZERO,
            GestureKind::Resize {
                direction: HandleDirection::Se,
                aspect_locked: false,
            },
        )
        .expect("start");
        f.drag(Point::new(-500.0, -500.0));
        assert_eq!(f.geometry().size, Size::new(1.0, 1.0));
    }

    #[test]
    fn test_resize_snaps_only_dragged_axis() {
        let mut f = fixture(
            NewSection::new(SectionType::Custom).at(0.0, 0.0).sized(100.0, 33.0),
            true,
        );
        f.start(
            Point::ZERO,
            GestureKind::Resize {
                direction: HandleDirection::E,
                aspect_locked: false,
            },
        )
        .expect("start");
        f.drag(Point::new(14.0, 0.0));
        assert_eq!(f.geometry().size, Size::new(110.0, 33.0));
    }

    #[test]
    fn test_resize_west_snapped_keeps_right_edge() {
        let mut f = fixture(
            NewSection::new(SectionType::Custom).at(100.0, 0.0).sized(100.0, 50.0),
            true,
        );
        f.start(
            Point::ZERO,
            GestureKind::Resize {
                direction: HandleDirection::W,
                aspect_locked: false,
            },
        )
        .expect("start");
        f.drag(Point::new(-23.0, 0.0));
        let g = f.geometry();
        assert_eq!(g.size.width, 120.0);
        assert_eq!(g.position.x + g.size.width, 200.0);
    }

    #[test]
    fn test_locked_aspect_survives_snapping() {
        let mut f = fixture(NewSection::new(SectionType::Custom).sized(160.0, 90.0), true);
        f.start(
            Point::ZERO,
            GestureKind::Resize {
                direction: HandleDirection::Se,
                aspect_locked: true,
            },
        )
        .expect("start");
        for step in 1..20_u8 {
            let step = f32::from(step);
            f.drag(Point::new(step * 7.3, step * -2.1));
            let size = f.geometry().size;
            assert!((size.width / size.height - 160.0 / 90.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rotate_quarter_turn_and_wrap() {
        let mut f = fixture(
            NewSection::new(SectionType::Custom).at(0.0, 0.0).sized(100.0, 100.0).rotated(300.0),
            false,
        );
        // Centre is (50, 50); sweep from the right of it to below it
        f.start(Point::new(100.0, 50.0), GestureKind::Rotate { snap: false })
            .expect("start");
        f.drag(Point::new(50.0, 100.0));
        assert!((f.geometry().rotation - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_snaps_to_step() {
        let mut f = fixture(NewSection::new(SectionType::Custom).sized(100.0, 100.0), false);
        f.start(Point::new(100.0, 50.0), GestureKind::Rotate { snap: true })
            .expect("start");
        // About 20 degrees clockwise
        f.drag(Point::new(97.0, 67.1));
        assert!((f.geometry().rotation - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_skew_projects_onto_axis_and_clamps() {
        let mut f = fixture(NewSection::new(SectionType::Custom), false);
        f.start(Point::ZERO, GestureKind::Skew { axis: Axis::X })
            .expect("start");
        f.drag(Point::new(20.0, 999.0));
        assert_eq!(f.geometry().skew, Skew::new(10.0, 0.0));
        f.drag(Point::new(10_000.0, 0.0));
        assert_eq!(f.geometry().skew.x, 89.0);
    }

    #[test]
    fn test_abort_when_target_removed() {
        let mut f = fixture(NewSection::new(SectionType::Hero), false);
        f.start(Point::ZERO, GestureKind::Move).expect("start");
        f.document.remove_section(f.id);
        assert_eq!(f.drag(Point::new(5.0, 5.0)), DragOutcome::Aborted(f.id));
        assert_eq!(f.machine.state(), GestureState::Idle);
        assert_eq!(f.selection.dragging_section_id(), None);
        assert_eq!(f.drag(Point::new(6.0, 6.0)), DragOutcome::Idle);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut f = fixture(NewSection::new(SectionType::Hero), false);
        f.start(Point::ZERO, GestureKind::Move).expect("start");
        f.drag(Point::new(3.0, 4.0));
        let after_drag = f.geometry();
        assert_eq!(f.machine.stop(&mut f.selection), Some(f.id));
        assert_eq!(f.machine.stop(&mut f.selection), None);
        assert_eq!(f.geometry(), after_drag);
    }
}
