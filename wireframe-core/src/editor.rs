//! The editor: one document, its viewport, selection and gesture machine.
//!
//! Every read and write the rendering adapter and property editors need goes
//! through [`Editor`]. Successful mutations notify subscribers; no-ops don't.
//!
//! ```
//! use wireframe_core::{Editor, EditorConfig, GestureKind, NewSection, Point, SectionType};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! let hero = editor.add_section(NewSection::new(SectionType::Hero).at(100.0, 60.0));
//!
//! assert!(editor.start_drag(hero, Point::new(10.0, 10.0), GestureKind::Move));
//! editor.drag_update(Point::new(50.0, 30.0));
//! editor.stop_drag();
//!
//! let section = editor.get_section(hero).unwrap();
//! assert_eq!(section.geometry.position, Point::new(140.0, 80.0));
//! ```

use crate::observer::Observers;
use crate::viewport::PanDrag;
use crate::{
    Change, ChangeCallback, Document, DocumentSnapshot, DragOutcome, EditorConfig,
    GeometryUpdate, GestureKind, GestureMachine, GestureSession, GestureState, NewSection, Point,
    Section, SectionContent, SectionId, Selection, StartRefused, SubscriptionId, Viewport,
};

/// An open wireframe document and all interaction state around it.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    document: Document,
    viewport: Viewport,
    selection: Selection,
    gesture: GestureMachine,
    pub(crate) pan_drag: Option<PanDrag>,
    /// Pointer that started the in-flight gesture or pan drag.
    pub(crate) pointer_owner: Option<u32>,
    observers: Observers,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(config, Document::new())
    }

    /// Create an editor around an existing document.
    ///
    /// Out-of-range config values are repaired, see [`EditorConfig::sanitized`].
    #[must_use]
    pub fn with_document(config: EditorConfig, document: Document) -> Self {
        let config = config.sanitized();
        Self {
            viewport: Viewport::new(&config),
            gesture: GestureMachine::new(&config),
            config,
            document,
            selection: Selection::default(),
            pan_drag: None,
            pointer_owner: None,
            observers: Observers::default(),
        }
    }

    /// Drop every section and return viewport, selection and gestures to their initial state.
    ///
    /// Subscribers stay registered.
    pub fn reset(&mut self) {
        self.replace_document(Document::new(), None);
    }

    fn replace_document(&mut self, document: Document, viewport: Option<&Viewport>) {
        self.document = document;
        self.viewport = Viewport::new(&self.config);
        if let Some(stored) = viewport {
            self.viewport.restore(stored);
        }
        self.selection = Selection::default();
        self.gesture = GestureMachine::new(&self.config);
        self.pan_drag = None;
        self.pointer_owner = None;
        tracing::debug!("Loaded document with {} sections", self.document.len());
        self.notify(Change::DocumentLoaded);
    }

    /// Replace the document with a snapshot, resetting all interaction state.
    pub fn load_snapshot(&mut self, snapshot: DocumentSnapshot) {
        let (document, viewport) = snapshot.into_parts();
        self.replace_document(document, Some(&viewport));
    }

    /// Capture the document and viewport as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::capture(&self.document, &self.viewport)
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Register a change callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change) + 'static,
    {
        let callback: ChangeCallback = Box::new(callback);
        self.observers.subscribe(callback)
    }

    /// Remove a change callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn notify(&mut self, change: Change) {
        self.observers.notify(&change);
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get a section by id.
    #[must_use]
    pub fn get_section(&self, id: SectionId) -> Option<&Section> {
        self.document.get_section(id)
    }

    /// All sections, bottom of the stack first.
    #[must_use]
    pub fn sections_by_z(&self) -> Vec<&Section> {
        self.document.sections_by_z()
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Topmost visible section under a screen point.
    #[must_use]
    pub fn section_at_screen(&self, point: Point) -> Option<SectionId> {
        self.document
            .section_at(self.viewport.screen_to_canvas(point))
    }

    // -----------------------------------------------------------------------
    // Document operations
    // -----------------------------------------------------------------------

    /// Add a section on top of the stack.
    pub fn add_section(&mut self, new: NewSection) -> SectionId {
        let id = self.document.add_section(new);
        self.notify(Change::SectionAdded(id));
        id
    }

    /// Remove a section, clearing the selection if it was selected.
    ///
    /// An in-flight gesture on the section is dropped at its next update.
    pub fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        let removed = self.document.remove_section(id)?;
        self.notify(Change::SectionRemoved(id));
        if self.selection.is_active(id) {
            self.set_selection(None);
        }
        Some(removed)
    }

    /// Apply a geometry write. Unknown ids are silently ignored.
    ///
    /// Returns `true` if the geometry changed.
    pub fn update_section_geometry(&mut self, id: SectionId, update: GeometryUpdate) -> bool {
        let changed = self.document.update_section_geometry(id, update);
        if changed {
            self.notify(Change::GeometryChanged(id));
        }
        changed
    }

    /// Move a section within the z-ordered list and renumber densely.
    pub fn reorder_sections(&mut self, from_index: usize, to_index: usize) -> bool {
        let changed = self.document.reorder_sections(from_index, to_index);
        if changed {
            self.notify(Change::Reordered);
        }
        changed
    }

    /// Move a section to the top of the stack.
    pub fn bring_to_front(&mut self, id: SectionId) -> bool {
        let changed = self.document.bring_to_front(id);
        if changed {
            self.notify(Change::Reordered);
        }
        changed
    }

    /// Move a section to the bottom of the stack.
    pub fn send_to_back(&mut self, id: SectionId) -> bool {
        let changed = self.document.send_to_back(id);
        if changed {
            self.notify(Change::Reordered);
        }
        changed
    }

    /// Duplicate a section onto the top of the stack, exactly over the original.
    pub fn duplicate_section(&mut self, id: SectionId) -> Option<SectionId> {
        let copy = self.document.duplicate_section(id)?;
        self.notify(Change::SectionAdded(copy));
        Some(copy)
    }

    /// Property-editor write path for a section's content.
    pub fn update_section_content<F>(&mut self, id: SectionId, f: F) -> bool
    where
        F: FnOnce(&mut SectionContent),
    {
        let applied = self.document.update_section_content(id, f);
        if applied {
            self.notify(Change::ContentChanged(id));
        }
        applied
    }

    /// Lock or unlock a section.
    pub fn set_locked(&mut self, id: SectionId, locked: bool) -> bool {
        let changed = self.document.set_locked(id, locked);
        if changed {
            self.notify(Change::FlagsChanged(id));
        }
        changed
    }

    /// Hide or show a section. Hiding the selected section clears the selection.
    pub fn set_hidden(&mut self, id: SectionId, hidden: bool) -> bool {
        let changed = self.document.set_hidden(id, hidden);
        if changed {
            self.notify(Change::FlagsChanged(id));
            if hidden && self.selection.is_active(id) {
                self.set_selection(None);
            }
        }
        changed
    }

    /// Set or clear the presentation highlight.
    pub fn set_highlighted(&mut self, id: SectionId, highlighted: bool) -> bool {
        let changed = self.document.set_highlighted(id, highlighted);
        if changed {
            self.notify(Change::FlagsChanged(id));
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Select a section, or clear the selection with `None`.
    ///
    /// Unknown and hidden sections are refused and leave the selection as is.
    pub fn select_section(&mut self, id: Option<SectionId>) -> bool {
        if let Some(id) = id {
            match self.document.get_section(id) {
                Some(section) if !section.hidden => {}
                _ => return false,
            }
        }
        self.set_selection(id);
        true
    }

    fn set_selection(&mut self, id: Option<SectionId>) {
        if self.selection.set_active(id) {
            self.notify(Change::SelectionChanged(id));
        }
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    fn viewport_op(&mut self, op: impl FnOnce(&mut Viewport) -> bool) -> bool {
        let changed = op(&mut self.viewport);
        if changed {
            self.notify(Change::ViewportChanged);
        }
        changed
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) -> bool {
        self.viewport_op(Viewport::zoom_in)
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) -> bool {
        self.viewport_op(Viewport::zoom_out)
    }

    /// Zoom by `factor` around a screen point.
    pub fn zoom_at(&mut self, factor: f32, anchor: Point) -> bool {
        self.viewport_op(|v| v.zoom_at(factor, anchor))
    }

    /// Back to 100% with no pan.
    pub fn reset_zoom(&mut self) -> bool {
        self.viewport_op(Viewport::reset_zoom)
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Point) -> bool {
        self.viewport_op(|v| v.pan_by(delta))
    }

    /// Flip grid visibility.
    pub fn toggle_grid(&mut self) {
        self.viewport_op(|v| {
            v.toggle_grid();
            true
        });
    }

    /// Flip grid snapping. Gestures already in flight keep the setting they started with.
    pub fn toggle_snap_to_grid(&mut self) {
        self.viewport_op(|v| {
            v.toggle_snap_to_grid();
            true
        });
    }

    /// Change the grid size.
    pub fn set_grid_size(&mut self, size: f32) -> bool {
        self.viewport_op(|v| v.set_grid_size(size))
    }

    /// Whether pointer drags pan the viewport.
    #[must_use]
    pub fn is_pan_mode_active(&self) -> bool {
        self.viewport.is_pan_mode_active()
    }

    /// Enter or leave pan mode (space bar held).
    ///
    /// Leaving pan mode also ends any viewport pan drag.
    pub fn set_pan_mode(&mut self, active: bool) -> bool {
        if !active {
            self.pan_drag = None;
        }
        self.viewport_op(|v| v.set_pan_mode(active))
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Current gesture state.
    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    /// The in-flight gesture, if any.
    #[must_use]
    pub fn gesture(&self) -> Option<&GestureSession> {
        self.gesture.session()
    }

    /// Section under the in-flight gesture.
    #[must_use]
    pub fn dragging_section_id(&self) -> Option<SectionId> {
        self.selection.dragging_section_id()
    }

    /// Start a gesture, reporting why it was refused.
    ///
    /// # Errors
    ///
    /// See [`StartRefused`]. A refusal changes nothing.
    pub fn try_start_drag(
        &mut self,
        id: SectionId,
        pointer: Point,
        kind: GestureKind,
    ) -> Result<(), StartRefused> {
        let state = self.gesture.start(
            &self.document,
            &self.viewport,
            &mut self.selection,
            id,
            pointer,
            kind,
        )?;
        self.notify(Change::GestureStarted { section: id, state });
        Ok(())
    }

    /// Start a gesture. Returns `false` if it was refused.
    pub fn start_drag(&mut self, id: SectionId, pointer: Point, kind: GestureKind) -> bool {
        match self.try_start_drag(id, pointer, kind) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!("Drag refused: {reason}");
                false
            }
        }
    }

    /// Feed a pointer move to the in-flight gesture.
    ///
    /// Returns `true` if the target's geometry changed. If the target was
    /// removed (or locked or hidden) since the gesture began, the gesture is
    /// silently dropped.
    pub fn drag_update(&mut self, pointer: Point) -> bool {
        match self.gesture.update(
            &mut self.document,
            &self.viewport,
            &mut self.selection,
            pointer,
        ) {
            DragOutcome::Applied(id) => {
                self.notify(Change::GeometryChanged(id));
                true
            }
            DragOutcome::Aborted(id) => {
                self.notify(Change::GestureEnded {
                    section: id,
                    aborted: true,
                });
                false
            }
            DragOutcome::Unchanged(_) | DragOutcome::Idle => false,
        }
    }

    /// End the in-flight gesture. Calling it again does nothing.
    pub fn stop_drag(&mut self) -> bool {
        match self.gesture.stop(&mut self.selection) {
            Some(id) => {
                self.notify(Change::GestureEnded {
                    section: id,
                    aborted: false,
                });
                true
            }
            None => false,
        }
    }

    /// Move the active section by a canvas-space delta, outside of any gesture.
    ///
    /// Locked sections and an in-flight gesture refuse the nudge.
    pub fn nudge_selected(&mut self, delta: Point) -> bool {
        if self.gesture.state() != GestureState::Idle {
            return false;
        }
        let Some(id) = self.selection.active_section_id() else {
            return false;
        };
        let Some(section) = self.document.get_section(id) else {
            return false;
        };
        if section.locked {
            return false;
        }
        let position = section.geometry.position + delta;
        self.update_section_geometry(id, GeometryUpdate::Position { position })
    }
}
