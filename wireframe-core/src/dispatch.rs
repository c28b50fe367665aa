//! Maps raw input events onto editor operations.

use crate::event::{KeyModifiers, PointerEvent, PointerPhase};
use crate::viewport::PanDrag;
use crate::{Editor, GestureState, InputEvent, Point};

impl Editor {
    /// Apply one input event. Returns `true` if anything observable changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Wheel {
                x,
                y,
                delta_x,
                delta_y,
                modifiers,
            } => self.handle_wheel(Point::new(*x, *y), Point::new(*delta_x, *delta_y), *modifiers),
            InputEvent::Key {
                key,
                pressed,
                modifiers,
            } => self.handle_key(key, *pressed, *modifiers),
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let busy = self.pan_drag.is_some() || self.gesture_state() != GestureState::Idle;
        if !busy {
            self.pointer_owner = None;
        }
        let position = event.position();
        match event.phase {
            PointerPhase::Down if busy || event.button != PointerEvent::PRIMARY_BUTTON => {
                tracing::trace!(
                    "Ignoring pointer {} down (button {}, busy {busy})",
                    event.pointer_id,
                    event.button
                );
                false
            }
            PointerPhase::Down if self.is_pan_mode_active() => {
                self.pan_drag = Some(PanDrag::start(position, self.viewport()));
                self.pointer_owner = Some(event.pointer_id);
                false
            }
            PointerPhase::Down => match event.target {
                Some(target) => {
                    let selected = self.select_section(Some(target.section));
                    let started = selected
                        && self.start_drag(
                            target.section,
                            position,
                            target.handle.gesture(event.modifiers),
                        );
                    if started {
                        self.pointer_owner = Some(event.pointer_id);
                    }
                    selected || started
                }
                None => {
                    let had_selection = self.selection().active_section_id().is_some();
                    self.select_section(None);
                    had_selection
                }
            },
            _ if !self.owns_pointer(event.pointer_id) => {
                tracing::trace!(
                    "Ignoring pointer {} while another owns the gesture",
                    event.pointer_id
                );
                false
            }
            PointerPhase::Move => match self.pan_drag {
                Some(drag) => {
                    let pan = drag.pan_for(position);
                    let delta = pan - self.viewport().pan;
                    self.pan(delta)
                }
                None => self.drag_update(position),
            },
            PointerPhase::Up | PointerPhase::Cancel => {
                self.pointer_owner = None;
                if self.pan_drag.take().is_some() {
                    return false;
                }
                self.stop_drag()
            }
        }
    }

    /// Gestures started through the API have no owner and accept any pointer.
    fn owns_pointer(&self, pointer_id: u32) -> bool {
        !matches!(self.pointer_owner, Some(owner) if owner != pointer_id)
    }

    fn handle_wheel(&mut self, anchor: Point, delta: Point, modifiers: KeyModifiers) -> bool {
        if modifiers.command() {
            let factor = (-delta.y * self.config().wheel_zoom_sensitivity).exp();
            return self.zoom_at(factor, anchor);
        }
        let delta = if modifiers.shift && delta.x == 0.0 {
            Point::new(delta.y, 0.0)
        } else {
            delta
        };
        self.pan(Point::new(-delta.x, -delta.y))
    }

    fn handle_key(&mut self, key: &str, pressed: bool, modifiers: KeyModifiers) -> bool {
        if key == " " || key == "Space" {
            return self.set_pan_mode(pressed);
        }
        if !pressed {
            return false;
        }

        if modifiers.command() {
            return match key {
                "d" | "D" => self
                    .selection()
                    .active_section_id()
                    .and_then(|id| self.duplicate_section(id))
                    .map(|copy| self.select_section(Some(copy)))
                    .is_some(),
                "=" | "+" => self.zoom_in(),
                "-" => self.zoom_out(),
                "0" => self.reset_zoom(),
                _ => false,
            };
        }

        match key {
            "Delete" | "Backspace" => match self.selection().active_section_id() {
                Some(id) if self.dragging_section_id().is_none() => {
                    self.remove_section(id).is_some()
                }
                _ => false,
            },
            "Escape" => {
                let stopped = self.stop_drag();
                let had_selection = self.selection().active_section_id().is_some();
                self.select_section(None);
                stopped || had_selection
            }
            "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" => {
                let step = if modifiers.shift {
                    self.viewport().grid.size
                } else {
                    self.config().nudge_step
                };
                let delta = match key {
                    "ArrowLeft" => Point::new(-step, 0.0),
                    "ArrowRight" => Point::new(step, 0.0),
                    "ArrowUp" => Point::new(0.0, -step),
                    _ => Point::new(0.0, step),
                };
                self.nudge_selected(delta)
            }
            "g" => {
                self.toggle_grid();
                true
            }
            "G" => {
                self.toggle_snap_to_grid();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::event::HandleTarget;
    use crate::geometry::HandleDirection;
    use crate::{EditorConfig, NewSection, SectionId, SectionType};

    fn editor_with_hero() -> (Editor, SectionId) {
        let mut editor = Editor::new(EditorConfig::default());
        let id = editor.add_section(
            NewSection::new(SectionType::Hero)
                .at(100.0, 100.0)
                .sized(200.0, 100.0),
        );
        (editor, id)
    }

    fn pointer(phase: PointerPhase, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(phase, x, y)
    }

    #[test]
    fn test_body_drag_moves_and_selects() {
        let (mut editor, id) = editor_with_hero();
        editor.handle_event(&pointer(PointerPhase::Down, 150.0, 150.0).on(id, HandleTarget::Body).into());
        assert_eq!(editor.selection().active_section_id(), Some(id));
        assert_eq!(editor.gesture_state(), GestureState::Moving);

        editor.handle_event(&pointer(PointerPhase::Move, 190.0, 170.0).into());
        editor.handle_event(&pointer(PointerPhase::Up, 190.0, 170.0).into());

        assert_eq!(editor.gesture_state(), GestureState::Idle);
        let section = editor.get_section(id).expect("exists");
        assert_eq!(section.geometry.position, Point::new(140.0, 120.0));
    }

    #[test]
    fn test_shift_resize_locks_aspect() {
        let (mut editor, id) = editor_with_hero();
        let down = pointer(PointerPhase::Down, 300.0, 200.0)
            .on(
                id,
                HandleTarget::Resize {
                    direction: HandleDirection::Se,
                },
            )
            .with_modifiers(KeyModifiers::SHIFT);
        editor.handle_event(&down.into());
        editor.handle_event(&pointer(PointerPhase::Move, 400.0, 210.0).into());
        let size = editor.get_section(id).expect("exists").geometry.size;
        assert_eq!(size.width, 300.0);
        assert_eq!(size.height, 150.0);
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let (mut editor, id) = editor_with_hero();
        editor.select_section(Some(id));
        assert!(editor.handle_event(&pointer(PointerPhase::Down, 5.0, 5.0).into()));
        assert_eq!(editor.selection().active_section_id(), None);
        assert!(!editor.handle_event(&pointer(PointerPhase::Down, 5.0, 5.0).into()));
    }

    #[test]
    fn test_space_drag_pans_viewport() {
        let (mut editor, id) = editor_with_hero();
        editor.handle_event(&InputEvent::key_down(" ", KeyModifiers::default()));
        assert!(editor.is_pan_mode_active());

        editor.handle_event(&pointer(PointerPhase::Down, 10.0, 10.0).on(id, HandleTarget::Body).into());
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        editor.handle_event(&pointer(PointerPhase::Move, 40.0, 25.0).into());
        editor.handle_event(&pointer(PointerPhase::Move, 60.0, 30.0).into());
        editor.handle_event(&pointer(PointerPhase::Up, 60.0, 30.0).into());
        assert_eq!(editor.viewport().pan, Point::new(50.0, 20.0));

        editor.handle_event(&InputEvent::key_up(" "));
        assert!(!editor.is_pan_mode_active());
        assert_eq!(
            editor.get_section(id).expect("exists").geometry.position,
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn test_ctrl_wheel_zooms_around_pointer() {
        let (mut editor, _) = editor_with_hero();
        let anchor = Point::new(320.0, 240.0);
        let before = editor.viewport().screen_to_canvas(anchor);
        editor.handle_event(&InputEvent::Wheel {
            x: anchor.x,
            y: anchor.y,
            delta_x: 0.0,
            delta_y: -100.0,
            modifiers: KeyModifiers::CTRL,
        });
        assert!(editor.viewport().zoom > 1.0);
        let after = editor.viewport().screen_to_canvas(anchor);
        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);
    }

    #[test]
    fn test_plain_wheel_pans() {
        let (mut editor, _) = editor_with_hero();
        editor.handle_event(&InputEvent::Wheel {
            x: 0.0,
            y: 0.0,
            delta_x: 0.0,
            delta_y: 30.0,
            modifiers: KeyModifiers::default(),
        });
        assert_eq!(editor.viewport().pan, Point::new(0.0, -30.0));
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let (mut editor, id) = editor_with_hero();
        editor.select_section(Some(id));

        editor.handle_event(&InputEvent::key_down("ArrowRight", KeyModifiers::default()));
        editor.handle_event(&InputEvent::key_down("ArrowDown", KeyModifiers::SHIFT));
        assert_eq!(
            editor.get_section(id).expect("exists").geometry.position,
            Point::new(101.0, 120.0)
        );

        assert!(editor.handle_event(&InputEvent::key_down("d", KeyModifiers::CTRL)));
        assert_eq!(editor.document().len(), 2);
        let copy = editor.selection().active_section_id().expect("copy selected");
        assert_ne!(copy, id);

        editor.handle_event(&InputEvent::key_down("Delete", KeyModifiers::default()));
        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.selection().active_section_id(), None);

        editor.handle_event(&InputEvent::key_down("=", KeyModifiers::CTRL));
        assert!(editor.viewport().zoom > 1.0);
        editor.handle_event(&InputEvent::key_down("0", KeyModifiers::CTRL));
        assert_eq!(editor.viewport().zoom, 1.0);

        editor.handle_event(&InputEvent::key_down("g", KeyModifiers::default()));
        assert!(!editor.viewport().grid.enabled);
        editor.handle_event(&InputEvent::key_down("G", KeyModifiers::SHIFT));
        assert!(!editor.viewport().grid.snap_enabled);
    }

    #[test]
    fn test_escape_ends_gesture_and_clears_selection() {
        let (mut editor, id) = editor_with_hero();
        editor.handle_event(&pointer(PointerPhase::Down, 150.0, 150.0).on(id, HandleTarget::Rotate).into());
        assert_eq!(editor.gesture_state(), GestureState::Rotating);
        assert!(editor.handle_event(&InputEvent::key_down("Escape", KeyModifiers::default())));
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.selection().active_section_id(), None);
    }

    #[test]
    fn test_second_pointer_cannot_steal_gesture() {
        let (mut editor, id) = editor_with_hero();
        let other = editor.add_section(NewSection::new(SectionType::Cta).at(400.0, 400.0));
        editor.handle_event(&pointer(PointerPhase::Down, 150.0, 150.0).on(id, HandleTarget::Body).into());

        let touch = |phase, x, y| InputEvent::from(pointer(phase, x, y).with_pointer(7));
        assert!(!editor.handle_event(&InputEvent::from(
            pointer(PointerPhase::Down, 410.0, 410.0).with_pointer(7).on(other, HandleTarget::Body)
        )));
        assert!(!editor.handle_event(&touch(PointerPhase::Move, 500.0, 500.0)));
        assert!(!editor.handle_event(&touch(PointerPhase::Up, 500.0, 500.0)));
        assert_eq!(editor.selection().active_section_id(), Some(id));
        assert_eq!(editor.gesture_state(), GestureState::Moving);

        editor.handle_event(&pointer(PointerPhase::Move, 190.0, 170.0).into());
        editor.handle_event(&pointer(PointerPhase::Up, 190.0, 170.0).into());
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(
            editor.get_section(id).expect("exists").geometry.position,
            Point::new(140.0, 120.0)
        );
        assert_eq!(
            editor.get_section(other).expect("exists").geometry.position,
            Point::new(400.0, 400.0)
        );
    }

    #[test]
    fn test_pan_drag_owned_by_its_pointer() {
        let (mut editor, _) = editor_with_hero();
        editor.handle_event(&InputEvent::key_down(" ", KeyModifiers::default()));
        editor.handle_event(&pointer(PointerPhase::Down, 10.0, 10.0).with_pointer(1).into());
        assert!(!editor.handle_event(&pointer(PointerPhase::Move, 90.0, 90.0).with_pointer(2).into()));
        assert!(!editor.handle_event(&pointer(PointerPhase::Up, 90.0, 90.0).with_pointer(2).into()));
        assert!(editor.handle_event(&pointer(PointerPhase::Move, 30.0, 10.0).with_pointer(1).into()));
        assert_eq!(editor.viewport().pan, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_secondary_button_starts_nothing() {
        let (mut editor, id) = editor_with_hero();
        let right_click = pointer(PointerPhase::Down, 150.0, 150.0)
            .on(id, HandleTarget::Body)
            .with_button(2);
        assert!(!editor.handle_event(&right_click.into()));
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.selection().active_section_id(), None);

        editor.handle_event(&pointer(PointerPhase::Move, 190.0, 170.0).into());
        assert_eq!(
            editor.get_section(id).expect("exists").geometry.position,
            Point::new(100.0, 100.0)
        );
    }
}
