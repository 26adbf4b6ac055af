//! The press-state machine: maps key and pointer events onto per-note
//! pressed state and the derived set of currently-held notes.
use crate::{
    key::Key,
    layout::{Geometry, Layout},
    note::Note,
};
use std::collections::HashSet;

/// A platform input event, already normalized by the view layer: pointer
/// coordinates are relative to the keyboard area (0..1 on both axes) and
/// key-repeat events have been filtered out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x_01: f32, y_01: f32 },
    PointerUp,
    PointerMove { x_01: f32, y_01: f32, button_held: bool },
    PointerLeave,
}

/// An instruction for the audio sampler, emitted when a note's pressed state
/// actually transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Attack(Note),
    Release(Note),
}

/// Pressed state for every key of a layout.
///
/// Each key owns a single pressed boolean; pressing an already-pressed key
/// or releasing an already-released one is a no-op, so a held physical key
/// can never retrigger its note's attack. The set of held notes is derived
/// here from the individual transitions, which keeps the "any note held"
/// signal correct when several notes are held and one is released.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    layout: Layout,
    geometry: Geometry,
    pressed: Vec<bool>,
    held: HashSet<Note>,
    /// The key currently under the pointer, pressed or not. Moving the
    /// pointer off a key always releases it, which is what makes dragging
    /// across the keyboard with the button held play each key in turn.
    hovered: Option<usize>,
}

impl KeyboardState {
    pub fn new(layout: Layout) -> Self {
        let geometry = layout.geometry();
        let pressed = vec![false; layout.keys().len()];
        Self {
            layout,
            geometry,
            pressed,
            held: HashSet::new(),
            hovered: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn is_pressed(&self, key_index: usize) -> bool {
        self.pressed[key_index]
    }

    /// Whether any note is currently held. Drives the mouth indicator.
    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }

    fn press(&mut self, key_index: usize, commands: &mut Vec<AudioCommand>) {
        if self.pressed[key_index] {
            return;
        }
        self.pressed[key_index] = true;
        let note = self.layout.keys()[key_index].note;
        self.held.insert(note);
        commands.push(AudioCommand::Attack(note));
    }

    fn release(&mut self, key_index: usize, commands: &mut Vec<AudioCommand>) {
        if !self.pressed[key_index] {
            return;
        }
        self.pressed[key_index] = false;
        let note = self.layout.keys()[key_index].note;
        self.held.remove(&note);
        commands.push(AudioCommand::Release(note));
    }

    /// Applies an input event, appending any resulting sampler commands to
    /// `commands`. Events must be applied in the order the platform
    /// delivered them.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        commands: &mut Vec<AudioCommand>,
    ) {
        match event {
            InputEvent::KeyDown(key) => {
                for i in self.bound_key_indices(key) {
                    self.press(i, commands);
                }
            }
            InputEvent::KeyUp(key) => {
                for i in self.bound_key_indices(key) {
                    self.release(i, commands);
                }
            }
            InputEvent::PointerDown { x_01, y_01 } => {
                self.hovered = self.geometry.hit_test(x_01, y_01);
                if let Some(i) = self.hovered {
                    self.press(i, commands);
                }
            }
            InputEvent::PointerUp => {
                if let Some(i) = self.hovered {
                    self.release(i, commands);
                }
            }
            InputEvent::PointerMove {
                x_01,
                y_01,
                button_held,
            } => {
                let now = self.geometry.hit_test(x_01, y_01);
                if now != self.hovered {
                    if let Some(prev) = self.hovered {
                        self.release(prev, commands);
                    }
                    if button_held {
                        if let Some(i) = now {
                            self.press(i, commands);
                        }
                    }
                    self.hovered = now;
                }
            }
            InputEvent::PointerLeave => {
                if let Some(prev) = self.hovered {
                    self.release(prev, commands);
                    self.hovered = None;
                }
            }
        }
    }

    fn bound_key_indices(&self, key: Key) -> Vec<usize> {
        self.layout
            .keys()
            .iter()
            .enumerate()
            .filter(|(_, def)| def.binding.contains(key))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::Layout;
    use AudioCommand::*;

    fn state() -> KeyboardState {
        KeyboardState::new(Layout::reference())
    }

    fn apply(
        state: &mut KeyboardState,
        events: &[InputEvent],
    ) -> Vec<AudioCommand> {
        let mut commands = Vec::new();
        for &event in events {
            state.handle_event(event, &mut commands);
        }
        commands
    }

    fn index_of(state: &KeyboardState, note: Note) -> usize {
        state
            .layout()
            .keys()
            .iter()
            .position(|key| key.note == note)
            .unwrap()
    }

    #[test]
    fn press_release_round_trip() {
        let mut state = state();
        let c4 = index_of(&state, Note::C_4);
        assert!(!state.is_pressed(c4));
        let commands = apply(
            &mut state,
            &[InputEvent::KeyDown(Key::Q), InputEvent::KeyUp(Key::Q)],
        );
        assert!(!state.is_pressed(c4));
        assert_eq!(commands, vec![Attack(Note::C_4), Release(Note::C_4)]);
    }

    #[test]
    fn repeated_key_down_does_not_retrigger() {
        let mut state = state();
        let commands = apply(
            &mut state,
            &[
                InputEvent::KeyDown(Key::Q),
                InputEvent::KeyDown(Key::Q),
                InputEvent::KeyDown(Key::Q),
            ],
        );
        assert_eq!(commands, vec![Attack(Note::C_4)]);
        assert!(state.is_pressed(index_of(&state, Note::C_4)));
    }

    #[test]
    fn redundant_release_is_a_no_op() {
        let mut state = state();
        let commands =
            apply(&mut state, &[InputEvent::KeyUp(Key::Q), InputEvent::KeyUp(Key::Q)]);
        assert_eq!(commands, vec![]);
    }

    #[test]
    fn either_key_of_a_multi_key_binding_presses_and_releases() {
        let mut state = state();
        let c5 = index_of(&state, Note::C_5);
        let commands = apply(&mut state, &[InputEvent::KeyDown(Key::I)]);
        assert_eq!(commands, vec![Attack(Note::C_5)]);
        assert!(state.is_pressed(c5));
        // The second bound key is idempotent while held and releases on
        // key-up just like the first.
        let commands = apply(
            &mut state,
            &[InputEvent::KeyDown(Key::C), InputEvent::KeyUp(Key::C)],
        );
        assert_eq!(commands, vec![Release(Note::C_5)]);
        assert!(!state.is_pressed(c5));
    }

    #[test]
    fn multi_key_binding_does_not_affect_other_controls() {
        let mut state = state();
        apply(&mut state, &[InputEvent::KeyDown(Key::C)]);
        assert!(state.is_pressed(index_of(&state, Note::C_5)));
        for (i, key) in state.layout().keys().iter().enumerate() {
            if key.note != Note::C_5 {
                assert!(!state.is_pressed(i), "{}", key.note);
            }
        }
    }

    #[test]
    fn held_signal_follows_a_single_note() {
        let mut state = state();
        assert!(!state.any_held());
        apply(&mut state, &[InputEvent::KeyDown(Key::Q)]);
        assert!(state.any_held());
        apply(&mut state, &[InputEvent::KeyUp(Key::Q)]);
        assert!(!state.any_held());
    }

    #[test]
    fn held_signal_survives_releasing_one_of_two_notes() {
        let mut state = state();
        apply(
            &mut state,
            &[InputEvent::KeyDown(Key::Q), InputEvent::KeyDown(Key::W)],
        );
        assert!(state.any_held());
        apply(&mut state, &[InputEvent::KeyUp(Key::Q)]);
        assert!(state.any_held());
        apply(&mut state, &[InputEvent::KeyUp(Key::W)]);
        assert!(!state.any_held());
    }

    #[test]
    fn pointer_motion_without_button_does_not_press() {
        let mut state = state();
        let commands = apply(
            &mut state,
            &[InputEvent::PointerMove {
                x_01: 0.01,
                y_01: 0.9,
                button_held: false,
            }],
        );
        assert_eq!(commands, vec![]);
        assert!(!state.any_held());
    }

    #[test]
    fn pointer_motion_with_button_presses_the_entered_key() {
        let mut state = state();
        let commands = apply(
            &mut state,
            &[InputEvent::PointerMove {
                x_01: 0.01,
                y_01: 0.9,
                button_held: true,
            }],
        );
        assert_eq!(commands, vec![Attack(Note::C_4)]);
    }

    #[test]
    fn pointer_down_then_up_presses_and_releases() {
        let mut state = state();
        let commands = apply(
            &mut state,
            &[
                InputEvent::PointerDown {
                    x_01: 0.01,
                    y_01: 0.9,
                },
                InputEvent::PointerUp,
            ],
        );
        assert_eq!(commands, vec![Attack(Note::C_4), Release(Note::C_4)]);
    }

    #[test]
    fn dragging_across_keys_plays_each_in_turn() {
        let mut state = state();
        let white_width = 1.0 / 15.0;
        let commands = apply(
            &mut state,
            &[
                InputEvent::PointerDown {
                    x_01: 0.01,
                    y_01: 0.9,
                },
                InputEvent::PointerMove {
                    x_01: white_width + 0.01,
                    y_01: 0.9,
                    button_held: true,
                },
            ],
        );
        assert_eq!(
            commands,
            vec![
                Attack(Note::C_4),
                Release(Note::C_4),
                Attack(Note::D_4)
            ]
        );
    }

    #[test]
    fn pointer_leaving_a_key_releases_it_even_when_pressed_by_keyboard() {
        let mut state = state();
        let commands = apply(
            &mut state,
            &[
                InputEvent::PointerMove {
                    x_01: 0.01,
                    y_01: 0.9,
                    button_held: false,
                },
                InputEvent::KeyDown(Key::Q),
                InputEvent::PointerLeave,
            ],
        );
        assert_eq!(commands, vec![Attack(Note::C_4), Release(Note::C_4)]);
        assert!(!state.any_held());
    }

    #[test]
    fn pointer_leave_with_nothing_hovered_is_a_no_op() {
        let mut state = state();
        let commands = apply(&mut state, &[InputEvent::PointerLeave]);
        assert_eq!(commands, vec![]);
    }
}
