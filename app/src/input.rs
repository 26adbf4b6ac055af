use clavier_keyboard::{InputEvent, Key};
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Scancode,
};

pub fn sdl2_scancode_to_key(scancode: Scancode) -> Option<Key> {
    let key = match scancode {
        Scancode::A => Key::A,
        Scancode::B => Key::B,
        Scancode::C => Key::C,
        Scancode::D => Key::D,
        Scancode::E => Key::E,
        Scancode::F => Key::F,
        Scancode::G => Key::G,
        Scancode::H => Key::H,
        Scancode::I => Key::I,
        Scancode::J => Key::J,
        Scancode::K => Key::K,
        Scancode::L => Key::L,
        Scancode::M => Key::M,
        Scancode::N => Key::N,
        Scancode::O => Key::O,
        Scancode::P => Key::P,
        Scancode::Q => Key::Q,
        Scancode::R => Key::R,
        Scancode::S => Key::S,
        Scancode::T => Key::T,
        Scancode::U => Key::U,
        Scancode::V => Key::V,
        Scancode::W => Key::W,
        Scancode::X => Key::X,
        Scancode::Y => Key::Y,
        Scancode::Z => Key::Z,
        Scancode::Num0 => Key::N0,
        Scancode::Num1 => Key::N1,
        Scancode::Num2 => Key::N2,
        Scancode::Num3 => Key::N3,
        Scancode::Num4 => Key::N4,
        Scancode::Num5 => Key::N5,
        Scancode::Num6 => Key::N6,
        Scancode::Num7 => Key::N7,
        Scancode::Num8 => Key::N8,
        Scancode::Num9 => Key::N9,
        Scancode::Comma => Key::Comma,
        Scancode::Period => Key::Period,
        Scancode::Slash => Key::Slash,
        _ => return None,
    };
    Some(key)
}

/// Translates an sdl event into a keyboard-state event. Pointer positions
/// are passed through `normalize`, which maps window pixels into the
/// keyboard area's unit coordinates. Window-management events (quit, move)
/// are handled separately by the main loop.
pub fn translate_event(
    event: &Event,
    normalize: impl Fn(i32, i32) -> (f32, f32),
) -> Option<InputEvent> {
    match event {
        Event::KeyDown {
            scancode: Some(scancode),
            repeat: false,
            ..
        } => sdl2_scancode_to_key(*scancode).map(InputEvent::KeyDown),
        Event::KeyUp {
            scancode: Some(scancode),
            repeat: false,
            ..
        } => sdl2_scancode_to_key(*scancode).map(InputEvent::KeyUp),
        // Any mouse button plays; the hardware doesn't distinguish fingers.
        Event::MouseButtonDown { x, y, .. } => {
            let (x_01, y_01) = normalize(*x, *y);
            Some(InputEvent::PointerDown { x_01, y_01 })
        }
        Event::MouseButtonUp { .. } => Some(InputEvent::PointerUp),
        Event::MouseMotion {
            x, y, mousestate, ..
        } => {
            let (x_01, y_01) = normalize(*x, *y);
            Some(InputEvent::PointerMove {
                x_01,
                y_01,
                button_held: mousestate
                    .pressed_mouse_buttons()
                    .next()
                    .is_some(),
            })
        }
        Event::Window {
            win_event: WindowEvent::Leave,
            ..
        } => Some(InputEvent::PointerLeave),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sdl2::mouse::MouseButton;

    #[test]
    fn repeated_key_down_is_ignored() {
        let event = Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: None,
            scancode: Some(Scancode::Q),
            keymod: sdl2::keyboard::Mod::empty(),
            repeat: true,
        };
        assert!(translate_event(&event, |_, _| (0.0, 0.0)).is_none());
    }

    #[test]
    fn any_mouse_button_presses() {
        let event = Event::MouseButtonDown {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mouse_btn: MouseButton::Right,
            clicks: 1,
            x: 5,
            y: 5,
        };
        assert!(matches!(
            translate_event(&event, |_, _| (0.5, 0.5)),
            Some(InputEvent::PointerDown { .. })
        ));
    }

    #[test]
    fn motion_with_any_button_down_counts_as_held() {
        // Mask bit for the right button in the sdl button state.
        let right_held = sdl2::mouse::MouseState::from_sdl_state(1 << 2);
        let event = Event::MouseMotion {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mousestate: right_held,
            x: 5,
            y: 5,
            xrel: 0,
            yrel: 0,
        };
        assert!(matches!(
            translate_event(&event, |_, _| (0.5, 0.5)),
            Some(InputEvent::PointerMove {
                button_held: true,
                ..
            })
        ));
    }

    #[test]
    fn letter_and_punctuation_scancodes_map_to_keys() {
        assert_eq!(sdl2_scancode_to_key(Scancode::Q), Some(Key::Q));
        assert_eq!(sdl2_scancode_to_key(Scancode::Comma), Some(Key::Comma));
        assert_eq!(sdl2_scancode_to_key(Scancode::Slash), Some(Key::Slash));
        assert_eq!(sdl2_scancode_to_key(Scancode::Escape), None);
    }
}
