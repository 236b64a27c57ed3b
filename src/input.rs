use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::{EventPump, Sdl};

use crate::chip::KEY_COUNT;

/// Physical keys for keypad 0x0..=0xF, in keypad order.
const KEYMAP: [Keycode; KEY_COUNT] = [
    Keycode::Num1,
    Keycode::Num2,
    Keycode::Num3,
    Keycode::Num4,
    Keycode::Q,
    Keycode::W,
    Keycode::E,
    Keycode::R,
    Keycode::A,
    Keycode::S,
    Keycode::D,
    Keycode::F,
    Keycode::Z,
    Keycode::X,
    Keycode::C,
    Keycode::V,
];

#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    BreakDisplay,
    None,
}

/// Keeps the 16 logical key states in sync with the SDL event queue.
pub struct Input {
    pub key_pad: [bool; KEY_COUNT],
    event_pump: EventPump,
}

fn keypad_index(keycode: Keycode) -> Option<usize> {
    KEYMAP.iter().position(|&k| k == keycode)
}

impl Input {
    pub fn new(sdl_context: &Sdl) -> Result<Self, String> {
        Ok(Self {
            event_pump: sdl_context.event_pump()?,
            key_pad: [false; KEY_COUNT],
        })
    }

    /// Drain pending events. Returns `BreakDisplay` on Escape or window close.
    pub fn handle_input(&mut self) -> InputAction {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => return InputAction::BreakDisplay,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return InputAction::BreakDisplay,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = keypad_index(keycode) {
                        self.key_pad[key] = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = keypad_index(keycode) {
                        self.key_pad[key] = false;
                    }
                }
                _ => {}
            }
        }

        InputAction::None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keymap_rows() {
        assert_eq!(keypad_index(Keycode::Num1), Some(0x0));
        assert_eq!(keypad_index(Keycode::R), Some(0x7));
        assert_eq!(keypad_index(Keycode::A), Some(0x8));
        assert_eq!(keypad_index(Keycode::V), Some(0xf));
        assert_eq!(keypad_index(Keycode::P), None);
    }
}
