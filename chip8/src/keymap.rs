use std::collections::HashMap;

use clap::ValueEnum;
use sdl2::keyboard::Keycode;

/// Which physical keys stand in for the hex keypad
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// The COSMAC VIP keypad laid over the left 4 alphanumeric columns.
    /// ```text
    /// |1|2|3|C|      |1|2|3|4|
    /// |4|5|6|D|  ->  |Q|W|E|R|
    /// |7|8|9|E|  ->  |A|S|D|F|
    /// |A|0|B|F|      |Z|X|C|V|
    /// ```
    Qwerty,
    /// Each hex digit on the key with the same label, 0-9 and A-F
    Hex,
}

const QWERTY: [(Keycode, u8); 16] = [
    (Keycode::X, 0x0),
    (Keycode::Num1, 0x1),
    (Keycode::Num2, 0x2),
    (Keycode::Num3, 0x3),
    (Keycode::Q, 0x4),
    (Keycode::W, 0x5),
    (Keycode::E, 0x6),
    (Keycode::A, 0x7),
    (Keycode::S, 0x8),
    (Keycode::D, 0x9),
    (Keycode::Z, 0xA),
    (Keycode::C, 0xB),
    (Keycode::Num4, 0xC),
    (Keycode::R, 0xD),
    (Keycode::F, 0xE),
    (Keycode::V, 0xF),
];

const HEX: [(Keycode, u8); 16] = [
    (Keycode::Num0, 0x0),
    (Keycode::Num1, 0x1),
    (Keycode::Num2, 0x2),
    (Keycode::Num3, 0x3),
    (Keycode::Num4, 0x4),
    (Keycode::Num5, 0x5),
    (Keycode::Num6, 0x6),
    (Keycode::Num7, 0x7),
    (Keycode::Num8, 0x8),
    (Keycode::Num9, 0x9),
    (Keycode::A, 0xA),
    (Keycode::B, 0xB),
    (Keycode::C, 0xC),
    (Keycode::D, 0xD),
    (Keycode::E, 0xE),
    (Keycode::F, 0xF),
];

/// # Keymap
/// Translates SDL2 keycodes into the logical keys 0x0..=0xF of the hex keypad.
pub struct Keymap {
    keys: HashMap<Keycode, u8>,
}

impl Keymap {
    pub fn new(layout: Layout) -> Self {
        let table = match layout {
            Layout::Qwerty => QWERTY,
            Layout::Hex => HEX,
        };
        Keymap {
            keys: table.iter().copied().collect(),
        }
    }

    pub fn get(&self, key: Keycode) -> Option<u8> {
        self.keys.get(&key).copied()
    }
}
