use crate::constants::KEY_COUNT;
use crate::error::Chip8Error;

/// # Keyboard
/// The pressed status of each key on the hex keypad.
///
/// Only the current state is observable; there is no event queue.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard {
            keys: [false; KEY_COUNT],
        }
    }

    /// Releases every key
    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Set the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the logical key index 0x0..=0xF
    /// * `down` whether the key is now held
    pub fn press(&mut self, key: u8, down: bool) -> Result<(), Chip8Error> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey(key))?;
        *slot = down;
        Ok(())
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool, Chip8Error> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(Chip8Error::InvalidKey(key))
    }

    /// The lowest-numbered key currently held, if any
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_released() {
        let keyboard = Keyboard::new();
        assert!((0..16).all(|key| !keyboard.is_pressed(key).unwrap()));
    }

    #[test]
    fn test_press_and_release() {
        let mut keyboard = Keyboard::new();
        keyboard.press(0x5, true).unwrap();
        assert!(keyboard.is_pressed(0x5).unwrap());
        keyboard.press(0x5, false).unwrap();
        assert!(!keyboard.is_pressed(0x5).unwrap());
    }

    #[test]
    fn test_press_is_idempotent() {
        let mut keyboard = Keyboard::new();
        keyboard.press(0xA, true).unwrap();
        keyboard.press(0xA, true).unwrap();
        assert!(keyboard.is_pressed(0xA).unwrap());
        keyboard.press(0xA, false).unwrap();
        keyboard.press(0xA, false).unwrap();
        assert!(!keyboard.is_pressed(0xA).unwrap());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut keyboard = Keyboard::new();
        keyboard.press(0x5, true).unwrap();
        assert!(!keyboard.is_pressed(0x6).unwrap());
        assert!(!keyboard.is_pressed(0x4).unwrap());
    }

    #[test]
    fn test_rejects_out_of_range_keys() {
        let mut keyboard = Keyboard::new();
        assert!(matches!(
            keyboard.press(0x10, true),
            Err(Chip8Error::InvalidKey(0x10))
        ));
        assert!(matches!(
            keyboard.is_pressed(0xFF),
            Err(Chip8Error::InvalidKey(0xFF))
        ));
    }

    #[test]
    fn test_first_pressed_is_lowest() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.first_pressed(), None);
        keyboard.press(0xC, true).unwrap();
        keyboard.press(0x3, true).unwrap();
        assert_eq!(keyboard.first_pressed(), Some(0x3));
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut keyboard = Keyboard::new();
        keyboard.press(0x0, true).unwrap();
        keyboard.press(0xF, true).unwrap();
        keyboard.reset();
        assert_eq!(keyboard, Keyboard::new());
    }
}
