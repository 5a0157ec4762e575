use std::io::Read;

use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::frame_buffer::FrameBuffer;
use crate::instruction;
use crate::state::{Mode, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`: registers, memory, stack, timers, frame buffer and keypad
///  - `rng`, the source of random bytes for `Cxkk`
///
/// Supplies interfaces for:
/// - resetting the machine and loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Nothing here keeps time. The host decides how many cycles to run per timer
/// tick and how often to tick.
pub struct Chip8 {
    state: State,
    rng: Box<dyn RngCore>,
}

impl Chip8 {
    /// A machine whose random bytes come from an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose random bytes are reproducible for a given `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        Chip8 {
            state: State::new(),
            rng: Box::new(rng),
        }
    }

    /// Returns the machine to its power-on state.
    ///
    /// Memory is zeroed apart from the sprite sheet, registers, stack and timers
    /// are cleared, the display goes dark and every key is released. Call this
    /// before each `load_rom`.
    pub fn reset(&mut self) {
        debug!("resetting machine");
        self.state = State::new();
    }

    /// Load a rom from a source file
    ///
    /// The whole rom is read and validated before memory is touched, so a failed
    /// load leaves memory as it was.
    ///
    /// # Arguments
    /// * `reader` a reader that yields the raw rom bytes
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_rom_bytes(&rom)
    }

    /// Copies `rom` into memory at 0x200
    pub fn load_rom_bytes(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.state.write(PROGRAM_START, rom)?;
        debug!("loaded {} byte rom", rom.len());
        Ok(())
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the logical key 0x0..=0xF that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.state.keyboard.press(key, true)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the logical key 0x0..=0xF that was released
    pub fn key_release(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.state.keyboard.press(key, false)
    }

    /// Advances the CPU by a single cycle
    /// - if awaiting a keypress, checks the keypad once and otherwise does nothing
    /// - gets and executes the next opcode
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        match self.state.mode {
            Mode::AwaitingKey { register } => {
                if let Some(key) = self.state.keyboard.first_pressed() {
                    debug!("key {:X} stored in V{:X}", key, register);
                    self.state.v[register] = key;
                    self.state.mode = Mode::Running;
                }
                Ok(())
            }
            Mode::Running => {
                let op = self.state.fetch()?;
                instruction::execute(op, &mut self.state, &mut *self.rng)
            }
        }
    }

    /// Counts both timers down by one, stopping at zero
    pub fn decrement_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Whether the sound timer is still running
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if it changed since the last call
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SPRITE_SHEET;

    #[test]
    fn test_cycles_while_no_register_needs_key() {
        let mut chip8 = Chip8::with_seed(0);
        let starting_pc = chip8.state.pc;
        // insert a cls opcode so we don't run into zeroed memory
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x00, 0xE0]);
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.pc, starting_pc + 0x2);
    }

    #[test]
    fn test_doesnt_cycle_while_register_needs_key() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xF1, 0x0A]);
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.mode, Mode::AwaitingKey { register: 0x1 });
        for _ in 0..5 {
            chip8.cycle().unwrap();
        }
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v[0x1], 0x0);
    }

    #[test]
    fn test_captures_key_presses() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.state.mode = Mode::AwaitingKey { register: 0x1 };
        chip8.key_press(0xE).unwrap();
        chip8.key_press(0xB).unwrap();
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.mode, Mode::Running);
        assert_eq!(chip8.state.v[0x1], 0xB);
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_timers_keep_running_while_awaiting_key() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.state.mode = Mode::AwaitingKey { register: 0x0 };
        chip8.state.delay_timer = 2;
        chip8.cycle().unwrap();
        chip8.decrement_timers();
        assert_eq!(chip8.state.delay_timer, 1);
    }

    #[test]
    fn test_decrements_timers_to_zero() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.state.delay_timer = 1;
        chip8.state.sound_timer = 2;
        assert!(chip8.sound_active());
        chip8.decrement_timers();
        assert_eq!(chip8.state.delay_timer, 0);
        assert_eq!(chip8.state.sound_timer, 1);
        chip8.decrement_timers();
        chip8.decrement_timers();
        assert_eq!(chip8.state.delay_timer, 0);
        assert_eq!(chip8.state.sound_timer, 0);
        assert!(!chip8.sound_active());
    }

    #[test]
    fn test_loads_rom_at_program_start() {
        let mut chip8 = Chip8::with_seed(0);
        let mut rom: &[u8] = &[0x12, 0x34, 0x56];
        chip8.load_rom(&mut rom).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x203], [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_loads_largest_rom() {
        let mut chip8 = Chip8::with_seed(0);
        let rom = vec![0xAA; MAX_ROM_SIZE];
        chip8.load_rom_bytes(&rom).unwrap();
        assert_eq!(chip8.state.memory[0xFFF], 0xAA);
    }

    #[test]
    fn test_rejects_oversized_rom_without_touching_memory() {
        let mut chip8 = Chip8::with_seed(0);
        let rom = vec![0xAA; MAX_ROM_SIZE + 1];
        assert!(matches!(
            chip8.load_rom_bytes(&rom),
            Err(Chip8Error::RomTooLarge { size: 3585, max: 3584 })
        ));
        assert!(chip8.state.memory[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_take_frame_clears_draw_flag() {
        let mut chip8 = Chip8::with_seed(0);
        assert!(chip8.take_frame().is_none());
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xD0, 0x05]);
        chip8.cycle().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.load_rom_bytes(&[0x6A, 0x12, 0xD0, 0x05]).unwrap();
        chip8.cycle().unwrap();
        chip8.cycle().unwrap();
        chip8.key_press(0x3).unwrap();
        chip8.state.memory[0x000] = 0x00;
        chip8.state.delay_timer = 9;
        chip8.state.stack[0] = 0x300;
        chip8.state.sp = 1;
        chip8.state.mode = Mode::AwaitingKey { register: 0x2 };

        chip8.reset();

        let state = chip8.state();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.sp, 0);
        assert_eq!(state.stack, [0; 16]);
        assert_eq!(state.delay_timer, 0);
        assert_eq!(state.memory[..0x50], SPRITE_SHEET[..]);
        assert!(state.memory[0x200..].iter().all(|&b| b == 0));
        assert!(state.frame_buffer.pixels().iter().all(|&p| p == 0));
        assert!(!state.keyboard.is_pressed(0x3).unwrap());
        assert_eq!(state.mode, Mode::Running);
    }

    #[test]
    fn test_seeded_machines_agree() {
        let rom = [0xC0, 0xFF, 0xC1, 0xFF, 0xC2, 0xFF];
        let mut a = Chip8::with_seed(42);
        let mut b = Chip8::with_seed(42);
        a.load_rom_bytes(&rom).unwrap();
        b.load_rom_bytes(&rom).unwrap();
        for _ in 0..3 {
            a.cycle().unwrap();
            b.cycle().unwrap();
        }
        assert_eq!(a.state.v, b.state.v);
    }
}
