use crate::constants::{MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, STACK_DEPTH};
use crate::error::Chip8Error;
use crate::frame_buffer::FrameBuffer;
use crate::keyboard::Keyboard;

/// What the CPU does on its next cycle
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// Fetch and execute the instruction at pc
    Running,
    /// Poll the keyboard and store the lowest pressed key in `register`
    AwaitingKey { register: usize },
}

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer; the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound) that count down to zero once per tick
///
/// ## Memory
/// - 16 return addresses of stack
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - 0x200.. holds the loaded ROM
///
/// ## Devices
/// - a 64x32 frame buffer and a flag noting it changed since it was last taken
/// - a 16-key keypad
/// - `mode` tracks whether execution is blocked waiting for a key
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keyboard: Keyboard,
    pub mode: Mode,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            keyboard: Keyboard::new(),
            mode: Mode::Running,
        }
    }

    /// Reads the big-endian opcode at pc
    pub fn fetch(&self) -> Result<u16, Chip8Error> {
        let word = self.read(self.pc, 2)?;
        Ok(u16::from(word[0]) << 8 | u16::from(word[1]))
    }

    /// Borrows `len` bytes of memory starting at `address`
    pub fn read(&self, address: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let start = address as usize;
        let end = checked_end(start, len)?;
        Ok(&self.memory[start..end])
    }

    /// Copies `bytes` into memory starting at `address`
    pub fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), Chip8Error> {
        let start = address as usize;
        let end = checked_end(start, bytes.len())?;
        self.memory[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Pushes a return address onto the stack
    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        let slot = self
            .stack
            .get_mut(self.sp as usize)
            .ok_or(Chip8Error::StackOverflow)?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address off the stack
    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        self.sp = self.sp.checked_sub(1).ok_or(Chip8Error::StackUnderflow)?;
        Ok(self.stack[self.sp as usize])
    }

    /// Skips the next instruction when `condition` holds
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[0xF] = flag as u8;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_end(start: usize, len: usize) -> Result<usize, Chip8Error> {
    let end = start + len;
    if end > MEMORY_SIZE {
        Err(Chip8Error::MemoryOutOfBounds {
            address: start.max(MEMORY_SIZE),
        })
    } else {
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_reset() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
        assert_eq!(state.i, 0);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.stack, [0; 16]);
        assert_eq!(state.memory[0x000..0x050], SPRITE_SHEET[..]);
        assert!(state.memory[0x050..].iter().all(|&b| b == 0));
        assert_eq!(state.mode, Mode::Running);
    }

    #[test]
    fn test_fetches_big_endian() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch().unwrap(), 0xAABB);
    }

    #[test]
    fn test_fetch_past_end_faults() {
        let mut state = State::new();
        state.pc = 0xFFF;
        assert!(matches!(
            state.fetch(),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        ));
    }

    #[test]
    fn test_read_and_write_are_bounds_checked() {
        let mut state = State::new();
        assert!(state.write(0xFFD, &[1, 2, 3]).is_ok());
        assert_eq!(state.read(0xFFD, 3).unwrap(), &[1, 2, 3]);
        assert!(state.write(0xFFE, &[1, 2, 3]).is_err());
        assert!(state.read(0xFFF, 2).is_err());
        // Nothing was written by the failed call
        assert_eq!(state.memory[0xFFE..], [2, 3]);
    }

    #[test]
    fn test_stack_push_pop() {
        let mut state = State::new();
        state.push(0x202).unwrap();
        state.push(0x404).unwrap();
        assert_eq!(state.sp, 2);
        assert_eq!(state.pop().unwrap(), 0x404);
        assert_eq!(state.pop().unwrap(), 0x202);
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_stack_overflow() {
        let mut state = State::new();
        for address in 0..16 {
            state.push(address).unwrap();
        }
        assert!(matches!(state.push(0x300), Err(Chip8Error::StackOverflow)));
        assert_eq!(state.sp, 16);
    }

    #[test]
    fn test_stack_underflow() {
        let mut state = State::new();
        assert!(matches!(state.pop(), Err(Chip8Error::StackUnderflow)));
        assert_eq!(state.sp, 0);
    }
}
