use std::io;

use thiserror::Error;

/// Faults raised by the interpreter or while loading a ROM.
///
/// None of these halt the machine by themselves; whoever drives `cycle` decides
/// whether to keep going.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow: more than 16 nested subroutine calls")]
    StackOverflow,

    #[error("stack underflow: returned from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("key {0:#04X} is outside the keypad 0x0..=0xF")]
    InvalidKey(u8),

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("unable to read ROM")]
    RomRead(#[from] io::Error),
}
