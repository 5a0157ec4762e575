pub use chip8::Chip8;
pub use error::Chip8Error;
pub use frame_buffer::FrameBuffer;
pub use keyboard::Keyboard;
pub use state::{Mode, State};

mod chip8;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
mod keyboard;
mod opcode;
mod operations;
pub mod state;
