use log::{trace, warn};
use rand::RngCore;

use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// An instruction's behavior, applied to the state after pc has moved past it
pub type Operation = fn(&dyn Opcode, &mut State, &mut dyn RngCore) -> Result<(), Chip8Error>;

/// Selects the correct Operation for a given Opcode, if there is one
pub fn from_op(op: &dyn Opcode) -> Option<Operation> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => cls,
        (0x0, 0x0, 0xE, 0xE) => ret,
        (0x1, ..) => jp,
        (0x2, ..) => call,
        (0x3, ..) => se,
        (0x4, ..) => sne,
        (0x5, .., 0x0) => sre,
        (0x6, ..) => ld,
        (0x7, ..) => add,
        (0x8, .., 0x0) => mv,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => addc,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, .., 0x0) => srne,
        (0xA, ..) => ldi,
        (0xB, ..) => jpv0,
        (0xC, ..) => rnd,
        (0xD, ..) => drw,
        (0xE, _, 0x9, 0xE) => skp,
        (0xE, _, 0xA, 0x1) => sknp,
        (0xF, _, 0x0, 0x7) => lddt,
        (0xF, _, 0x0, 0xA) => ldk,
        (0xF, _, 0x1, 0x5) => setdt,
        (0xF, _, 0x1, 0x8) => setst,
        (0xF, _, 0x1, 0xE) => addi,
        (0xF, _, 0x2, 0x9) => ldf,
        (0xF, _, 0x3, 0x3) => bcd,
        (0xF, _, 0x5, 0x5) => stor,
        (0xF, _, 0x6, 0x5) => read,
        _ => return None,
    };
    Some(operation)
}

/// Advances pc past `op` and then applies it.
///
/// Unknown opcodes are logged and otherwise behave as a no-op.
pub fn execute(op: u16, state: &mut State, rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    trace!(
        "{:04X} v{:02X?} i{:04X} pc{:04X}",
        op,
        state.v,
        state.i,
        state.pc
    );
    let address = state.pc;
    state.pc = state.pc.wrapping_add(2);
    match from_op(&op) {
        Some(operation) => operation(&op, state, rng),
        None => {
            warn!("unknown opcode {:04X} at {:04X}", op, address);
            Ok(())
        }
    }
}
