use log::debug;
use rand::{Rng, RngCore};

use crate::constants::SPRITE_HEIGHT;
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::state::{Mode, State};

// Every operation runs after pc has already been advanced past its own opcode,
// so a skip is one more `pc += 2` and a jump simply overwrites pc.

/// clear
pub fn cls(_op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.frame_buffer.reset();
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn ret(_op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.pc = state.pop()?;
    Ok(())
}

/// PC = addr
pub fn jp(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.pc = op.addr();
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.push(state.pc)?;
    state.pc = op.addr();
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn se(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x()] == op.kk());
    Ok(())
}

/// if Vx != kk then pc += 2
pub fn sne(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x()] != op.kk());
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn sre(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x()] == state.v[op.y()]);
    Ok(())
}

/// if Vx != Vy then pc += 2
pub fn srne(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x()] != state.v[op.y()]);
    Ok(())
}

/// Vx = kk
pub fn ld(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] = op.kk();
    Ok(())
}

/// Vx += kk
/// Overflow wraps and is dropped; VF is untouched
pub fn add(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.kk());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] = state.v[op.y()];
    Ok(())
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(())
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(())
}

// The flag-setting ALU operations below work from the values before the write
// and set VF before Vx, so when x is 0xF the result is what remains in the register.

/// Vx += Vy; VF = carry
pub fn addc(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let (res, carry) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.set_flag(carry);
    state.v[op.x()] = res;
    Ok(())
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    state.set_flag(vx > vy);
    state.v[op.x()] = vx.wrapping_sub(vy);
    Ok(())
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let vx = state.v[op.x()];
    state.set_flag(vx & 0x1 == 0x1);
    state.v[op.x()] = vx >> 1;
    Ok(())
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    state.set_flag(vy > vx);
    state.v[op.x()] = vy.wrapping_sub(vx);
    Ok(())
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let vx = state.v[op.x()];
    state.set_flag(vx & 0x80 == 0x80);
    state.v[op.x()] = vx << 1;
    Ok(())
}

/// I = addr
pub fn ldi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.i = op.addr();
    Ok(())
}

/// PC = V0 + addr
pub fn jpv0(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.pc = op.addr() + u16::from(state.v[0x0]);
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rnd(op: &dyn Opcode, state: &mut State, rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let rand_byte: u8 = rng.gen();
    state.v[op.x()] = rand_byte & op.kk();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite in memory I..I+n onto the frame buffer at (Vx, Vy).
/// VF is set if any lit pixel was erased
pub fn drw(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = state.v[op.x()] as usize;
    let y = state.v[op.y()] as usize;
    state.set_flag(false);

    let height = op.n() as usize;
    let mut sprite = [0u8; 0xF];
    sprite[..height].copy_from_slice(state.read(state.i, height)?);
    let collision = state.frame_buffer.draw(x, y, &sprite[..height]);
    state.set_flag(collision);
    state.draw_flag = true;
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skp(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let pressed = state.keyboard.is_pressed(state.v[op.x()])?;
    state.skip_if(pressed);
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn sknp(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let pressed = state.keyboard.is_pressed(state.v[op.x()])?;
    state.skip_if(!pressed);
    Ok(())
}

/// Vx = DT
pub fn lddt(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x()] = state.delay_timer;
    Ok(())
}

/// Vx = next keypress
/// Takes the lowest held key right away, otherwise blocks until one is pressed
pub fn ldk(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    match state.keyboard.first_pressed() {
        Some(key) => state.v[op.x()] = key,
        None => {
            debug!("awaiting key for V{:X}", op.x());
            state.mode = Mode::AwaitingKey { register: op.x() };
        }
    }
    Ok(())
}

/// DT = Vx
pub fn setdt(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.delay_timer = state.v[op.x()];
    Ok(())
}

/// ST = Vx
pub fn setst(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.sound_timer = state.v[op.x()];
    Ok(())
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    Ok(())
}

/// I = Vx * 5
/// Points I at the sprite sheet glyph for the digit in Vx
pub fn ldf(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.i = u16::from(state.v[op.x()]) * SPRITE_HEIGHT;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let vx = state.v[op.x()];
    state.write(state.i, &[vx / 100, vx / 10 % 10, vx % 10])
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let v = state.v;
    state.write(state.i, &v[..=op.x()])
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let count = op.x() + 1;
    let mut bytes = [0u8; 16];
    bytes[..count].copy_from_slice(state.read(state.i, count)?);
    state.v[..count].copy_from_slice(&bytes[..count]);
    Ok(())
}
