/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. Their behavior is cased on some
/// combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category (the 0x5, 0x8 and 0x9 groups)
/// - `(_, _, n, n)` more specific behavior within a category (the 0xE and 0xF groups)
/// - `(n, n, n, n)` fixed functions that take no operands (CLS and RET)
///
/// Nibbles not used to determine the operation carry the operands:
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a sprite height
pub trait Opcode {
    /// Returns the Opcode's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The register selected by the second nibble.
    /// `[_x__]`
    fn x(&self) -> usize;

    /// The register selected by the third nibble.
    /// `[__y_]`
    fn y(&self) -> usize;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_nnn]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (
            (self >> 12) as u8,
            (self >> 8 & 0xF) as u8,
            (self >> 4 & 0xF) as u8,
            self.n(),
        )
    }

    fn x(&self) -> usize {
        usize::from(self >> 8 & 0xF)
    }

    fn y(&self) -> usize {
        usize::from(self >> 4 & 0xF)
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0xFF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
