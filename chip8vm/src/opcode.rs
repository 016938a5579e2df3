//! Opcode decoding.
//!
//! Chip-8 opcodes are 16 bits each, stored big-endian. The leading nibble
//! selects one of 16 operation groups. Group `0x8` is further distinguished
//! by its trailing nibble, and groups `0x0`, `0xE` and `0xF` by their
//! trailing byte. Anything that falls outside the tables decodes to a no-op.
//!
//! Nibbles not used to determine the operation carry the operands:
//!
//! - `(_, n, n, n)` a 12-bit address `nnn`
//! - `(_, _, n, n)` an immediate byte `kk`
//! - `(_, n, _, _)` the register `Vx`, or a range of registers `V0..=Vx`
//! - `(_, _, n, _)` the register `Vy`
//! - `(_, _, _, n)` a nibble `n`, the sprite height for `DRW`
use std::fmt::{self, Display, Formatter};

use crate::constants::Address;

/// Raw 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Leading nibble, identifying the operation group.
    /// `[o___]`
    #[inline(always)]
    pub fn op(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    /// `[_x__]`
    #[inline(always)]
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// `[__y_]`
    #[inline(always)]
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// `[___n]`
    #[inline(always)]
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// `[__kk]`
    #[inline(always)]
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// `[_nnn]`
    #[inline(always)]
    pub fn nnn(self) -> Address {
        self.0 & 0x0FFF
    }
}

impl From<[u8; 2]> for Opcode {
    fn from(bytes: [u8; 2]) -> Self {
        Opcode(u16::from_be_bytes(bytes))
    }
}

/// Decoded operation with its operands.
///
/// Register operands are register indices `0x0..=0xF`, not values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Opcode without a handler. Executes as a no-op.
    Nop(Opcode),
    /// `00E0`
    Cls,
    /// `00EE`
    Ret,
    /// `1nnn`
    Jp(Address),
    /// `2nnn`
    Call(Address),
    /// `3xkk`
    SeByte(u8, u8),
    /// `4xkk`
    SneByte(u8, u8),
    /// `5xy0`
    SeReg(u8, u8),
    /// `6xkk`
    LdByte(u8, u8),
    /// `7xkk`
    AddByte(u8, u8),
    /// `8xy0`
    LdReg(u8, u8),
    /// `8xy1`
    Or(u8, u8),
    /// `8xy2`
    And(u8, u8),
    /// `8xy3`
    Xor(u8, u8),
    /// `8xy4`
    AddReg(u8, u8),
    /// `8xy5`
    Sub(u8, u8),
    /// `8xy6`
    Shr(u8),
    /// `8xy7`
    Subn(u8, u8),
    /// `8xyE`
    Shl(u8),
    /// `9xy0`
    SneReg(u8, u8),
    /// `Annn`
    LdI(Address),
    /// `Bnnn`
    JpV0(Address),
    /// `Cxkk`
    Rnd(u8, u8),
    /// `Dxyn`
    Drw(u8, u8, u8),
    /// `Ex9E`
    Skp(u8),
    /// `ExA1`
    Sknp(u8),
    /// `Fx07`
    LdVxDt(u8),
    /// `Fx0A`
    LdVxK(u8),
    /// `Fx15`
    LdDtVx(u8),
    /// `Fx18`
    LdStVx(u8),
    /// `Fx1E`
    AddIVx(u8),
    /// `Fx29`
    LdFVx(u8),
    /// `Fx33`
    LdBVx(u8),
    /// `Fx55`
    Store(u8),
    /// `Fx65`
    Load(u8),
}

impl Instruction {
    /// Route the opcode through the group table by its leading nibble.
    pub fn decode(op: Opcode) -> Self {
        use Instruction as I;

        match op.op() {
            0x0 => decode_sys(op),
            0x1 => I::Jp(op.nnn()),
            0x2 => I::Call(op.nnn()),
            0x3 => I::SeByte(op.x(), op.kk()),
            0x4 => I::SneByte(op.x(), op.kk()),
            0x5 => I::SeReg(op.x(), op.y()),
            0x6 => I::LdByte(op.x(), op.kk()),
            0x7 => I::AddByte(op.x(), op.kk()),
            0x8 => decode_math(op),
            0x9 => I::SneReg(op.x(), op.y()),
            0xA => I::LdI(op.nnn()),
            0xB => I::JpV0(op.nnn()),
            0xC => I::Rnd(op.x(), op.kk()),
            0xD => I::Drw(op.x(), op.y(), op.n()),
            0xE => decode_key(op),
            0xF => decode_misc(op),
            _ => unreachable!("opcode group is a single nibble"),
        }
    }
}

/// Group `0x0`.
///
/// The machine code routine call `0nnn` (SYS) shares this group and is ignored.
/// Matched on the whole word rather than the trailing nibble, so `0nnn` with
/// a trailing `0` or `E` never aliases `CLS` or `RET`.
#[inline]
fn decode_sys(op: Opcode) -> Instruction {
    match op.0 {
        0x00E0 => Instruction::Cls,
        0x00EE => Instruction::Ret,
        _ => Instruction::Nop(op),
    }
}

/// Group `0x8` arithmetic, keyed by trailing nibble.
#[inline]
fn decode_math(op: Opcode) -> Instruction {
    use Instruction as I;

    let (x, y) = (op.x(), op.y());
    match op.n() {
        0x0 => I::LdReg(x, y),
        0x1 => I::Or(x, y),
        0x2 => I::And(x, y),
        0x3 => I::Xor(x, y),
        0x4 => I::AddReg(x, y),
        0x5 => I::Sub(x, y),
        0x6 => I::Shr(x),
        0x7 => I::Subn(x, y),
        0xE => I::Shl(x),
        _ => I::Nop(op),
    }
}

/// Group `0xE` keyboard skips, keyed by trailing byte rather than trailing
/// nibble, so `Ex?E` and `Ex?1` words other than `Ex9E`/`ExA1` are no-ops.
#[inline]
fn decode_key(op: Opcode) -> Instruction {
    match op.kk() {
        0x9E => Instruction::Skp(op.x()),
        0xA1 => Instruction::Sknp(op.x()),
        _ => Instruction::Nop(op),
    }
}

/// Group `0xF` timers, index register and memory, keyed by trailing byte.
#[inline]
fn decode_misc(op: Opcode) -> Instruction {
    use Instruction as I;

    let x = op.x();
    match op.kk() {
        0x07 => I::LdVxDt(x),
        0x0A => I::LdVxK(x),
        0x15 => I::LdDtVx(x),
        0x18 => I::LdStVx(x),
        0x1E => I::AddIVx(x),
        0x29 => I::LdFVx(x),
        0x33 => I::LdBVx(x),
        0x55 => I::Store(x),
        0x65 => I::Load(x),
        _ => I::Nop(op),
    }
}

/// Assembly style mnemonic, as found in Cowgod's reference.
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Instruction as I;

        match *self {
            I::Nop(op) => write!(f, "NOP {:04X}", op.0),
            I::Cls => write!(f, "CLS"),
            I::Ret => write!(f, "RET"),
            I::Jp(nnn) => write!(f, "JP {nnn:03X}"),
            I::Call(nnn) => write!(f, "CALL {nnn:03X}"),
            I::SeByte(x, kk) => write!(f, "SE V{x:X}, {kk:02X}"),
            I::SneByte(x, kk) => write!(f, "SNE V{x:X}, {kk:02X}"),
            I::SeReg(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            I::LdByte(x, kk) => write!(f, "LD V{x:X}, {kk:02X}"),
            I::AddByte(x, kk) => write!(f, "ADD V{x:X}, {kk:02X}"),
            I::LdReg(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            I::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            I::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            I::Xor(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            I::AddReg(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            I::Sub(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            I::Shr(x) => write!(f, "SHR V{x:X}"),
            I::Subn(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            I::Shl(x) => write!(f, "SHL V{x:X}"),
            I::SneReg(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            I::LdI(nnn) => write!(f, "LD I, {nnn:03X}"),
            I::JpV0(nnn) => write!(f, "JP V0, {nnn:03X}"),
            I::Rnd(x, kk) => write!(f, "RND V{x:X}, {kk:02X}"),
            I::Drw(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n:X}"),
            I::Skp(x) => write!(f, "SKP V{x:X}"),
            I::Sknp(x) => write!(f, "SKNP V{x:X}"),
            I::LdVxDt(x) => write!(f, "LD V{x:X}, DT"),
            I::LdVxK(x) => write!(f, "LD V{x:X}, K"),
            I::LdDtVx(x) => write!(f, "LD DT, V{x:X}"),
            I::LdStVx(x) => write!(f, "LD ST, V{x:X}"),
            I::AddIVx(x) => write!(f, "ADD I, V{x:X}"),
            I::LdFVx(x) => write!(f, "LD F, V{x:X}"),
            I::LdBVx(x) => write!(f, "LD B, V{x:X}"),
            I::Store(x) => write!(f, "LD [I], V{x:X}"),
            I::Load(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
