//! Main memory.
use log::{debug, trace};

use crate::{
    constants::*,
    error::{Chip8Error, Chip8Result},
};

/// Hexadecimal digit sprites 0-F, each 5 rows of 8 pixels.
#[rustfmt::skip]
pub const FONTSET: [u8; FONTSET_DATA_LENGTH] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4KB byte store.
///
/// Layout:
///
/// - `0x000..0x200` reserved for the interpreter, with the font glyphs at `0x050..0x0A0`
/// - `0x200..0x1000` program
///
/// Addresses outside the 12-bit space wrap around.
pub struct Memory {
    ram: Box<[u8; MEM_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        let mut ram = Box::new([0; MEM_SIZE]);
        ram[FONTSET_START..FONTSET_START + FONTSET_DATA_LENGTH].copy_from_slice(&FONTSET);
        Self { ram }
    }
}

impl Memory {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline(always)]
    pub fn read(&self, address: usize) -> u8 {
        self.ram[address & ADDRESS_MASK]
    }

    /// Store a byte in the program region.
    ///
    /// The reserved region below `0x200`, font glyphs included, is read-only
    /// once constructed. Writes that land there are dropped.
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) {
        let address = address & ADDRESS_MASK;
        if address < MEM_START {
            trace!("dropped write of {value:#04X} to reserved address {address:#05X}");
            return;
        }
        self.ram[address] = value;
    }

    /// Read the two bytes of the instruction at the given address.
    #[inline(always)]
    pub fn instr(&self, address: usize) -> [u8; 2] {
        [self.read(address), self.read(address + 1)]
    }

    /// Copy a program into the program region, erasing whatever was loaded before.
    ///
    /// Memory is left untouched when the program does not fit.
    pub fn load_program(&mut self, bytecode: &[u8]) -> Chip8Result<()> {
        if bytecode.len() > PROGRAM_CAPACITY {
            return Err(Chip8Error::Load {
                size: bytecode.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }

        self.ram[MEM_START..].fill(0);
        self.ram[MEM_START..MEM_START + bytecode.len()].copy_from_slice(bytecode);
        debug!("loaded {} byte program at {MEM_START:#05X}", bytecode.len());

        Ok(())
    }

    /// Address of the font glyph for the given hexadecimal digit.
    #[inline]
    pub fn glyph_address(digit: u8) -> usize {
        FONTSET_START + (digit & 0xF) as usize * FONTSET_HEIGHT
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fontset_loaded() {
        let mem = Memory::new();
        assert_eq!(mem.read(0x50), 0xF0);
        assert_eq!(mem.read(0x9F), 0x80);
        assert_eq!(mem.read(0x4F), 0);
        assert_eq!(mem.read(0xA0), 0);
    }

    #[test]
    fn test_glyph_address() {
        for digit in 0..16 {
            let addr = Memory::glyph_address(digit);
            assert_eq!(addr, 0x50 + digit as usize * 5);
        }
        // Only the low nibble selects the glyph.
        assert_eq!(Memory::glyph_address(0x1A), Memory::glyph_address(0xA));
    }

    #[test]
    fn test_instr_bytes() {
        let mut mem = Memory::new();
        mem.write(0x200, 0xAA);
        mem.write(0x201, 0xBB);
        assert_eq!(mem.instr(0x200), [0xAA, 0xBB]);
    }

    #[test]
    fn test_address_wraps() {
        let mut mem = Memory::new();
        mem.write(0x1000 + 0x300, 0x42);
        assert_eq!(mem.read(0x300), 0x42);
        mem.write(0xFFF, 0x12);
        assert_eq!(mem.instr(0xFFF), [0x12, 0x00]);
    }

    #[test]
    fn test_reserved_region_is_read_only() {
        let mut mem = Memory::new();
        mem.write(0x000, 0x34);
        mem.write(0x50, 0x00);
        mem.write(0x1FF, 0x77);
        // wraps into the reserved region
        mem.write(0x1000 + 0x51, 0x00);
        assert_eq!(mem.read(0x000), 0);
        assert_eq!(mem.read(0x50), 0xF0);
        assert_eq!(mem.read(0x51), 0x90);
        assert_eq!(mem.read(0x1FF), 0);

        mem.write(0x200, 0x77);
        assert_eq!(mem.read(0x200), 0x77);
    }

    #[test]
    fn test_load_program_capacity() {
        let mut mem = Memory::new();
        assert!(mem.load_program(&[0xAB; PROGRAM_CAPACITY]).is_ok());
        assert_eq!(mem.read(0xFFF), 0xAB);

        let result = mem.load_program(&[0xCD; PROGRAM_CAPACITY + 1]);
        assert!(matches!(
            result,
            Err(Chip8Error::Load {
                size: 3585,
                capacity: 3584
            })
        ));
        // Failed load leaves memory unchanged.
        assert_eq!(mem.read(0x200), 0xAB);
    }

    #[test]
    fn test_load_program_clears_previous() {
        let mut mem = Memory::new();
        mem.load_program(&[1, 2, 3, 4]).unwrap();
        mem.load_program(&[9]).unwrap();
        assert_eq!(mem.read(0x200), 9);
        assert_eq!(mem.read(0x201), 0);
        assert_eq!(mem.read(0x50), 0xF0);
    }
}
