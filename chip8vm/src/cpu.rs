//! CPU and memory state.
use log::warn;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    constants::*,
    devices::Keypad,
    display::Display,
    error::{Chip8Error, Chip8Result},
    memory::Memory,
    opcode::Opcode,
};

/// Core state for a chip8 interpreter.
pub struct Chip8Cpu {
    // ------------------------------------------------------------------------
    // Registers
    /// Program counter pointing to the next instruction to fetch.
    pub(crate) pc: Address,
    /// Stack pointer, the number of return addresses on the stack.
    pub(crate) sp: usize,
    /// General purpose registers for temporary values.
    ///
    /// Register 16 (VF) is used for either the carry flag or borrow switch depending on opcode.
    pub(crate) registers: [u8; REGISTER_COUNT],
    /// Index register used for temporarily storing an address.
    pub(crate) address: Address,
    /// (DT) Delay timer that counts down to 0.
    pub(crate) delay_timer: u8,
    /// (ST) Sound timer that counts down to 0. When it has a non-zero value, a beep is played.
    pub(crate) sound_timer: u8,
    /// Register waiting to receive the next key press, set by `Fx0A` (`LD Vx, K`).
    pub(crate) key_wait: Option<u8>,
    /// Keyboard input state.
    pub(crate) keypad: Keypad,

    // ------------------------------------------------------------------------
    // Memory
    /// Main memory storage space.
    pub(crate) ram: Memory,
    /// Stack of return pointers used for jumping when a routine call finishes.
    pub(crate) stack: [Address; STACK_SIZE],
    /// Screen buffer that is drawn too.
    pub(crate) display: Display,

    /// Source for `Cxkk` (`RND Vx, byte`), seeded once.
    pub(crate) rng: StdRng,
}

impl Default for Chip8Cpu {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Chip8Cpu {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a CPU with a deterministic random source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            pc: MEM_START as Address,
            sp: 0,
            registers: [0; REGISTER_COUNT],
            address: 0,
            delay_timer: 0,
            sound_timer: 0,
            key_wait: None,
            keypad: Keypad::new(),

            ram: Memory::new(),
            stack: [0; STACK_SIZE],
            display: Display::new(),

            rng,
        }
    }

    /// Zero the registers, timers, stack, display and keypad.
    ///
    /// Memory is kept so the loaded program can be run again from the start.
    pub(crate) fn reset(&mut self) {
        self.pc = MEM_START as Address;
        self.sp = 0;
        self.registers.fill(0);
        self.address = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.key_wait = None;
        self.keypad.clear();
        self.stack.fill(0);
        self.display.clear();
    }

    /// Read the instruction at the program counter, and step past it.
    #[inline(always)]
    pub(crate) fn fetch(&mut self) -> Opcode {
        let op = Opcode::from(self.ram.instr(self.pc as usize));
        self.pc = self.pc.wrapping_add(2);
        op
    }

    /// Skip the next instruction.
    #[inline(always)]
    pub(crate) fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    #[inline(always)]
    pub(crate) fn set_flag(&mut self, flag: bool) {
        self.registers[FLAG_REGISTER] = flag as u8;
    }

    /// Push the current program counter onto the call stack.
    pub(crate) fn push(&mut self) -> Chip8Result<()> {
        if self.sp >= STACK_SIZE {
            // Report the address of the CALL itself.
            let pc = self.pc.wrapping_sub(2);
            warn!("call stack overflow at {pc:#05X}");
            return Err(Chip8Error::StackOverflow { pc });
        }

        self.stack[self.sp] = self.pc;
        self.sp += 1;

        Ok(())
    }

    /// Pop the top return address off the call stack.
    pub(crate) fn pop(&mut self) -> Chip8Result<Address> {
        if self.sp == 0 {
            let pc = self.pc.wrapping_sub(2);
            warn!("call stack underflow at {pc:#05X}");
            return Err(Chip8Error::StackUnderflow { pc });
        }

        self.sp -= 1;

        Ok(self.stack[self.sp])
    }

    /// Count down the delay timer.
    #[inline]
    pub fn tick_delay(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
    }

    #[inline]
    pub fn tick_sound(&mut self) {
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fetch_advances_pc() {
        let mut cpu = Chip8Cpu::with_seed(0);
        cpu.ram.load_program(&[0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        assert_eq!(cpu.fetch(), Opcode(0xAABB));
        assert_eq!(cpu.pc, 0x202);
        assert_eq!(cpu.fetch(), Opcode(0xCCDD));
        assert_eq!(cpu.pc, 0x204);
    }

    #[test]
    fn test_stack_depth() {
        let mut cpu = Chip8Cpu::with_seed(0);
        for depth in 0..STACK_SIZE {
            cpu.pc = 0x300 + depth as Address * 2;
            cpu.push().unwrap();
        }
        assert_eq!(cpu.sp, STACK_SIZE);

        // 17th level
        assert!(matches!(
            cpu.push(),
            Err(Chip8Error::StackOverflow { .. })
        ));
        assert_eq!(cpu.sp, STACK_SIZE, "stack pointer must not wrap");

        for depth in (0..STACK_SIZE).rev() {
            assert_eq!(cpu.pop().unwrap(), 0x300 + depth as Address * 2);
        }
        assert!(matches!(cpu.pop(), Err(Chip8Error::StackUnderflow { .. })));
        assert_eq!(cpu.sp, 0);
    }

    #[test]
    fn test_timers_clamp_at_zero() {
        let mut cpu = Chip8Cpu::with_seed(0);
        cpu.delay_timer = 1;
        cpu.sound_timer = 2;

        cpu.tick_delay();
        cpu.tick_sound();
        assert_eq!((cpu.delay_timer, cpu.sound_timer), (0, 1));

        cpu.tick_delay();
        cpu.tick_sound();
        cpu.tick_delay();
        cpu.tick_sound();
        assert_eq!((cpu.delay_timer, cpu.sound_timer), (0, 0));
    }

    #[test]
    fn test_reset_keeps_memory() {
        let mut cpu = Chip8Cpu::with_seed(0);
        cpu.ram.load_program(&[0x12, 0x34]).unwrap();
        cpu.registers[3] = 9;
        cpu.pc = 0x400;
        cpu.display.draw_sprite(0, 0, &[0xFF]);

        cpu.reset();

        assert_eq!(cpu.pc, 0x200);
        assert_eq!(cpu.registers, [0; REGISTER_COUNT]);
        assert!(!cpu.display.get(0, 0));
        assert_eq!(cpu.ram.instr(0x200), [0x12, 0x34]);
    }
}
