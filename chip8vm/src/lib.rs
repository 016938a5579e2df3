//! Chip-8 virtual machine.
//!
//! The crate holds the interpreter core only. Loading files, rendering the
//! display, reading a host keyboard and pacing frames are left to the driver,
//! which talks to the machine through [`prelude::Chip8Vm`].
mod clock;
pub mod constants;
mod cpu;
mod devices;
mod display;
mod error;
mod interp;
mod memory;
mod opcode;
mod vm;

pub use self::vm::{Flow, Hz};

pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use super::{
        clock::Clock,
        devices::{InvalidKeyCode, KeyCode, Keypad},
        display::Display,
        error::{Chip8Error, Chip8Result},
        memory::{Memory, FONTSET},
        opcode::{Instruction, Opcode},
        vm::{Chip8Conf, Chip8Vm, Flow, Hz},
    };
}
