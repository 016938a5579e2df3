//! Virtual machine.
use std::time::Duration;

use log::debug;

use crate::{
    constants::*,
    cpu::Chip8Cpu,
    devices::KeyCode,
    display::Display,
    error::Chip8Result,
    opcode::Instruction,
};

pub struct Chip8Vm {
    cpu: Chip8Cpu,
    conf: Chip8Conf,
}

impl Chip8Vm {
    pub fn new(conf: Chip8Conf) -> Self {
        let cpu = match conf.seed {
            Some(seed) => Chip8Cpu::with_seed(seed),
            None => Chip8Cpu::new(),
        };

        Chip8Vm { cpu, conf }
    }

    /// Configuration that was used to instantiate the VM.
    pub fn config(&self) -> &Chip8Conf {
        &self.conf
    }

    /// Load a program at `0x200` and prepare the machine to run it from the start.
    ///
    /// When the program is too large, the error is returned and the machine is left as it was.
    pub fn load_bytecode(&mut self, bytecode: &[u8]) -> Chip8Result<()> {
        self.cpu.ram.load_program(bytecode)?;
        self.reset();

        Ok(())
    }

    /// Clear internal state in preparation for a fresh startup.
    pub fn reset(&mut self) {
        debug!("reset");
        self.cpu.reset();
    }

    pub fn display(&self) -> &Display {
        &self.cpu.display
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Flow {
    Ok,
    /// Program counter has jumped to a new address.
    ///
    /// This is useful for the caller to avoid being
    /// blocked on infinite or long running loops.
    ///
    /// This is returned when the interpreter encounters:
    ///
    /// - 1nnn (`JP addr`)
    /// - 2nnn (`CALL addr`)
    /// - 00EE (`RET`)
    /// - Bnnn (`JP V0, addr`)
    Jump,
    /// Display buffer was changed by `CLS` or `DRW`.
    Draw,
    /// Sound timer was set.
    Sound,
    /// Wait for a keypress.
    ///
    /// This is triggered by the opcode `Fx0A` (`LD Vx, K`), which stops
    /// execution until a key is pressed, and loads the key value into `Vx`.
    KeyWait,
}

/// VM Configuration Parameters.
#[derive(Debug, Default, Clone)]
pub struct Chip8Conf {
    /// Instructions executed per second.
    pub clock_frequency: Option<Hz>,
    /// Seed for the random number generator. Seeded from the OS when absent.
    pub seed: Option<u64>,
}

impl Chip8Conf {
    /// Number of cycles to execute between each 60Hz timer tick.
    pub fn cycles_per_frame(&self) -> usize {
        let Hz(freq) = self
            .clock_frequency
            .unwrap_or(Hz(DEFAULT_CLOCK_FREQUENCY));
        ((freq / DELAY_FREQUENCY) as usize).max(1)
    }
}

/// CPU clock frequency, in hertz (per second)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Hz(pub u64);

impl From<Hz> for Duration {
    fn from(freq: Hz) -> Self {
        if freq.0 == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(NANOS_IN_SECOND / freq.0)
        }
    }
}

/// Interpreter
impl Chip8Vm {
    /// Sets the keyboard key input state.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        self.cpu.keypad.set(key, pressed);
    }

    /// Clear the keyboard input state, setting all keys to up.
    pub fn clear_keys(&mut self) {
        self.cpu.keypad.clear()
    }

    /// Execute a single fetch-decode-execute step.
    ///
    /// While an `Fx0A` (`LD Vx, K`) is pending, each call polls the keypad
    /// once instead of fetching, and returns [`Flow::KeyWait`] until a key is down.
    pub fn cycle(&mut self) -> Chip8Result<Flow> {
        if let Some(vx) = self.cpu.key_wait {
            return match self.cpu.keypad.first_pressed() {
                Some(key) => {
                    self.cpu.registers[vx as usize] = key;
                    self.cpu.key_wait = None;
                    Ok(Flow::Ok)
                }
                None => Ok(Flow::KeyWait),
            };
        }

        let op = self.cpu.fetch();
        self.cpu.execute(Instruction::decode(op))
    }

    /// Count down the delay and sound timers.
    ///
    /// Must be called at 60Hz, independent of the number of cycles executed.
    pub fn tick_timers(&mut self) {
        self.cpu.tick_delay();
        self.cpu.tick_sound();
    }

    /// Execute one frame worth of cycles, then tick the timers once.
    ///
    /// Returns the most notable flow of the frame, so the caller knows
    /// whether to redraw.
    pub fn run_frame(&mut self) -> Chip8Result<Flow> {
        let mut frame_flow = Flow::Ok;

        for _ in 0..self.conf.cycles_per_frame() {
            match self.cycle()? {
                Flow::Draw => frame_flow = Flow::Draw,
                // Stalled on input, no point spinning for the rest of the frame.
                Flow::KeyWait => {
                    if frame_flow != Flow::Draw {
                        frame_flow = Flow::KeyWait;
                    }
                    break;
                }
                _ => {}
            }
        }

        self.tick_timers();

        Ok(frame_flow)
    }

    /// Execute the given number of cycles, without ticking the timers.
    pub fn run_steps(&mut self, step_count: usize) -> Chip8Result<Flow> {
        let mut flow = Flow::Ok;

        for _ in 0..step_count {
            flow = self.cycle()?;
        }

        Ok(flow)
    }
}

/// Machine state inspection
impl Chip8Vm {
    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.cpu.registers
    }

    /// Index register `I`.
    pub fn index(&self) -> Address {
        self.cpu.address
    }

    pub fn pc(&self) -> Address {
        self.cpu.pc
    }

    pub fn sp(&self) -> usize {
        self.cpu.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.cpu.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.cpu.sound_timer
    }

    /// The buzzer should sound while the sound timer counts down.
    pub fn is_sound_active(&self) -> bool {
        self.cpu.sound_timer > 0
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.cpu.key_wait.is_some()
    }

    pub fn read_memory(&self, address: Address) -> u8 {
        self.cpu.ram.read(address as usize)
    }
}
