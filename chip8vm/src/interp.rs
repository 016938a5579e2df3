//! Instruction execution.
use log::trace;
use rand::Rng;

use crate::{
    constants::*,
    cpu::Chip8Cpu,
    error::Chip8Result,
    memory::Memory,
    opcode::Instruction,
    vm::Flow,
};

impl Chip8Cpu {
    /// Apply the side effects of a decoded instruction.
    ///
    /// The program counter must already point past the instruction.
    pub(crate) fn execute(&mut self, instr: Instruction) -> Chip8Result<Flow> {
        use Instruction as I;

        if log::log_enabled!(log::Level::Trace) {
            trace!("{:04X}: {instr}", self.pc.wrapping_sub(2));
        }

        let mut control_flow = Flow::Ok;

        match instr {
            I::Nop(_) => { /* No Op */ }
            // 00E0 (CLS)
            //
            // Clear display
            I::Cls => {
                self.display.clear();
                control_flow = Flow::Draw;
            }
            // 00EE (RET)
            //
            // Return from a subroutine.
            // Set the program counter to the value at the top of the stack.
            I::Ret => {
                self.pc = self.pop()?;
                control_flow = Flow::Jump;
            }
            // 1NNN (JP addr)
            //
            // Jump to address.
            I::Jp(nnn) => {
                self.pc = nnn;
                control_flow = Flow::Jump;
            }
            // 2NNN (CALL addr)
            //
            // Call subroutine at NNN.
            I::Call(nnn) => {
                self.push()?;
                self.pc = nnn;
                control_flow = Flow::Jump;
            }
            // 3XNN (SE Vx, byte)
            //
            // Skip the next instruction if register VX equals value NN.
            I::SeByte(vx, nn) => {
                if self.registers[vx as usize] == nn {
                    self.skip();
                }
            }
            // 4XNN (SNE Vx, byte)
            //
            // Skip the next instruction if register VX does not equal value NN.
            I::SneByte(vx, nn) => {
                if self.registers[vx as usize] != nn {
                    self.skip();
                }
            }
            // 5XY0 (SE Vx, Vy)
            //
            // Skip the next instruction if register VX equals value VY.
            I::SeReg(vx, vy) => {
                if self.registers[vx as usize] == self.registers[vy as usize] {
                    self.skip();
                }
            }
            // 6XNN (LD Vx, byte)
            //
            // Set register VX to value NN.
            I::LdByte(vx, nn) => {
                self.registers[vx as usize] = nn;
            }
            // 7xnn (ADD Vx, byte)
            //
            // Add value NN to register VX. Carry flag is not set.
            I::AddByte(vx, nn) => {
                let x = self.registers[vx as usize];
                self.registers[vx as usize] = x.wrapping_add(nn);
            }
            // 8XY0 (LD Vx, Vy)
            //
            // Store the value of register VY in register VX.
            I::LdReg(vx, vy) => {
                self.registers[vx as usize] = self.registers[vy as usize];
            }
            // 8XY1 (OR Vx, Vy)
            I::Or(vx, vy) => {
                self.registers[vx as usize] |= self.registers[vy as usize];
            }
            // 8XY2 (AND Vx, Vy)
            I::And(vx, vy) => {
                self.registers[vx as usize] &= self.registers[vy as usize];
            }
            // 8XY3 (XOR Vx, Vy)
            I::Xor(vx, vy) => {
                self.registers[vx as usize] ^= self.registers[vy as usize];
            }
            // 8XY4 (ADD Vx, Vy)
            //
            // ADDs VY to VX, and stores the result in VX.
            // Overflow is wrapped.
            // If overflow, set VF to 1, else 0.
            I::AddReg(vx, vy) => {
                let (x, y) = self.operands(vx, vy);
                let (result, carry) = x.overflowing_add(y);
                self.registers[vx as usize] = result;
                self.set_flag(carry);
            }
            // 8XY5 (SUB Vx, Vy)
            //
            // Subtracts VY from VX, and stores the result in VX.
            // VF is set to 1 when VX > VY, otherwise 0.
            I::Sub(vx, vy) => {
                let (x, y) = self.operands(vx, vy);
                self.registers[vx as usize] = x.wrapping_sub(y);
                self.set_flag(x > y);
            }
            // 8XY6 (SHR Vx)
            //
            // VF is set to the least-significant bit of VX before the shift.
            // Shift VX right by 1.
            // VY is unused.
            I::Shr(vx) => {
                let x = self.registers[vx as usize];
                self.registers[vx as usize] = x >> 1;
                self.set_flag(x & 1 == 1);
            }
            // 8XY7 (SUBN Vx, Vy)
            //
            // Subtracts VX from VY, and stores the result in VX.
            // VF is set to 1 when VY > VX, otherwise 0.
            I::Subn(vx, vy) => {
                let (x, y) = self.operands(vx, vy);
                self.registers[vx as usize] = y.wrapping_sub(x);
                self.set_flag(y > x);
            }
            // 8XYE (SHL Vx)
            //
            // VF is set to the most-significant bit of VX before the shift.
            // Shift VX left by 1.
            // VY is unused.
            I::Shl(vx) => {
                let x = self.registers[vx as usize];
                self.registers[vx as usize] = x << 1;
                self.set_flag(x >> 7 == 1);
            }
            // 9xy0 (SNE Vx, Vy)
            //
            // Skip next instruction if Vx != Vy.
            I::SneReg(vx, vy) => {
                if self.registers[vx as usize] != self.registers[vy as usize] {
                    self.skip();
                }
            }
            // Annn (LD I, addr)
            //
            // Set address register I to value NNN.
            I::LdI(nnn) => {
                self.address = nnn;
            }
            // Bnnn (JP V0, addr)
            //
            // Jump to address NNN offset by V0.
            I::JpV0(nnn) => {
                self.pc = nnn + self.registers[0] as Address;
                control_flow = Flow::Jump;
            }
            // CXNN (RND Vx, byte)
            //
            // Set register VX to the result of bitwise AND between a random number and NN.
            I::Rnd(vx, nn) => {
                self.registers[vx as usize] = nn & self.rng.gen::<u8>();
            }
            // Dxyn (DRW Vx, Vy, nibble)
            //
            // Draw sprite to the display buffer, at coordinate as per registers Vx and Vy.
            // Sprite is encoded as 8 pixels wide, N pixels high, stored in bits located in
            // memory pointed to by address register I.
            //
            // If the drawing operation erases existing pixels in the display buffer, register VF is set to
            // 1, and set to 0 if no display bits are unset. This is used for collision detection.
            I::Drw(vx, vy, n) => {
                let (x, y) = self.operands(vx, vy);

                let mut sprite = [0; 0x10];
                let sprite = &mut sprite[..n as usize];
                for (r, row) in sprite.iter_mut().enumerate() {
                    *row = self.ram.read(self.address as usize + r);
                }

                let is_erased = self.display.draw_sprite(x as usize, y as usize, sprite);
                self.set_flag(is_erased);
                control_flow = Flow::Draw;
            }
            // Ex9E (SKP Vx)
            //
            // Skip next instruction if the key with the value of Vx is pressed.
            I::Skp(vx) => {
                if self.keypad.is_pressed(self.registers[vx as usize]) {
                    self.skip();
                }
            }
            // ExA1 (SKNP Vx)
            I::Sknp(vx) => {
                if !self.keypad.is_pressed(self.registers[vx as usize]) {
                    self.skip();
                }
            }
            // Fx07 (LD Vx, DT)
            //
            // Set Vx = delay timer value.
            I::LdVxDt(vx) => {
                self.registers[vx as usize] = self.delay_timer;
            }
            // Fx0A (LD Vx, K)
            //
            // Wait for a key press, store the value of the key in Vx.
            // All execution stops until a key is pressed. The wait is resolved
            // by the cycle driver, one poll per cycle.
            I::LdVxK(vx) => {
                if let Some(k) = self.keypad.first_pressed() {
                    self.registers[vx as usize] = k;
                } else {
                    self.key_wait = Some(vx);
                    control_flow = Flow::KeyWait;
                }
            }
            // Fx15 (LD DT, Vx)
            //
            // Set delay timer = Vx.
            I::LdDtVx(vx) => {
                self.delay_timer = self.registers[vx as usize];
            }
            // Fx18 (LD ST, Vx)
            //
            // Set sound timer = Vx.
            I::LdStVx(vx) => {
                self.sound_timer = self.registers[vx as usize];
                control_flow = Flow::Sound;
            }
            // Fx1E (ADD I, Vx)
            //
            // Add Vx to I. VF is not affected.
            I::AddIVx(vx) => {
                let x = self.registers[vx as usize] as Address;
                self.address = self.address.wrapping_add(x);
            }
            // Fx29 (LD F, Vx)
            //
            // Set I = location of sprite for digit Vx.
            I::LdFVx(vx) => {
                let x = self.registers[vx as usize];
                self.address = Memory::glyph_address(x) as Address;
            }
            // Fx33 (LD B, Vx)
            //
            // Store the binary-coded decimal representation of Vx
            // in the memory locations I, I+1, and I+2.
            // Digits that land below 0x200 are dropped.
            #[rustfmt::skip]
            I::LdBVx(vx) => {
                let addr = self.address as usize;
                let x = self.registers[vx as usize];
                self.ram.write(addr,     x / 100 % 10);
                self.ram.write(addr + 1, x / 10  % 10);
                self.ram.write(addr + 2, x       % 10);
            }
            // Fx55 (LD [I], Vx)
            //
            // Store registers V0 through Vx in memory starting at location I.
            // I is left unchanged. Bytes that land below 0x200 are dropped.
            I::Store(vx) => {
                let addr = self.address as usize;
                for (v, x) in self.registers[0..=vx as usize].iter().enumerate() {
                    self.ram.write(addr + v, *x);
                }
            }
            // Fx65 (LD Vx, [I])
            //
            // Read registers V0 through Vx from memory starting at location I.
            I::Load(vx) => {
                let addr = self.address as usize;
                for (v, x) in self.registers[0..=vx as usize].iter_mut().enumerate() {
                    *x = self.ram.read(addr + v);
                }
            }
        }

        Ok(control_flow)
    }

    #[inline(always)]
    fn operands(&self, vx: u8, vy: u8) -> (u8, u8) {
        (self.registers[vx as usize], self.registers[vy as usize])
    }
}
