use chip8vm::{constants::*, prelude::*};

fn vm_with(program: &[u8]) -> Chip8Vm {
    let mut vm = Chip8Vm::new(Chip8Conf {
        seed: Some(42),
        ..Default::default()
    });
    vm.load_bytecode(program).unwrap();
    vm
}

/// Builds a program of nested subroutines, each calling the next one
/// down until `depth` levels are on the stack.
fn nested_calls(depth: usize) -> Vec<u8> {
    let mut program = Vec::new();
    for level in 0..depth {
        // Each level is a CALL to the next level followed by a RET.
        let next = (MEM_START + (level + 1) * 4) as u16;
        program.extend_from_slice(&[0x20 | (next >> 8) as u8, next as u8]);
        program.extend_from_slice(&[0x00, 0xEE]);
    }
    // Innermost level sets a sentinel and returns.
    program.extend_from_slice(&[0x6A, 0x99, 0x00, 0xEE]);
    program
}

#[test]
fn test_call_return_depths() {
    for depth in 1..=STACK_SIZE {
        let mut vm = vm_with(&nested_calls(depth));
        vm.run_steps(depth).unwrap();
        assert_eq!(vm.sp(), depth);

        // Sentinel and the unwinding returns.
        vm.run_steps(2).unwrap();
        assert_eq!(vm.registers()[0xA], 0x99);
        for _ in 1..depth {
            vm.run_steps(1).unwrap();
        }
        assert_eq!(vm.sp(), 0);
        // Back at the RET that follows the outermost CALL.
        assert_eq!(vm.pc(), (MEM_START + 2) as Address);
    }
}

#[test]
fn test_stack_overflow() {
    let mut vm = vm_with(&nested_calls(STACK_SIZE + 1));
    vm.run_steps(STACK_SIZE).unwrap();
    assert_eq!(vm.sp(), STACK_SIZE);

    let err = vm.cycle().unwrap_err();
    assert!(matches!(err, Chip8Error::StackOverflow { pc: 0x240 }));
    assert_eq!(vm.sp(), STACK_SIZE);
}

#[test]
fn test_stack_underflow() {
    let mut vm = vm_with(&[0x00, 0xEE]);
    let err = vm.cycle().unwrap_err();
    assert!(matches!(err, Chip8Error::StackUnderflow { pc: 0x200 }));
    assert_eq!(vm.sp(), 0);
}

#[test]
fn test_program_capacity() {
    let mut vm = Chip8Vm::new(Chip8Conf::default());
    assert!(vm.load_bytecode(&vec![0; 4096 - 512]).is_ok());
    assert!(matches!(
        vm.load_bytecode(&vec![0; 4096 - 512 + 1]),
        Err(Chip8Error::Load { .. })
    ));
}

#[test]
#[rustfmt::skip]
fn test_draw_digit_glyphs() {
    let mut vm = vm_with(&[
        0x60, 0x00, // LD V0, 0     ; x
        0x61, 0x00, // LD V1, 0     ; y
        0x62, 0x0F, // LD V2, 0xF   ; digit
        0xF2, 0x29, // LD F, V2
        0xD0, 0x15, // DRW V0, V1, 5
    ]);
    vm.run_steps(5).unwrap();
    assert_eq!(vm.index(), 0x50 + 0xF * 5);
    assert_eq!(vm.registers()[0xF], 0);

    let glyph = &FONTSET[0xF * 5..0xF * 5 + 5];
    for (y, &row) in glyph.iter().enumerate() {
        for x in 0..8 {
            assert_eq!(vm.display().get(x, y), (row >> (7 - x)) & 1 == 1);
        }
    }
}

#[test]
#[rustfmt::skip]
fn test_countdown_loop() {
    // Count V0 from 0 to 10 in a loop, storing the BCD of the final value.
    let mut vm = vm_with(&[
        0x60, 0x00, // 0x200 LD V0, 0
        0x70, 0x01, // 0x202 ADD V0, 1
        0x30, 0x0A, // 0x204 SE V0, 10
        0x12, 0x02, // 0x206 JP 0x202
        0xA3, 0x00, // 0x208 LD I, 0x300
        0xF0, 0x33, // 0x20A LD B, V0
        0x12, 0x0C, // 0x20C JP 0x20C ; halt
    ]);
    vm.run_steps(1 + 10 * 3 + 3).unwrap();
    assert_eq!(vm.registers()[0], 10);
    assert_eq!(vm.pc(), 0x20C);
    assert_eq!(
        [vm.read_memory(0x300), vm.read_memory(0x301), vm.read_memory(0x302)],
        [0, 1, 0]
    );
}

#[test]
#[rustfmt::skip]
fn test_draw_collision() {
    // Draw two sprites next to each other.
    // The zero bits of the second draw must not erase
    // the pixels of the first draw
    let mut vm = vm_with(&[
        0xA2, 0x0C, // LD I, sprite
        0x60, 0x04, // LD V0, 4
        0x61, 0x00, // LD V1, 0
        0xD0, 0x11, // DRW V0, V1, 1
        0x60, 0x00, // LD V0, 0
        0xD0, 0x11, // DRW V0, V1, 1
        0b1111_0000, 0b0000_0000, // sprite
    ]);
    vm.run_steps(6).unwrap();

    assert!(vm.display().get(0, 0));
    assert!(vm.display().get(4, 0));
    assert_eq!(vm.registers()[0xF], 0);
}

#[test]
fn test_unknown_opcodes_are_skipped() {
    let mut vm = vm_with(&[0x01, 0x23, 0x81, 0x2F, 0xE1, 0x00, 0xF1, 0xFF, 0x6B, 0x01]);
    let flow = vm.run_steps(5).unwrap();
    assert_eq!(flow, Flow::Ok);
    assert_eq!(vm.pc(), 0x20A);
    assert_eq!(vm.registers()[0xB], 1);
}

#[test]
fn test_reset_restarts_program() {
    let mut vm = vm_with(&[0x61, 0x05, 0x71, 0x01]);
    vm.run_steps(2).unwrap();
    assert_eq!(vm.registers()[1], 6);

    vm.reset();
    assert_eq!(vm.pc(), 0x200);
    assert_eq!(vm.registers()[1], 0);

    vm.run_steps(2).unwrap();
    assert_eq!(vm.registers()[1], 6);
}

#[test]
#[rustfmt::skip]
fn test_font_survives_stores() {
    let mut vm = vm_with(&[
        0xA0, 0x50, // LD I, 0x50
        0x60, 0x00, // LD V0, 0
        0xF0, 0x55, // LD [I], V0
        0xF0, 0x33, // LD B, V0
    ]);
    vm.run_steps(4).unwrap();
    for (offset, byte) in FONTSET.iter().enumerate() {
        assert_eq!(vm.read_memory((FONTSET_START + offset) as u16), *byte);
    }
}
