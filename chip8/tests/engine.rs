mod common;

use chip8::instruction::Reg;
use chip8::{ErrorKind, Quirks, Status, PROGRAM_START, STACK_DEPTH};

use common::{rom, Machine};

#[test]
fn add_registers_scenario() {
    // LD V0, 10; LD V1, 5; ADD V0, V1
    let mut m = Machine::boot(&[0x60, 0x0A, 0x61, 0x05, 0x80, 0x14]);
    m.run(3);
    assert_eq!(m.vm.reg(Reg::V0), 15);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
    assert_eq!(m.vm.pc(), PROGRAM_START + 6);
}

#[test]
fn jump_sets_pc_directly() {
    let mut m = Machine::boot(&rom(&[0x1234]));
    m.step();
    assert_eq!(m.vm.pc(), 0x234);
}

#[test]
fn jump_plus_v0() {
    let mut m = Machine::boot(&rom(&[0x6010, 0xB300]));
    m.run(2);
    assert_eq!(m.vm.pc(), 0x310);
}

#[test]
fn jump_plus_v0_stays_in_memory() {
    let mut m = Machine::boot(&rom(&[0x60FF, 0xBFFF]));
    m.run(2);
    assert_eq!(m.vm.pc(), (0xFFF + 0xFF) & 0xFFF);
}

#[test]
fn call_and_return() {
    // 200: CALL 206
    // 202: LD V1, 1
    // 204: JP 204
    // 206: LD V2, 2
    // 208: RET
    let mut m = Machine::boot(&rom(&[0x2206, 0x6101, 0x1204, 0x6202, 0x00EE]));
    m.step();
    assert_eq!(m.vm.pc(), 0x206);
    assert_eq!(m.vm.stack_depth(), 1);
    m.run(2);
    assert_eq!(m.vm.pc(), 0x202);
    assert_eq!(m.vm.stack_depth(), 0);
    m.step();
    assert_eq!(m.vm.reg(Reg::V1), 1);
    assert_eq!(m.vm.reg(Reg::V2), 2);
}

#[test]
fn seventeenth_call_overflows() {
    // Each call lands on the next word, which is another call.
    let words: Vec<u16> = (0..=STACK_DEPTH as u16)
        .map(|n| 0x2000 | (PROGRAM_START + 2 * (n + 1)))
        .collect();
    let mut m = Machine::boot(&rom(&words));
    m.run(STACK_DEPTH);
    assert_eq!(m.vm.stack_depth(), STACK_DEPTH);

    let pc = m.vm.pc();
    match *m.step_err().kind() {
        ErrorKind::StackOverflow => {}
        ref other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(m.vm.pc(), pc);
    assert_eq!(m.vm.stack_depth(), STACK_DEPTH);
}

#[test]
fn return_on_fresh_machine_underflows() {
    let mut m = Machine::boot(&rom(&[0x00EE]));
    match *m.step_err().kind() {
        ErrorKind::StackUnderflow => {}
        ref other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(m.vm.pc(), PROGRAM_START);
}

#[test]
fn unknown_opcode_is_reported() {
    let mut m = Machine::boot(&rom(&[0x0123]));
    match *m.step_err().kind() {
        ErrorKind::UnknownOpcode(0x0123) => {}
        ref other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn skips() {
    let mut m = Machine::boot(&rom(&[
        0x6005, // LD V0, 5
        0x6105, // LD V1, 5
        0x3005, // SE V0, 5      -> skip
        0x0000, //
        0x4005, // SNE V0, 5     -> no skip
        0x5010, // SE V0, V1     -> skip
        0x0000, //
        0x9010, // SNE V0, V1    -> no skip
        0x6201, // LD V2, 1
    ]));
    m.run(7);
    assert_eq!(m.vm.reg(Reg::V2), 1);
    assert_eq!(m.vm.pc(), PROGRAM_START + 18);
}

#[test]
fn logic_ops() {
    let mut m = Machine::boot(&rom(&[
        0x60F0, 0x610F, 0x6FAA, // V0 = F0, V1 = 0F, VF = AA
        0x8011, // OR V0, V1
        0x8012, // AND V0, V1
        0x6233, 0x8213, // V2 = 33 ^ 0F
        0x8320, // LD V3, V2
    ]));
    m.run(8);
    assert_eq!(m.vm.reg(Reg::V0), 0x0F);
    assert_eq!(m.vm.reg(Reg::V2), 0x3C);
    assert_eq!(m.vm.reg(Reg::V3), 0x3C);
    assert_eq!(m.vm.reg(Reg::Vf), 0xAA);
}

#[test]
fn subtract_and_reverse_subtract() {
    let mut m = Machine::boot(&rom(&[0x6005, 0x6107, 0x8015, 0x6205, 0x6307, 0x8237]));
    m.run(3);
    assert_eq!(m.vm.reg(Reg::V0), 0xFE);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
    m.run(3);
    assert_eq!(m.vm.reg(Reg::V2), 2);
    assert_eq!(m.vm.reg(Reg::Vf), 1);
}

#[test]
fn shifts_operate_on_vx() {
    let mut m = Machine::boot(&rom(&[
        0x6081, // LD V0, 81
        0x61FF, // LD V1, FF
        0x8016, // SHR V0 (V1 ignored)
    ]));
    m.run(3);
    assert_eq!(m.vm.reg(Reg::V0), 0x40);
    assert_eq!(m.vm.reg(Reg::Vf), 1);

    let mut m = Machine::boot(&rom(&[0x6081, 0x801E]));
    m.run(2);
    assert_eq!(m.vm.reg(Reg::V0), 0x02);
    assert_eq!(m.vm.reg(Reg::Vf), 1);

    let mut m = Machine::boot(&rom(&[0x6040, 0x801E]));
    m.run(2);
    assert_eq!(m.vm.reg(Reg::V0), 0x80);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
}

#[test]
fn shift_quirk_reads_vy() {
    let quirks = Quirks {
        shift_uses_vy: true,
        ..Quirks::default()
    };
    let mut m = Machine::boot_with(&rom(&[0x6001, 0x6104, 0x8016]), quirks);
    m.run(3);
    assert_eq!(m.vm.reg(Reg::V0), 0x02);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
}

#[test]
fn shift_into_vf_leaves_flag() {
    // LD VF, 0x02; SHR VF
    let mut m = Machine::boot(&rom(&[0x6F02, 0x8F06]));
    m.run(2);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
}

#[test]
fn random_is_masked_and_seeded() {
    let program = rom(&[0xC00F, 0xC100, 0xC2FF]);
    let mut a = Machine::boot(&program);
    let mut b = Machine::boot(&program);
    a.run(3);
    b.run(3);
    assert!(a.vm.reg(Reg::V0) <= 0x0F);
    assert_eq!(a.vm.reg(Reg::V1), 0);
    assert_eq!(a.vm.reg(Reg::V2), b.vm.reg(Reg::V2));
}

#[test]
fn key_skips() {
    let mut m = Machine::boot(&rom(&[
        0x6007, // LD V0, 7
        0xE09E, // SKP V0
        0x6101, // LD V1, 1   (skipped)
        0xE0A1, // SKNP V0
        0x6201, // LD V2, 1   (not skipped)
    ]));
    let mut keys = [false; 16];
    keys[7] = true;
    m.vm.set_keys(keys);
    m.run(4);
    assert_eq!(m.vm.reg(Reg::V1), 0);
    assert_eq!(m.vm.reg(Reg::V2), 1);
}

#[test]
fn wait_key_parks_until_pressed() {
    let mut m = Machine::boot(&rom(&[0xF30A, 0x6401]));
    assert_eq!(m.step(), Status::WaitingForKey);
    assert_eq!(m.step(), Status::WaitingForKey);
    assert_eq!(m.vm.pc(), PROGRAM_START);

    let mut keys = [false; 16];
    keys[0xC] = true;
    m.vm.set_keys(keys);
    assert_eq!(m.step(), Status::Executed);
    assert_eq!(m.vm.reg(Reg::V3), 0xC);
    assert_eq!(m.vm.pc(), PROGRAM_START + 2);
}

#[test]
fn wait_key_ignores_key_held_from_before() {
    let mut m = Machine::boot(&rom(&[0xF00A, 0xF10A, 0x6201]));
    let mut keys = [false; 16];
    keys[5] = true;
    m.vm.set_keys(keys);

    // Key 5 was already down when the first wait started.
    assert_eq!(m.step(), Status::WaitingForKey);
    m.vm.set_keys([false; 16]);
    assert_eq!(m.step(), Status::WaitingForKey);
    m.vm.set_keys(keys);
    assert_eq!(m.step(), Status::Executed);
    assert_eq!(m.vm.reg(Reg::V0), 5);

    // Still holding the same press: the second wait must not reuse it.
    assert_eq!(m.step(), Status::WaitingForKey);
    assert_eq!(m.step(), Status::WaitingForKey);
    assert_eq!(m.vm.pc(), PROGRAM_START + 2);

    m.vm.set_keys([false; 16]);
    assert_eq!(m.step(), Status::WaitingForKey);
    let mut keys = [false; 16];
    keys[9] = true;
    m.vm.set_keys(keys);
    assert_eq!(m.step(), Status::Executed);
    assert_eq!(m.vm.reg(Reg::V1), 9);
    assert_eq!(m.step(), Status::Executed);
    assert_eq!(m.vm.reg(Reg::V2), 1);
}

#[test]
fn timers_are_set_read_and_ticked_externally() {
    let mut m = Machine::boot(&rom(&[0x6005, 0xF015, 0xF018, 0xF107]));
    m.run(3);
    assert_eq!(m.vm.delay_timer(), 5);
    assert_eq!(m.vm.sound_timer(), 5);
    assert!(m.vm.is_beeping());

    m.vm.update_timers(2);
    m.step();
    assert_eq!(m.vm.reg(Reg::V1), 3);

    m.vm.update_timers(10);
    assert_eq!(m.vm.sound_timer(), 0);
    assert!(!m.vm.is_beeping());
}

#[test]
fn add_to_index() {
    let mut m = Machine::boot(&rom(&[0xAFFE, 0x6005, 0x6F07, 0xF01E]));
    m.run(4);
    assert_eq!(m.vm.i(), 0x1003);
    assert_eq!(m.vm.reg(Reg::Vf), 7);
}

#[test]
fn add_to_index_overflow_quirk() {
    let quirks = Quirks {
        index_overflow_flag: true,
        ..Quirks::default()
    };
    let mut m = Machine::boot_with(&rom(&[0xAFFE, 0x6005, 0xF01E, 0xA100, 0xF01E]), quirks);
    m.run(3);
    assert_eq!(m.vm.i(), 0x1003);
    assert_eq!(m.vm.reg(Reg::Vf), 1);
    m.run(2);
    assert_eq!(m.vm.i(), 0x105);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
}

#[test]
fn glyph_address() {
    let mut m = Machine::boot(&rom(&[0x601A, 0xF029]));
    m.run(2);
    // Only the low nibble counts: glyph 'A'.
    assert_eq!(m.vm.i(), 0xA * 5);
    let glyph = &m.vm.memory()[m.vm.i() as usize..m.vm.i() as usize + 5];
    assert_eq!(glyph, &[0xF0, 0x90, 0xF0, 0x90, 0x90]);
}

#[test]
fn bcd() {
    let mut m = Machine::boot(&rom(&[0x60FE, 0xA300, 0xF033]));
    m.run(3);
    assert_eq!(&m.vm.memory()[0x300..0x303], &[2, 5, 4]);
}

#[test]
fn store_and_load_registers() {
    let mut m = Machine::boot(&rom(&[
        0x6011, 0x6122, 0x6233, // V0..V2
        0xA400, 0xF155, // store V0..V1
        0x6000, 0x6100, 0x6200, // clear
        0xA400, 0xF265, // load V0..V2
    ]));
    m.run(10);
    assert_eq!(&m.vm.memory()[0x400..0x403], &[0x11, 0x22, 0x00]);
    assert_eq!(m.vm.reg(Reg::V0), 0x11);
    assert_eq!(m.vm.reg(Reg::V1), 0x22);
    assert_eq!(m.vm.reg(Reg::V2), 0x00);
    assert_eq!(m.vm.i(), 0x400);
}

#[test]
fn load_store_quirk_moves_index() {
    let quirks = Quirks {
        load_store_increments_index: true,
        ..Quirks::default()
    };
    let mut m = Machine::boot_with(&rom(&[0xA400, 0xF255, 0xF065]), quirks);
    m.run(2);
    assert_eq!(m.vm.i(), 0x403);
    m.step();
    assert_eq!(m.vm.i(), 0x404);
}

#[test]
fn store_registers_wraps_at_end_of_memory() {
    let mut m = Machine::boot(&rom(&[0x60AB, 0x61CD, 0xAFFF, 0xF155]));
    m.run(4);
    assert_eq!(m.vm.memory()[0xFFF], 0xAB);
    assert_eq!(m.vm.memory()[0x000], 0xCD);
}

#[test]
fn clear_screen_marks_redraw() {
    let mut m = Machine::boot(&rom(&[0x00E0]));
    assert!(!m.vm.take_redraw());
    m.step();
    assert!(m.vm.take_redraw());
    assert!(!m.vm.take_redraw());
}

#[test]
fn draw_collision_and_erase() {
    // LD I, glyph 0; DRW V0, V0, 5 twice
    let mut m = Machine::boot(&rom(&[0xA000, 0xD005, 0xD005]));
    m.run(2);
    assert_eq!(m.vm.reg(Reg::Vf), 0);
    assert!(m.vm.display().get(0, 0));
    assert!(m.vm.take_redraw());

    m.step();
    assert_eq!(m.vm.reg(Reg::Vf), 1);
    assert!(m.vm.take_redraw());
    assert!((0..8).all(|x| (0..5).all(|y| !m.vm.display().get(x, y))));
}

#[test]
fn draw_wraps_both_axes() {
    // V0 = 60, V1 = 30, I -> two 0xFF rows, DRW V0, V1, 2
    let mut m = Machine::boot(&rom(&[0x603C, 0x611E, 0xA20A, 0xD012, 0x1208, 0xFFFF]));
    m.run(4);
    let fb = m.vm.display();
    for &y in &[30usize, 31] {
        for &x in &[60usize, 61, 62, 63, 0, 1, 2, 3] {
            assert!(fb.get(x, y), "pixel ({}, {}) should be lit", x, y);
        }
        assert!(!fb.get(4, y));
        assert!(!fb.get(59, y));
    }
    assert!(!fb.get(60, 0));
    assert!(!fb.get(60, 29));
}

#[test]
fn draw_origin_is_taken_modulo_screen() {
    // V0 = 64 + 3, V1 = 32 + 2
    let mut m = Machine::boot(&rom(&[0x6043, 0x6122, 0xA000, 0xD011]));
    m.run(4);
    assert!(m.vm.display().get(3, 2));
}

#[test]
fn draw_with_vf_as_coordinate() {
    // VF = 8 is read as the x coordinate before being overwritten by the flag.
    let mut m = Machine::boot(&rom(&[0x6F08, 0xA000, 0xDF01]));
    m.run(3);
    assert!(m.vm.display().get(8, 0));
    assert_eq!(m.vm.reg(Reg::Vf), 0);
}

#[test]
fn cosmac_preset() {
    // V0 = 1, V1 = 3; SHL V0, V1 shifts V1; LD [I], V1 moves I.
    let mut m = Machine::boot_with(&rom(&[0x6001, 0x6103, 0x801E, 0xA400, 0xF155]), Quirks::cosmac());
    m.run(5);
    assert_eq!(m.vm.reg(Reg::V0), 0x06);
    assert_eq!(m.vm.i(), 0x402);
    assert_eq!(&m.vm.memory()[0x400..0x402], &[0x06, 0x03]);
    assert!(!m.vm.quirks().index_overflow_flag);
}
