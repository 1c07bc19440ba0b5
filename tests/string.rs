//! String operation tests: single elements, repeats, direction flag,
//! and segment overrides

use emu86::{CpuHarness, Reg};
use pretty_assertions::assert_eq;

#[test]
fn test_movsb_single() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.bus.ram.poke(0x0100, 0x5A);
    // MOVSB
    h.load_program(0x800, &[0xA4]);
    h.step_insn();
    assert_eq!(h.bus.ram.peek(0x0200), 0x5A);
    assert_eq!(h.cpu.si(), 0x0101);
    assert_eq!(h.cpu.di(), 0x0201);
}

#[test]
fn test_movsw_direction_down() {
    let mut h = CpuHarness::new();
    h.cpu.flags.d = true;
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.bus.ram.poke(0x0100, 0x34);
    h.bus.ram.poke(0x0101, 0x12);
    // MOVSW
    h.load_program(0x800, &[0xA5]);
    h.step_insn();
    assert_eq!(h.bus.ram.peek(0x0200), 0x34);
    assert_eq!(h.bus.ram.peek(0x0201), 0x12);
    assert_eq!(h.cpu.si(), 0x00FE);
    assert_eq!(h.cpu.di(), 0x01FE);
}

#[test]
fn test_rep_movsb_copies_block() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 4);
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.bus.ram.load(0x0100, b"wxyz");
    // REP MOVSB
    h.load_program(0x800, &[0xF3, 0xA4]);
    h.step_insn();
    assert_eq!(h.bus.ram.peek(0x0200), b'w');
    assert_eq!(h.bus.ram.peek(0x0203), b'z');
    assert_eq!(h.cpu.cx(), 0);
    assert_eq!(h.cpu.si(), 0x0104);
    assert_eq!(h.cpu.di(), 0x0204);
}

#[test]
fn test_rep_with_cx_zero_does_nothing() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 0);
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.cpu.flags.z = true;
    // REPE CMPSB with an exhausted count retires untouched
    h.load_program(0x800, &[0xF3, 0xA6]);
    h.step_insn();
    assert_eq!(h.cpu.si(), 0x0100);
    assert_eq!(h.cpu.di(), 0x0200);
    assert_eq!(h.cpu.cx(), 0);
}

#[test]
fn test_repe_cmpsb_stops_at_mismatch() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 3);
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.bus.ram.load(0x0100, b"abc");
    h.bus.ram.load(0x0200, b"abd");
    // REPE CMPSB: equal, equal, mismatch on the third byte
    h.load_program(0x800, &[0xF3, 0xA6]);
    h.step_insn();
    assert_eq!(h.cpu.cx(), 0);
    assert_eq!(h.cpu.si(), 0x0103);
    assert_eq!(h.cpu.di(), 0x0203);
    assert!(!h.cpu.flags.z);
}

#[test]
fn test_repe_cmpsb_equal_runs_out_cx() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 3);
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.bus.ram.load(0x0100, b"abc");
    h.bus.ram.load(0x0200, b"abc");
    h.load_program(0x800, &[0xF3, 0xA6]);
    h.step_insn();
    assert_eq!(h.cpu.cx(), 0);
    assert!(h.cpu.flags.z);
}

#[test]
fn test_repne_scasb_finds_byte() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 8);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.cpu.reg_set(Reg::Al, b'#' as u16);
    h.bus.ram.load(0x0200, b"ab#z");
    // REPNE SCASB: stops one past the match
    h.load_program(0x800, &[0xF2, 0xAE]);
    h.step_insn();
    assert_eq!(h.cpu.di(), 0x0203);
    assert_eq!(h.cpu.cx(), 5);
    assert!(h.cpu.flags.z);
}

#[test]
fn test_rep_stosw_fills() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 3);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.cpu.reg_set(Reg::Ax, 0xBEEF);
    // REP STOSW
    h.load_program(0x800, &[0xF3, 0xAB]);
    h.step_insn();
    for n in 0..3 {
        assert_eq!(h.bus.ram.peek(0x0200 + n * 2), 0xEF);
        assert_eq!(h.bus.ram.peek(0x0201 + n * 2), 0xBE);
    }
    assert_eq!(h.cpu.di(), 0x0206);
    assert_eq!(h.cpu.cx(), 0);
}

#[test]
fn test_lodsw() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.bus.ram.poke(0x0100, 0xCD);
    h.bus.ram.poke(0x0101, 0xAB);
    // LODSW
    h.load_program(0x800, &[0xAD]);
    h.step_insn();
    assert_eq!(h.cpu.ax(), 0xABCD);
    assert_eq!(h.cpu.si(), 0x0102);
}

#[test]
fn test_movsb_source_segment_override() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Es, 0x0400);
    h.cpu.reg_set(Reg::Si, 0x0010);
    h.cpu.reg_set(Reg::Di, 0x0020);
    h.bus.ram.poke(0x0010, 0x11); // DS:SI
    h.bus.ram.poke(0x4010, 0x99); // ES:SI
    // ES: MOVSB reads the source through ES, destination stays ES:DI
    h.load_program(0x800, &[0x26, 0xA4]);
    h.step_insn();
    assert_eq!(h.bus.ram.peek(0x4020), 0x99);
}

#[test]
fn test_string_element_is_one_tick() {
    let mut h = CpuHarness::new();
    h.cpu.reg_set(Reg::Cx, 2);
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.load_program(0x800, &[0xF3, 0xA4]);
    h.step(); // prefix
    assert!(!h.cpu.at_instruction_boundary());
    h.step(); // first element
    assert_eq!(h.cpu.cx(), 1);
    assert!(!h.cpu.at_instruction_boundary());
    h.step(); // second element retires
    assert_eq!(h.cpu.cx(), 0);
    assert!(h.cpu.at_instruction_boundary());
}
