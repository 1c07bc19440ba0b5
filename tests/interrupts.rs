//! Interrupt delivery tests: IRQ masking, NMI, the segment-load
//! interrupt shadow, divide-error restart, and single-step

use emu86::{CpuHarness, Reg};

#[test]
fn test_irq_requires_interrupt_flag() {
    let mut h = CpuHarness::new();
    h.set_vector(0x20, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.load_program(0x100, &[0x90, 0x90]);
    h.cpu.irq(0x20);
    // IF clear: the request stays pending
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0100);
    // IF set: the pending request is honored after the next instruction
    h.cpu.flags.i = true;
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
}

#[test]
fn test_irq_taken_after_retiring_instruction() {
    let mut h = CpuHarness::new();
    h.set_vector(0x21, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.cpu.flags.i = true;
    // MOV AX, 7 runs to completion before the vector is taken
    h.load_program(0x100, &[0xB8, 0x07, 0x00]);
    h.cpu.irq(0x21);
    h.step_insn();
    assert_eq!(h.cpu.ax(), 7);
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
    // return address on the stack is the instruction after the MOV
    assert_eq!(h.bus.ram.peek(0x30FA), 0x03);
    assert_eq!(h.bus.ram.peek(0x30FB), 0x00);
}

#[test]
fn test_nmi_ignores_interrupt_flag() {
    let mut h = CpuHarness::new();
    h.set_vector(2, 0x0400, 0x0040);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.load_program(0x100, &[0x90]);
    h.cpu.nmi();
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
    assert_eq!(h.cpu.reg_get(Reg::Ip), 0x0040);
    // entry clears IF and TF
    assert!(!h.cpu.flags.i);
    assert!(!h.cpu.flags.t);
}

#[test]
fn test_nmi_outranks_irq() {
    let mut h = CpuHarness::new();
    h.set_vector(2, 0x0400, 0x0000);
    h.set_vector(0x20, 0x0500, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.cpu.flags.i = true;
    h.load_program(0x100, &[0x90]);
    h.cpu.irq(0x20);
    h.cpu.nmi();
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
}

#[test]
fn test_pop_ss_defers_interrupt_one_instruction() {
    let mut h = CpuHarness::new();
    h.set_vector(0x20, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x00FE);
    // new SS on the stack
    h.bus.ram.poke(0x30FE, 0x00);
    h.bus.ram.poke(0x30FF, 0x03);
    h.cpu.flags.i = true;
    // POP SS ; MOV AX, 1
    h.load_program(0x100, &[0x17, 0xB8, 0x01, 0x00]);
    h.cpu.irq(0x20);
    // POP SS retires with the request pending but shadowed
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0100);
    // MOV AX, 1 retires, then the vector is taken
    h.step_insn();
    assert_eq!(h.cpu.ax(), 1);
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
}

#[test]
fn test_mov_ss_defers_interrupt_one_instruction() {
    let mut h = CpuHarness::new();
    h.set_vector(0x20, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.cpu.reg_set(Reg::Ax, 0x0300);
    h.cpu.flags.i = true;
    // MOV SS, AX ; NOP
    h.load_program(0x100, &[0x8E, 0xD0, 0x90]);
    h.cpu.irq(0x20);
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0100);
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
}

#[test]
fn test_divide_error_restarts_at_faulting_instruction() {
    let mut h = CpuHarness::new();
    h.set_vector(0, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.cpu.reg_set(Reg::Ax, 0x1234);
    h.cpu.reg_set(Reg::Bl, 0x00);
    // NOP ; DIV BL: the fault pushes the DIV's own address
    h.load_program(0x100, &[0x90, 0xF6, 0xF3]);
    h.step_insns(2);
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
    // pushed IP = 1, the first byte of the DIV
    assert_eq!(h.bus.ram.peek(0x30FA), 0x01);
    assert_eq!(h.bus.ram.peek(0x30FB), 0x00);
    // pushed CS
    assert_eq!(h.bus.ram.peek(0x30FC), 0x00);
    assert_eq!(h.bus.ram.peek(0x30FD), 0x01);
}

#[test]
fn test_trap_fires_after_each_instruction() {
    let mut h = CpuHarness::new();
    h.set_vector(1, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.cpu.flags.t = true;
    h.load_program(0x100, &[0x90, 0x90]);
    h.bus.ram.poke(0x4000, 0xCF); // IRET
    // NOP retires, trap delivers
    h.step_insn();
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
    assert!(!h.cpu.flags.t);
    // IRET restores TF, its shadow lets the next NOP run, then trap again
    h.step_insn(); // IRET
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0100);
    assert!(h.cpu.flags.t);
    h.step_insn(); // second NOP, trap at its boundary
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
}

#[test]
fn test_interrupt_mid_string_restarts_at_prefix() {
    let mut h = CpuHarness::new();
    h.set_vector(0x20, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    h.cpu.reg_set(Reg::Cx, 4);
    h.cpu.reg_set(Reg::Si, 0x0100);
    h.cpu.reg_set(Reg::Di, 0x0200);
    h.bus.ram.load(0x0100, b"wxyz");
    h.cpu.flags.i = true;
    // REP MOVSB at 0800:0000
    h.load_program(0x800, &[0xF3, 0xA4]);
    h.step(); // prefix
    h.step(); // first element
    assert_eq!(h.cpu.cx(), 3);
    h.cpu.irq(0x20);
    h.step(); // second element, then the request aborts the repeat
    assert_eq!(h.cpu.cx(), 2);
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
    // pushed return address is the REP prefix, so IRET resumes the copy
    assert_eq!(h.bus.ram.peek(0x30FA), 0x00);
    assert_eq!(h.bus.ram.peek(0x30FC), 0x00);
    assert_eq!(h.bus.ram.peek(0x30FD), 0x08);
    // an IRET handler lets the copy finish
    h.bus.ram.poke(0x4000, 0xCF);
    h.step_insn(); // IRET back to the prefix
    h.step_insn(); // remaining elements run to retirement
    assert_eq!(h.cpu.cx(), 0);
    assert_eq!(h.bus.ram.peek(0x0203), b'z');
}

#[test]
fn test_sti_then_pending_irq() {
    let mut h = CpuHarness::new();
    h.set_vector(0x20, 0x0400, 0x0000);
    h.cpu.reg_set(Reg::Ss, 0x0300);
    h.cpu.reg_set(Reg::Sp, 0x0100);
    // STI ; NOP with the request already pending
    h.load_program(0x100, &[0xFB, 0x90]);
    h.cpu.irq(0x20);
    h.step_insn();
    // recognized as soon as IF is visible at a boundary
    assert_eq!(h.cpu.reg_get(Reg::Cs), 0x0400);
}
