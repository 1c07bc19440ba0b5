//! Control flow handlers: conditional and unconditional jumps, calls,
//! returns, the LOOP family, and software interrupts.
//!
//! Relative targets were sign-extended at fetch, so every branch is a
//! wrapping add on IP. Far transfers load CS through the descriptor
//! path, which also arms the interrupt shadow.

use crate::bus::Bus;
use crate::cpu::decode::{Cond, LoopCond};
use crate::cpu::execute::undefined;
use crate::cpu::state::{Segment, VECTOR_BREAKPOINT, VECTOR_OVERFLOW};
use crate::cpu::Cpu;

fn condition(cpu: &Cpu, cond: Cond) -> bool {
    let fl = &cpu.flags;
    match cond {
        Cond::O => fl.v,
        Cond::C => fl.c,
        Cond::Z => fl.z,
        Cond::Be => fl.c || fl.z,
        Cond::S => fl.s,
        Cond::P => fl.p,
        Cond::L => fl.s != fl.v,
        Cond::Le => fl.s != fl.v || fl.z,
    }
}

/// Jcc rel8 (0x70..0x7F): taken when the condition matches `expected`.
pub fn jcc(cpu: &mut Cpu, cond: Cond, expected: bool) {
    if condition(cpu, cond) == expected {
        cpu.ip = cpu.ip.wrapping_add(cpu.insn.imm0);
    }
}

/// JMP rel8/rel16 (0xEB, 0xE9).
pub fn jmp_rel(cpu: &mut Cpu) {
    cpu.ip = cpu.ip.wrapping_add(cpu.insn.imm0);
}

/// JMP ptr16:16 (0xEA).
pub fn jmp_far(cpu: &mut Cpu) {
    cpu.ip = cpu.insn.imm0;
    let cs = cpu.insn.imm1;
    cpu.load_seg(Segment::Cs, cs);
}

/// JMP r/m16 (0xFF /4).
pub fn jmp_rm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    cpu.ip = cpu.read_rm(bus);
}

/// JMP m16:16 (0xFF /5). A register operand has no second word to
/// load and is undefined.
pub fn jmp_far_rm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    if !cpu.insn.memory {
        return undefined(cpu, bus);
    }
    cpu.ip = bus.mem_read16(cpu.insn.addr);
    let cs = bus.mem_read16(cpu.insn.addr + 2);
    cpu.load_seg(Segment::Cs, cs);
}

/// CALL rel16 (0xE8).
pub fn call_rel<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let ret = cpu.ip;
    cpu.push16(bus, ret);
    cpu.ip = cpu.ip.wrapping_add(cpu.insn.imm0);
}

/// CALL ptr16:16 (0x9A).
pub fn call_far<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let cs = cpu.segment(Segment::Cs);
    cpu.push16(bus, cs);
    let ret = cpu.ip;
    cpu.push16(bus, ret);
    cpu.ip = cpu.insn.imm0;
    let target = cpu.insn.imm1;
    cpu.load_seg(Segment::Cs, target);
}

/// CALL r/m16 (0xFF /2).
pub fn call_rm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let target = cpu.read_rm(bus);
    let ret = cpu.ip;
    cpu.push16(bus, ret);
    cpu.ip = target;
}

/// CALL m16:16 (0xFF /3).
pub fn call_far_rm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    if !cpu.insn.memory {
        return undefined(cpu, bus);
    }
    let offset = bus.mem_read16(cpu.insn.addr);
    let selector = bus.mem_read16(cpu.insn.addr + 2);
    let cs = cpu.segment(Segment::Cs);
    cpu.push16(bus, cs);
    let ret = cpu.ip;
    cpu.push16(bus, ret);
    cpu.ip = offset;
    cpu.load_seg(Segment::Cs, selector);
}

/// RET / RET imm16 (0xC1/0xC3, 0xC0/0xC2). The plain encodings carry a
/// zero immediate, so one body serves all four.
pub fn ret_near<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    cpu.ip = cpu.pop16(bus);
    let sp = cpu.sp().wrapping_add(cpu.insn.imm0);
    cpu.set_sp(sp);
}

/// RETF / RETF imm16 (0xC9/0xCB, 0xC8/0xCA).
pub fn ret_far<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    cpu.ip = cpu.pop16(bus);
    let cs = cpu.pop16(bus);
    cpu.load_seg(Segment::Cs, cs);
    let sp = cpu.sp().wrapping_add(cpu.insn.imm0);
    cpu.set_sp(sp);
}

/// INT3 (0xCC): breakpoint, vector 3, return address after the opcode.
pub fn int3<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    cpu.interrupt(bus, VECTOR_BREAKPOINT);
}

/// INT imm8 (0xCD).
pub fn int_imm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let vector = cpu.insn.imm0 as u8;
    cpu.interrupt(bus, vector);
}

/// INTO (0xCE): vector 4 when the overflow flag is set.
pub fn into<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    if cpu.flags.v {
        cpu.interrupt(bus, VECTOR_OVERFLOW);
    }
}

/// IRET (0xCF): pop IP, CS, flags. The CS load arms the interrupt
/// shadow so the instruction after IRET always executes.
pub fn iret<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    cpu.ip = cpu.pop16(bus);
    let cs = cpu.pop16(bus);
    cpu.load_seg(Segment::Cs, cs);
    let flags = cpu.pop16(bus);
    cpu.flags.set_word(flags);
}

/// LOOP/LOOPZ/LOOPNZ rel8 (0xE2, 0xE1, 0xE0).
pub fn loop_cx(cpu: &mut Cpu, kind: LoopCond) {
    let cx = cpu.cx().wrapping_sub(1);
    cpu.set_cx(cx);
    let go = cx != 0
        && match kind {
            LoopCond::NotZero => !cpu.flags.z,
            LoopCond::Zero => cpu.flags.z,
            LoopCond::Always => true,
        };
    if go {
        cpu.ip = cpu.ip.wrapping_add(cpu.insn.imm0);
    }
}

/// JCXZ rel8 (0xE3).
pub fn jcxz(cpu: &mut Cpu) {
    if cpu.cx() == 0 {
        cpu.ip = cpu.ip.wrapping_add(cpu.insn.imm0);
    }
}
