//! Prefix handlers
//!
//! Prefixes set decoder latches and retire without clearing them; the
//! latches last until the next non-prefix opcode retires.

use crate::cpu::state::Segment;
use crate::cpu::Cpu;

/// Segment override (0x26, 0x2E, 0x36, 0x3E).
pub fn segment_override(cpu: &mut Cpu, seg: Segment) {
    cpu.insn.segment = Some(seg);
}

/// REP/REPE (0xF3).
pub fn rep_eq(cpu: &mut Cpu) {
    cpu.insn.repeat_eq = true;
    cpu.insn.repeat_ne = false;
}

/// REPNE (0xF2).
pub fn rep_ne(cpu: &mut Cpu) {
    cpu.insn.repeat_eq = false;
    cpu.insn.repeat_ne = true;
}
