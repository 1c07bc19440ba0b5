//! Shift and rotate handlers
//!
//! The four group opcodes 0xD0..0xD3 share one handler: the sub-op
//! picks the primitive, the count source is either a literal 1 or CL.
//! A zero count from CL leaves the operand and every flag untouched.

use crate::bus::Bus;
use crate::cpu::alu;
use crate::cpu::decode::{ShiftCount, ShiftOp};
use crate::cpu::Cpu;

pub fn shift<B: Bus>(cpu: &mut Cpu, bus: &mut B, op: ShiftOp, count: ShiftCount) {
    let n = match count {
        ShiftCount::One => 1,
        ShiftCount::Cl => cpu.cl() as u32,
    };
    if n == 0 {
        return;
    }
    let w = cpu.insn.width();
    let a = cpu.read_rm(bus) as u32;
    let x = match op {
        ShiftOp::Rol => alu::rol(&mut cpu.flags, w, a, n),
        ShiftOp::Ror => alu::ror(&mut cpu.flags, w, a, n),
        ShiftOp::Rcl => alu::rcl(&mut cpu.flags, w, a, n),
        ShiftOp::Rcr => alu::rcr(&mut cpu.flags, w, a, n),
        ShiftOp::Shl => alu::shl(&mut cpu.flags, w, a, n),
        ShiftOp::Shr => alu::shr(&mut cpu.flags, w, a, n),
        ShiftOp::Sar => alu::sar(&mut cpu.flags, w, a, n),
    };
    cpu.write_rm(bus, x);
}
