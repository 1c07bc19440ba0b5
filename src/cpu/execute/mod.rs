//! Instruction execution
//!
//! One module per instruction family. Handlers are free functions over
//! `(cpu, bus)`; the dispatcher is an exhaustive match on the decoded
//! operation, so every extended opcode lands in exactly one arm.

pub mod arithmetic;
pub mod bcd;
pub mod control_flow;
pub mod data_transfer;
pub mod flags;
pub mod io;
pub mod logic;
pub mod prefix;
pub mod shift;
pub mod stack;
pub mod string;

use crate::bus::Bus;
use crate::cpu::decode::{Op, OPCODES};
use crate::cpu::Cpu;

/// Execute the decoded instruction.
pub(crate) fn dispatch<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    match OPCODES[cpu.insn.opcode as usize] {
        // Group entries are rewritten to their sub-opcode row at decode
        Op::Group(_) => unreachable!("group opcode reached dispatch"),

        Op::Alu(op) => arithmetic::alu_rm(cpu, bus, op),
        Op::AluAccImm(op) => arithmetic::alu_acc_imm(cpu, op),
        Op::AluRmImm(op) => arithmetic::alu_rm_imm(cpu, bus, op),
        Op::TestRmReg => logic::test_rm_reg(cpu, bus),
        Op::TestAccImm => logic::test_acc_imm(cpu),
        Op::TestRmImm => logic::test_rm_imm(cpu, bus),
        Op::Not => logic::not(cpu, bus),
        Op::Neg => arithmetic::neg(cpu, bus),
        Op::Mul => arithmetic::mul(cpu, bus),
        Op::Imul => arithmetic::imul(cpu, bus),
        Op::Div => arithmetic::div(cpu, bus),
        Op::Idiv => arithmetic::idiv(cpu, bus),
        Op::IncReg => arithmetic::inc_reg(cpu),
        Op::DecReg => arithmetic::dec_reg(cpu),
        Op::IncRm => arithmetic::inc_rm(cpu, bus),
        Op::DecRm => arithmetic::dec_rm(cpu, bus),
        Op::Shift(op, count) => shift::shift(cpu, bus, op, count),

        Op::Daa => bcd::daa(cpu),
        Op::Das => bcd::das(cpu),
        Op::Aaa => bcd::aaa(cpu),
        Op::Aas => bcd::aas(cpu),
        Op::Aam => bcd::aam(cpu, bus),
        Op::Aad => bcd::aad(cpu),
        Op::Cbw => bcd::cbw(cpu),
        Op::Cwd => bcd::cwd(cpu),

        Op::MovRmReg => data_transfer::mov_rm_reg(cpu, bus),
        Op::MovSegRm => data_transfer::mov_seg_rm(cpu, bus),
        Op::MovAccMem => data_transfer::mov_acc_mem(cpu, bus),
        Op::MovRegImm => data_transfer::mov_reg_imm(cpu),
        Op::MovRmImm => data_transfer::mov_rm_imm(cpu, bus),
        Op::Lea => data_transfer::lea(cpu, bus),
        Op::Lds => data_transfer::lds(cpu, bus),
        Op::Les => data_transfer::les(cpu, bus),
        Op::XchgRmReg => data_transfer::xchg_rm_reg(cpu, bus),
        Op::XchgAccReg => data_transfer::xchg_acc_reg(cpu),
        Op::Xlat => data_transfer::xlat(cpu, bus),
        Op::Lahf => data_transfer::lahf(cpu),
        Op::Sahf => data_transfer::sahf(cpu),

        Op::PushReg => stack::push_reg(cpu, bus),
        Op::PushSp => stack::push_sp(cpu, bus),
        Op::PopReg => stack::pop_reg(cpu, bus),
        Op::PushSeg(seg) => stack::push_seg(cpu, bus, seg),
        Op::PopSeg(seg) => stack::pop_seg(cpu, bus, seg),
        Op::PushRm => stack::push_rm(cpu, bus),
        Op::PopRm => stack::pop_rm(cpu, bus),
        Op::Pushf => stack::pushf(cpu, bus),
        Op::Popf => stack::popf(cpu, bus),

        Op::Jcc(cond, expected) => control_flow::jcc(cpu, cond, expected),
        Op::JmpRel => control_flow::jmp_rel(cpu),
        Op::JmpFar => control_flow::jmp_far(cpu),
        Op::JmpRm => control_flow::jmp_rm(cpu, bus),
        Op::JmpFarRm => control_flow::jmp_far_rm(cpu, bus),
        Op::CallRel => control_flow::call_rel(cpu, bus),
        Op::CallFar => control_flow::call_far(cpu, bus),
        Op::CallRm => control_flow::call_rm(cpu, bus),
        Op::CallFarRm => control_flow::call_far_rm(cpu, bus),
        Op::RetNear => control_flow::ret_near(cpu, bus),
        Op::RetFar => control_flow::ret_far(cpu, bus),
        Op::Int3 => control_flow::int3(cpu, bus),
        Op::IntImm => control_flow::int_imm(cpu, bus),
        Op::Into => control_flow::into(cpu, bus),
        Op::Iret => control_flow::iret(cpu, bus),
        Op::Loop(kind) => control_flow::loop_cx(cpu, kind),
        Op::Jcxz => control_flow::jcxz(cpu),

        Op::Movs => string::movs(cpu, bus),
        Op::Cmps => string::cmps(cpu, bus),
        Op::Scas => string::scas(cpu, bus),
        Op::Lods => string::lods(cpu, bus),
        Op::Stos => string::stos(cpu, bus),

        Op::InImm => io::in_imm(cpu, bus),
        Op::InDx => io::in_dx(cpu, bus),
        Op::OutImm => io::out_imm(cpu, bus),
        Op::OutDx => io::out_dx(cpu, bus),

        Op::SegPrefix(seg) => prefix::segment_override(cpu, seg),
        Op::RepEq => prefix::rep_eq(cpu),
        Op::RepNe => prefix::rep_ne(cpu),
        // LOCK asserts a bus signal on real hardware; there is no bus
        // arbitration here. WAIT pairs with a coprocessor that is not
        // modeled. ESC already consumed its ModR/M byte.
        Op::Lock | Op::Wait | Op::Esc => {}

        Op::Clc => flags::clc(cpu),
        Op::Stc => flags::stc(cpu),
        Op::Cli => flags::cli(cpu),
        Op::Sti => flags::sti(cpu),
        Op::Cld => flags::cld(cpu),
        Op::Std => flags::std(cpu),
        Op::Cmc => flags::cmc(cpu),

        Op::Undefined => undefined(cpu, bus),
    }
}

/// Route an undefined opcode to the environment hook.
pub(crate) fn undefined<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    log::trace!("undefined opcode {:#05x}", cpu.insn.opcode);
    bus.undefined_opcode(cpu.insn.opcode);
}
