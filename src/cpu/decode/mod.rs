//! Instruction decoding: opcode dispatch tables and ModR/M handling

pub mod modrm;
pub mod opcodes;

pub use modrm::ModRm;
pub use opcodes::{
    AluOp, Cond, LoopCond, Op, OpFlags, ShiftCount, ShiftOp, GROUP_BASE, OPCODES, OPFLAGS,
};
