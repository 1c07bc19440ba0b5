//! Opcode dispatch and attribute tables
//!
//! Dispatch is keyed by an extended opcode index: 0..256 are the
//! primary opcodes, 256..352 encode the eight sub-operations of the
//! twelve group opcodes (0x80..0x83, 0xD0..0xD3, 0xF6, 0xF7, 0xFE,
//! 0xFF) as `256 + group * 8 + reg`. Two parallel tables cover the
//! whole range: `OPCODES` names the operation and its variant, and
//! `OPFLAGS` tells the decoder what to fetch before executing it.
//! Group rows carry empty flags; their fetch behavior comes from the
//! primary entry that redirected to them.

use bitflags::bitflags;

use crate::cpu::state::Segment;

/// Number of extended dispatch slots.
pub const OPCODE_COUNT: usize = 352;

/// First group sub-opcode index.
pub const GROUP_BASE: u16 = 256;

bitflags! {
    /// Per-opcode decode attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpFlags: u16 {
        /// Opcode is followed by a ModR/M byte
        const MODRM = 1 << 0;
        /// 16-bit operation (8-bit when clear)
        const WIDE = 1 << 1;
        /// Operand direction is r/m <- reg
        const REV = 1 << 2;
        /// The reg field selects a segment register
        const RSEG = 1 << 3;
        /// Use the first immediate as part of the effective address
        const EA_IMM0 = 1 << 4;
        /// Apply a segment base to the effective address
        const EA_SEG = 1 << 5;
        /// Leave the effective address as a bare offset (LEA)
        const NO_SEG = 1 << 6;
        /// Opcode is a prefix: retire without clearing decoder latches
        const PREFIX = 1 << 7;
        /// Low three opcode bits select the operand-0 register
        const REG_LOW3 = 1 << 8;
        /// Fetch a sign-extended byte as the first immediate
        const IMM0_B = 1 << 9;
        /// Fetch a word as the first immediate
        const IMM0_W = 1 << 10;
        /// Fetch a sign-extended byte as the second immediate
        const IMM1_B = 1 << 11;
        /// Fetch a word as the second immediate
        const IMM1_W = 1 << 12;
    }
}

// Composite attribute sets, named for the operand shapes they decode.
impl OpFlags {
    /// r/m8, r8 / r8, r/m8 and the word forms
    const RMBF: OpFlags = OpFlags::MODRM;
    const RMWF: OpFlags = OpFlags::MODRM.union(OpFlags::WIDE);
    const RMBR: OpFlags = OpFlags::RMBF.union(OpFlags::REV);
    const RMWR: OpFlags = OpFlags::RMWF.union(OpFlags::REV);
    /// AL, imm8 / AX, imm16
    const AIB: OpFlags = OpFlags::IMM0_B;
    const AIW: OpFlags = OpFlags::IMM0_W.union(OpFlags::WIDE);
    /// r/m, imm following a ModR/M
    const RMIB: OpFlags = OpFlags::RMBF.union(OpFlags::IMM1_B);
    const RMIW: OpFlags = OpFlags::RMWF.union(OpFlags::IMM1_W);
    /// Register encoded in the low opcode bits
    const R3W: OpFlags = OpFlags::REG_LOW3.union(OpFlags::WIDE);
    const R3IB: OpFlags = OpFlags::REG_LOW3.union(OpFlags::IMM0_B);
    const R3IW: OpFlags = OpFlags::R3W.union(OpFlags::IMM0_W);
    /// Relative branch targets and far pointers
    const REL8: OpFlags = OpFlags::IMM0_B;
    const REL16: OpFlags = OpFlags::IMM0_W;
    const FAR: OpFlags = OpFlags::IMM0_W.union(OpFlags::IMM1_W);
    /// Segment-register ModR/M forms (always 16-bit)
    const SEGF: OpFlags = OpFlags::RMWF.union(OpFlags::RSEG);
    const SEGR: OpFlags = OpFlags::SEGF.union(OpFlags::REV);
    /// Accumulator <-> direct memory address
    const AMB: OpFlags = OpFlags::EA_SEG.union(OpFlags::EA_IMM0).union(OpFlags::IMM0_W);
    const AMW: OpFlags = OpFlags::AMB.union(OpFlags::WIDE);
    const AMBR: OpFlags = OpFlags::AMB.union(OpFlags::REV);
    const AMWR: OpFlags = OpFlags::AMW.union(OpFlags::REV);
    /// IN/OUT with an immediate port
    const PIB: OpFlags = OpFlags::IMM0_B;
    const PIW: OpFlags = OpFlags::IMM0_B.union(OpFlags::WIDE);
    const W8: OpFlags = OpFlags::empty();
    const W16: OpFlags = OpFlags::WIDE;
    /// Immediate ALU groups: byte, word, and sign-extended-byte-to-word
    const GRP_IB: OpFlags = OpFlags::RMBF.union(OpFlags::IMM1_B);
    const GRP_IW: OpFlags = OpFlags::RMWF.union(OpFlags::IMM1_W);
    const GRP_IS: OpFlags = OpFlags::RMWF.union(OpFlags::IMM1_B);
}

/// Eight-way ALU operation selector, in opcode-row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Or,
    Adc,
    Sbb,
    And,
    Sub,
    Xor,
    Cmp,
}

/// Shift/rotate operation selector, in group sub-opcode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Rol,
    Ror,
    Rcl,
    Rcr,
    Shl,
    Shr,
    Sar,
}

/// Shift count source: a literal 1 or the CL register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftCount {
    One,
    Cl,
}

/// Branch condition, tested against an expected truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    /// Overflow set
    O,
    /// Carry set (below)
    C,
    /// Zero set (equal)
    Z,
    /// Carry or zero (below or equal)
    Be,
    /// Sign set
    S,
    /// Parity set
    P,
    /// Sign != overflow (less)
    L,
    /// Less or zero (less or equal)
    Le,
}

/// LOOP family terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCond {
    /// LOOPNZ: continue while CX != 0 and ZF clear
    NotZero,
    /// LOOPZ: continue while CX != 0 and ZF set
    Zero,
    /// LOOP: continue while CX != 0
    Always,
}

/// Dispatch operations. One variant per logical operation; width,
/// direction and addressing shape come from the parallel flags table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Redirect to group row `256 + n * 8 + reg`
    Group(u8),

    // ALU
    Alu(AluOp),
    AluAccImm(AluOp),
    AluRmImm(AluOp),
    TestRmReg,
    TestAccImm,
    TestRmImm,
    Not,
    Neg,
    Mul,
    Imul,
    Div,
    Idiv,
    IncReg,
    DecReg,
    IncRm,
    DecRm,
    Shift(ShiftOp, ShiftCount),

    // BCD and width conversions
    Daa,
    Das,
    Aaa,
    Aas,
    Aam,
    Aad,
    Cbw,
    Cwd,

    // Data transfer
    MovRmReg,
    MovSegRm,
    MovAccMem,
    MovRegImm,
    MovRmImm,
    Lea,
    Lds,
    Les,
    XchgRmReg,
    XchgAccReg,
    Xlat,
    Lahf,
    Sahf,

    // Stack
    PushReg,
    PushSp,
    PopReg,
    PushSeg(Segment),
    PopSeg(Segment),
    PushRm,
    PopRm,
    Pushf,
    Popf,

    // Control flow
    Jcc(Cond, bool),
    JmpRel,
    JmpFar,
    JmpRm,
    JmpFarRm,
    CallRel,
    CallFar,
    CallRm,
    CallFarRm,
    RetNear,
    RetFar,
    Int3,
    IntImm,
    Into,
    Iret,
    Loop(LoopCond),
    Jcxz,

    // String
    Movs,
    Cmps,
    Scas,
    Lods,
    Stos,

    // I/O
    InImm,
    InDx,
    OutImm,
    OutDx,

    // Prefixes and no-ops
    SegPrefix(Segment),
    RepEq,
    RepNe,
    Lock,
    Wait,
    Esc,

    // Flag manipulation
    Clc,
    Stc,
    Cli,
    Sti,
    Cld,
    Std,
    Cmc,

    Undefined,
}

use AluOp::*;
use Cond::*;
use Op::*;
use Segment::{Cs, Ds, Es, Ss};
use ShiftCount::{Cl, One};
use ShiftOp::*;

/// Operation table, keyed by extended opcode.
#[rustfmt::skip]
pub static OPCODES: [Op; OPCODE_COUNT] = [
    // 0x00: ADD, OR, push/pop ES/CS
    Alu(Add), Alu(Add), Alu(Add), Alu(Add), AluAccImm(Add), AluAccImm(Add), PushSeg(Es), PopSeg(Es),
    Alu(Or), Alu(Or), Alu(Or), Alu(Or), AluAccImm(Or), AluAccImm(Or), PushSeg(Cs), PopSeg(Cs),
    // 0x10: ADC, SBB, push/pop SS/DS
    Alu(Adc), Alu(Adc), Alu(Adc), Alu(Adc), AluAccImm(Adc), AluAccImm(Adc), PushSeg(Ss), PopSeg(Ss),
    Alu(Sbb), Alu(Sbb), Alu(Sbb), Alu(Sbb), AluAccImm(Sbb), AluAccImm(Sbb), PushSeg(Ds), PopSeg(Ds),
    // 0x20: AND, SUB, segment overrides, decimal adjust
    Alu(And), Alu(And), Alu(And), Alu(And), AluAccImm(And), AluAccImm(And), SegPrefix(Es), Daa,
    Alu(Sub), Alu(Sub), Alu(Sub), Alu(Sub), AluAccImm(Sub), AluAccImm(Sub), SegPrefix(Cs), Das,
    // 0x30: XOR, CMP, segment overrides, ASCII adjust
    Alu(Xor), Alu(Xor), Alu(Xor), Alu(Xor), AluAccImm(Xor), AluAccImm(Xor), SegPrefix(Ss), Aaa,
    Alu(Cmp), Alu(Cmp), Alu(Cmp), Alu(Cmp), AluAccImm(Cmp), AluAccImm(Cmp), SegPrefix(Ds), Aas,
    // 0x40: INC/DEC r16
    IncReg, IncReg, IncReg, IncReg, IncReg, IncReg, IncReg, IncReg,
    DecReg, DecReg, DecReg, DecReg, DecReg, DecReg, DecReg, DecReg,
    // 0x50: PUSH/POP r16 (PUSH SP stores the decremented value)
    PushReg, PushReg, PushReg, PushReg, PushSp, PushReg, PushReg, PushReg,
    PopReg, PopReg, PopReg, PopReg, PopReg, PopReg, PopReg, PopReg,
    // 0x60: not present on the 8086 (each still consumes a byte)
    Undefined, Undefined, Undefined, Undefined, Undefined, Undefined, Undefined, Undefined,
    Undefined, Undefined, Undefined, Undefined, Undefined, Undefined, Undefined, Undefined,
    // 0x70: conditional short jumps
    Jcc(O, true), Jcc(O, false), Jcc(C, true), Jcc(C, false),
    Jcc(Z, true), Jcc(Z, false), Jcc(Be, true), Jcc(Be, false),
    Jcc(S, true), Jcc(S, false), Jcc(P, true), Jcc(P, false),
    Jcc(L, true), Jcc(L, false), Jcc(Le, true), Jcc(Le, false),
    // 0x80: immediate ALU groups, TEST, XCHG, MOV, LEA, POP r/m
    Group(0), Group(1), Group(2), Group(3), TestRmReg, TestRmReg, XchgRmReg, XchgRmReg,
    MovRmReg, MovRmReg, MovRmReg, MovRmReg, MovSegRm, Lea, MovSegRm, PopRm,
    // 0x90: XCHG AX, conversions, far call, flags transfer
    XchgAccReg, XchgAccReg, XchgAccReg, XchgAccReg, XchgAccReg, XchgAccReg, XchgAccReg, XchgAccReg,
    Cbw, Cwd, CallFar, Wait, Pushf, Popf, Sahf, Lahf,
    // 0xA0: accumulator moves, string ops, TEST acc
    MovAccMem, MovAccMem, MovAccMem, MovAccMem, Movs, Movs, Cmps, Cmps,
    TestAccImm, TestAccImm, Stos, Stos, Lods, Lods, Scas, Scas,
    // 0xB0: MOV r, imm
    MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm,
    MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm, MovRegImm,
    // 0xC0: returns, LES/LDS, MOV r/m imm, INT family
    RetNear, RetNear, RetNear, RetNear, Les, Lds, MovRmImm, MovRmImm,
    RetFar, RetFar, RetFar, RetFar, Int3, IntImm, Into, Iret,
    // 0xD0: shift groups, AAM/AAD, XLAT, coprocessor escapes
    Group(4), Group(5), Group(6), Group(7), Aam, Aad, Undefined, Xlat,
    Esc, Esc, Esc, Esc, Esc, Esc, Esc, Esc,
    // 0xE0: loops, port I/O, calls and jumps
    Loop(LoopCond::NotZero), Loop(LoopCond::Zero), Loop(LoopCond::Always), Jcxz,
    InImm, InImm, OutImm, OutImm,
    CallRel, JmpRel, JmpFar, JmpRel, InDx, InDx, OutDx, OutDx,
    // 0xF0: prefixes, CMC, unary/misc groups, flag ops
    Lock, Undefined, RepNe, RepEq, Undefined, Cmc, Group(8), Group(9),
    Clc, Stc, Cli, Sti, Cld, Std, Group(10), Group(11),

    // 0x100: group 0-3 (0x80..0x83), ALU r/m, imm
    AluRmImm(Add), AluRmImm(Or), AluRmImm(Adc), AluRmImm(Sbb),
    AluRmImm(And), AluRmImm(Sub), AluRmImm(Xor), AluRmImm(Cmp),
    AluRmImm(Add), AluRmImm(Or), AluRmImm(Adc), AluRmImm(Sbb),
    AluRmImm(And), AluRmImm(Sub), AluRmImm(Xor), AluRmImm(Cmp),
    AluRmImm(Add), AluRmImm(Or), AluRmImm(Adc), AluRmImm(Sbb),
    AluRmImm(And), AluRmImm(Sub), AluRmImm(Xor), AluRmImm(Cmp),
    AluRmImm(Add), AluRmImm(Or), AluRmImm(Adc), AluRmImm(Sbb),
    AluRmImm(And), AluRmImm(Sub), AluRmImm(Xor), AluRmImm(Cmp),
    // 0x120: group 4-7 (0xD0..0xD3), shifts by 1 and by CL
    Shift(Rol, One), Shift(Ror, One), Shift(Rcl, One), Shift(Rcr, One),
    Shift(Shl, One), Shift(Shr, One), Shift(Shl, One), Shift(Sar, One),
    Shift(Rol, One), Shift(Ror, One), Shift(Rcl, One), Shift(Rcr, One),
    Shift(Shl, One), Shift(Shr, One), Shift(Shl, One), Shift(Sar, One),
    Shift(Rol, Cl), Shift(Ror, Cl), Shift(Rcl, Cl), Shift(Rcr, Cl),
    Shift(Shl, Cl), Shift(Shr, Cl), Shift(Shl, Cl), Shift(Sar, Cl),
    Shift(Rol, Cl), Shift(Ror, Cl), Shift(Rcl, Cl), Shift(Rcr, Cl),
    Shift(Shl, Cl), Shift(Shr, Cl), Shift(Shl, Cl), Shift(Sar, Cl),
    // 0x140: group 8-9 (0xF6, 0xF7), unary arithmetic
    TestRmImm, TestRmImm, Not, Neg, Mul, Imul, Div, Idiv,
    TestRmImm, TestRmImm, Not, Neg, Mul, Imul, Div, Idiv,
    // 0x150: group 10-11 (0xFE, 0xFF), INC/DEC and indirect flow
    IncRm, DecRm, Undefined, Undefined, Undefined, Undefined, Undefined, Undefined,
    IncRm, DecRm, CallRm, CallFarRm, JmpRm, JmpFarRm, PushRm, PushRm,
];

/// Decode attribute table, keyed by extended opcode. Group rows are
/// empty; the primary opcode already configured the decoder.
#[rustfmt::skip]
pub static OPFLAGS: [OpFlags; OPCODE_COUNT] = {
    use OpFlags as F;
    const E: OpFlags = OpFlags::empty();
    [
    // 0x00
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, E, E,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, E, E,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, E, E,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, E, E,
    // 0x20
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, F::PREFIX, E,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, F::PREFIX, E,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, F::PREFIX, E,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::AIB, F::AIW, F::PREFIX, E,
    // 0x40
    F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W,
    F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W,
    F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W,
    F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W,
    // 0x60
    F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8,
    F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8,
    F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8,
    F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8, F::REL8,
    // 0x80
    F::GRP_IB, F::GRP_IW, F::GRP_IB, F::GRP_IS, F::RMBF, F::RMWF, F::RMBF, F::RMWF,
    F::RMBR, F::RMWR, F::RMBF, F::RMWF, F::SEGR, F::RMWF.union(F::NO_SEG), F::SEGF, F::RMWF,
    F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W, F::R3W,
    E, E, F::FAR, E, E, E, E, E,
    // 0xA0
    F::AMB, F::AMW, F::AMBR, F::AMWR, F::W8, F::W16, F::W8, F::W16,
    F::AIB, F::AIW, F::W8, F::W16, F::W8, F::W16, F::W8, F::W16,
    F::R3IB, F::R3IB, F::R3IB, F::R3IB, F::R3IB, F::R3IB, F::R3IB, F::R3IB,
    F::R3IW, F::R3IW, F::R3IW, F::R3IW, F::R3IW, F::R3IW, F::R3IW, F::R3IW,
    // 0xC0
    F::REL16, E, F::REL16, E, F::RMWF, F::RMWF, F::RMIB, F::RMIW,
    F::REL16, E, F::REL16, E, E, F::IMM0_B, E, E,
    F::RMBF, F::RMWF, F::RMBF, F::RMWF, F::IMM0_B, F::IMM0_B, E, E,
    F::MODRM, F::MODRM, F::MODRM, F::MODRM, F::MODRM, F::MODRM, F::MODRM, F::MODRM,
    // 0xE0
    F::REL8, F::REL8, F::REL8, F::REL8, F::PIB, F::PIW, F::PIB, F::PIW,
    F::REL16, F::REL16, F::FAR, F::REL8, F::W8, F::W16, F::W8, F::W16,
    F::PREFIX, E, F::PREFIX, F::PREFIX, E, E, F::RMBF, F::RMWF,
    E, E, E, E, E, E, F::RMBF, F::RMWF,
    // 0x100: group rows
    E, E, E, E, E, E, E, E, E, E, E, E, E, E, E, E,
    E, E, E, E, E, E, E, E, E, E, E, E, E, E, E, E,
    E, E, E, E, E, E, E, E, E, E, E, E, E, E, E, E,
    E, E, E, E, E, E, E, E, E, E, E, E, E, E, E, E,
    E, E, E, E, E, E, E, E, E, E, E, E, E, E, E, E,
    E, E, E, E, E, E, E, E, E, E, E, E, E, E, E, E,
    ]
};
