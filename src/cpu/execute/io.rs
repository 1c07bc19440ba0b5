//! Port I/O handlers
//!
//! The instruction width selects between the 8-bit and 16-bit port
//! spaces. Immediate forms address ports 0..255; the DX forms reach
//! the full 64K space.

use crate::bus::Bus;
use crate::cpu::alu::Width;
use crate::cpu::Cpu;

/// IN AL/AX, imm8 (0xE4, 0xE5).
pub fn in_imm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let port = cpu.insn.imm0 & 0x00FF;
    match cpu.insn.width() {
        Width::Byte => {
            let v = bus.io_read8(port);
            cpu.set_al(v);
        }
        Width::Word => {
            let v = bus.io_read16(port);
            cpu.set_ax(v);
        }
    }
}

/// IN AL/AX, DX (0xEC, 0xED).
pub fn in_dx<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let port = cpu.dx();
    match cpu.insn.width() {
        Width::Byte => {
            let v = bus.io_read8(port);
            cpu.set_al(v);
        }
        Width::Word => {
            let v = bus.io_read16(port);
            cpu.set_ax(v);
        }
    }
}

/// OUT imm8, AL/AX (0xE6, 0xE7).
pub fn out_imm<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let port = cpu.insn.imm0 & 0x00FF;
    match cpu.insn.width() {
        Width::Byte => bus.io_write8(port, cpu.al()),
        Width::Word => bus.io_write16(port, cpu.ax()),
    }
}

/// OUT DX, AL/AX (0xEE, 0xEF).
pub fn out_dx<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
    let port = cpu.dx();
    match cpu.insn.width() {
        Width::Byte => bus.io_write8(port, cpu.al()),
        Width::Word => bus.io_write16(port, cpu.ax()),
    }
}
