//! Flag manipulation handlers: CLC/STC/CMC, CLI/STI, CLD/STD.

use crate::cpu::Cpu;

/// CLC (0xF8): clear carry.
pub fn clc(cpu: &mut Cpu) {
    cpu.flags.c = false;
}

/// STC (0xF9): set carry.
pub fn stc(cpu: &mut Cpu) {
    cpu.flags.c = true;
}

/// CLI (0xFA): disable maskable interrupts.
pub fn cli(cpu: &mut Cpu) {
    cpu.flags.i = false;
}

/// STI (0xFB): enable maskable interrupts.
pub fn sti(cpu: &mut Cpu) {
    cpu.flags.i = true;
}

/// CLD (0xFC): string operations count up.
pub fn cld(cpu: &mut Cpu) {
    cpu.flags.d = false;
}

/// STD (0xFD): string operations count down.
pub fn std(cpu: &mut Cpu) {
    cpu.flags.d = true;
}

/// CMC (0xF5): complement carry.
pub fn cmc(cpu: &mut Cpu) {
    cpu.flags.c = !cpu.flags.c;
}
