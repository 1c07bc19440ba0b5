//! Instruction-level Intel 8086 emulator core
//!
//! One call to [`Cpu::tick`] advances the processor by one instruction
//! (or one element of a repeated string instruction), applying the
//! same register, flag, and memory side effects a real 8086 would.
//! The environment supplies memory, two port spaces and the undefined
//! opcode hook through the [`Bus`] trait; interrupt requests arrive
//! through [`Cpu::irq`] and [`Cpu::nmi`].
//!
//! Out of scope, by design: cycle timing, the prefetch queue, 80186+
//! opcodes, the x87, and protected mode. Peripherals live on the other
//! side of the bus.

pub mod bus;
pub mod cpu;
pub mod memory;
pub mod runner;

pub use bus::Bus;
pub use cpu::harness::{CpuHarness, HarnessBus};
pub use cpu::{Cpu, Reg, Segment};
pub use memory::Ram;
