//! 8086 CPU core
//!
//! `state` owns the registers and the tick loop, `decode` the dispatch
//! tables and ModR/M handling, `execute` the per-family handlers, and
//! `alu` the flag-exact primitives they all share.

pub mod alu;
pub mod decode;
pub mod execute;
pub mod flags;
pub mod harness;
pub mod state;

pub use harness::CpuHarness;
pub use state::{Cpu, Reg, Segment};
