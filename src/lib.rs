//! # cpucore
//!
//! The execution core of a byte-oriented microprocessor: CPU state, a
//! cycle-counted memory bank, a named register file and an opcode dispatch
//! engine that fetches, decodes and executes one instruction at a time.
//!
//! Every memory access made through the CPU's [`MemoryBank`] charges the
//! cycle counter, one cycle per byte. Concrete processors are supplied as
//! [`MachineVariant`]s; [`Mos6502`] is a small 6502 profile with immediate
//! loads into A, X and Y.
//!
//! ## Example
//!
//! ```rust
//! use cpucore::{ExecutionEngine, MachineVariant, Mos6502};
//!
//! let mut cpu = Mos6502::new_cpu().unwrap();
//!
//! // LDA #$12
//! cpu.memory().write(0x0000, 0xA9).unwrap();
//! cpu.memory().write(0x0001, 0x12).unwrap();
//!
//! cpu.step().unwrap();
//!
//! assert_eq!(cpu.registers().get::<u8>("A").unwrap(), 0x12);
//! assert_eq!(cpu.state().pc, 2);
//! // Two pokes and two fetches
//! assert_eq!(cpu.state().cycles, 4);
//! ```

pub mod config;
pub mod cpu;
pub mod error;
pub mod flags;
pub mod instructions;
pub mod machines;
pub mod memory;
pub mod metrics;
pub mod registers;
pub mod runtime;
pub mod snapshots;
pub mod state;

pub use config::MachineConfig;
pub use cpu::{Cpu, ExecutionEngine};
pub use error::{ConfigError, CpuError, Result};
pub use flags::StatusFlags;
pub use instructions::{Instruction, InstructionTable};
pub use machines::{MachineVariant, Mos6502};
pub use memory::{Memory, MemoryBank};
pub use registers::{RegisterFile, RegisterKind, RegisterType, RegisterValue};
pub use runtime::{RunState, Transition};
pub use snapshots::CpuSnapshot;
pub use state::CpuState;
