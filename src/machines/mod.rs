//! Concrete processor profiles.

pub mod mos6502;

pub use mos6502::Mos6502;

use crate::config::MachineConfig;
use crate::cpu::Cpu;
use crate::error::Result;
use crate::instructions::InstructionTable;

/// A processor profile: its instruction table and default machine layout.
pub trait MachineVariant {
    const NAME: &'static str;

    fn instruction_table() -> &'static InstructionTable;

    fn config() -> MachineConfig;

    fn new_cpu() -> Result<Cpu> {
        Self::new_cpu_with(Self::config())
    }

    fn new_cpu_with(config: MachineConfig) -> Result<Cpu> {
        Cpu::new(Self::NAME, Self::instruction_table(), config)
    }
}
