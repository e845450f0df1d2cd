use lazy_static::lazy_static;

use crate::config::MachineConfig;
use crate::instructions::{Instruction, InstructionTable};
use crate::machines::MachineVariant;

lazy_static! {
    /// Opcodes understood by the 6502 profile, shared by every instance.
    pub static ref MOS6502_TABLE: InstructionTable = InstructionTable::new()
        .define(0x00, "NUL", Instruction::Null)
        .define(0x90, "NOP", Instruction::Nop)
        // Immediate loads
        .define(0xA9, "LDA", Instruction::LoadImmediate { register: "A" })
        .define(0xA2, "LDX", Instruction::LoadImmediate { register: "X" })
        .define(0xA0, "LDY", Instruction::LoadImmediate { register: "Y" });
}

pub const MEMORY_SIZE: usize = 4096;

pub struct Mos6502;

impl MachineVariant for Mos6502 {
    const NAME: &'static str = "MOS 6502";

    fn instruction_table() -> &'static InstructionTable {
        &MOS6502_TABLE
    }

    fn config() -> MachineConfig {
        MachineConfig {
            memory_size: MEMORY_SIZE,
            initial_pc: 0,
            initial_sp: 0,
            cycle_budget: None,
        }
    }
}
