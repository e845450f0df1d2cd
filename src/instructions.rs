use crate::cpu::Cpu;
use crate::error::Result;
use crate::flags::StatusFlags;

/// What an opcode does once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// No operand and no effect.
    Null,
    Nop,
    /// Fetch the next byte into `register`, raising N and Z.
    LoadImmediate { register: &'static str },
}

impl Instruction {
    pub fn execute(self, cpu: &mut Cpu, _opcode: u8) -> Result<()> {
        match self {
            Instruction::Null | Instruction::Nop => Ok(()),
            Instruction::LoadImmediate { register } => {
                let data = cpu.memory().read_next()?;
                cpu.registers_mut().set(register, data);
                // Flags are only ever raised here, never cleared
                cpu.state_mut().raise_flags(StatusFlags::for_value(data));
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub mnemonic: &'static str,
    pub instruction: Instruction,
}

/// Opcode to instruction mapping, one slot per opcode byte.
#[derive(Debug, Clone)]
pub struct InstructionTable {
    entries: [Option<TableEntry>; 256],
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionTable {
    pub fn new() -> Self {
        InstructionTable {
            entries: [None; 256],
        }
    }

    /// Adds `opcode` to the table.
    ///
    /// # Panics
    ///
    /// If `opcode` already has an instruction.
    pub fn define(mut self, opcode: u8, mnemonic: &'static str, instruction: Instruction) -> Self {
        let slot = &mut self.entries[opcode as usize];
        assert!(slot.is_none(), "opcode ${:02X} defined twice", opcode);
        *slot = Some(TableEntry { mnemonic, instruction });
        self
    }

    pub fn lookup(&self, opcode: u8) -> Option<&TableEntry> {
        self.entries[opcode as usize].as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Defined opcodes in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(opcode, _)| opcode as u8)
    }

    pub fn mnemonic(&self, opcode: u8) -> &'static str {
        self.lookup(opcode).map_or("UNKNOWN", |entry| entry.mnemonic)
    }
}
