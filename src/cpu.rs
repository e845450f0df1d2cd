use log::{debug, info, trace, warn};
use uuid::Uuid;

use crate::config::MachineConfig;
use crate::error::{CpuError, Result};
use crate::instructions::InstructionTable;
use crate::memory::{Memory, MemoryBank};
use crate::metrics::{record_error, record_instruction, record_transition, Timer};
use crate::registers::RegisterFile;
use crate::runtime::{RunState, Transition};
use crate::snapshots::CpuSnapshot;
use crate::state::CpuState;

/// Lifecycle operations every execution engine offers.
pub trait ExecutionEngine {
    /// Fetch, decode and execute a single instruction.
    fn step(&mut self) -> Result<()>;

    /// Mark the engine running and execute instructions until it stops.
    /// Blocks the caller for the whole run.
    fn startup(&mut self) -> Result<()>;

    /// Mark the engine stopped.
    fn shutdown(&mut self) -> Result<()>;
}

/// Single-threaded execution engine. Owns its state, registers and memory
/// outright; only the instruction table is shared with other CPUs of the
/// same machine.
#[derive(Debug)]
pub struct Cpu {
    id: String,
    variant: &'static str,
    config: MachineConfig,
    state: CpuState,
    registers: RegisterFile,
    memory: Memory,
    table: &'static InstructionTable,
    runtime: RunState,
}

impl Cpu {
    pub fn new(variant: &'static str, table: &'static InstructionTable, config: MachineConfig) -> Result<Self> {
        if table.is_empty() {
            return Err(CpuError::Uninitialized("instruction table"));
        }
        if config.memory_size == 0 {
            return Err(CpuError::Uninitialized("memory bank"));
        }
        config.validate()?;

        let cpu = Cpu {
            id: Uuid::new_v4().to_string(),
            variant,
            state: CpuState::new(config.initial_pc, config.initial_sp),
            registers: RegisterFile::new(),
            memory: Memory::new(config.memory_size),
            table,
            runtime: RunState::default(),
            config,
        };
        debug!(
            "{} CPU {} constructed with {} bytes of memory, {} opcodes",
            cpu.variant,
            cpu.id,
            cpu.memory.len(),
            table.len()
        );
        Ok(cpu)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn variant(&self) -> &'static str {
        self.variant
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Cycle-charging view of memory, as instructions see it.
    pub fn memory(&mut self) -> MemoryBank<'_> {
        MemoryBank::new(&mut self.memory, &mut self.state)
    }

    /// Memory without cycle accounting, for loading and inspection.
    pub fn memory_host(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_host_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn instruction_table(&self) -> &'static InstructionTable {
        self.table
    }

    pub fn run_state(&self) -> RunState {
        self.runtime
    }

    pub fn is_running(&self) -> bool {
        self.runtime.is_running()
    }

    /// Back to the configured initial PC and SP with no flags and no
    /// registers. Memory and the cycle counter are left alone.
    pub fn reset(&mut self) -> Result<()> {
        if self.runtime.is_running() {
            return Err(CpuError::InvalidState {
                state: self.runtime,
                transition: Transition::Stop,
            });
        }
        let cycles = self.state.cycles;
        self.state = CpuState::new(self.config.initial_pc, self.config.initial_sp);
        self.state.cycles = cycles;
        self.registers = RegisterFile::new();
        debug!("CPU {} reset to PC ${:04X}", self.id, self.state.pc);
        Ok(())
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot::capture(self)
    }

    fn transition(&mut self, transition: Transition) -> Result<()> {
        let next = self.runtime.apply(transition).inspect_err(|err| record_error(err.kind()))?;
        trace!("CPU {}: {:?} --{}--> {:?}", self.id, self.runtime, transition.name(), next);
        record_transition(transition.name());
        self.runtime = next;
        Ok(())
    }

    fn emulation_loop(&mut self) -> Result<()> {
        let started_at = self.state.cycles;

        while self.runtime.is_running() {
            self.step()?;

            if let Some(budget) = self.config.cycle_budget {
                if self.state.cycles - started_at >= budget {
                    debug!("CPU {} spent its budget of {} cycles", self.id, budget);
                    break;
                }
            }
        }

        Ok(())
    }
}

impl ExecutionEngine for Cpu {
    fn step(&mut self) -> Result<()> {
        let timer = Timer::new();
        let pc = self.state.pc;
        let cycles_before = self.state.cycles;

        let table = self.table;
        let opcode = self.memory().read_next().inspect_err(|err| record_error(err.kind()))?;
        let entry = match table.lookup(opcode) {
            Some(entry) => entry,
            None => {
                warn!("CPU {}: unknown opcode ${:02X} at PC ${:04X}", self.id, opcode, pc);
                let err = CpuError::UnknownOpcode { opcode, pc };
                record_error(err.kind());
                return Err(err);
            }
        };

        trace!("CPU {}: ${:04X} {} (${:02X})", self.id, pc, entry.mnemonic, opcode);
        entry
            .instruction
            .execute(self, opcode)
            .inspect_err(|err| record_error(err.kind()))?;

        record_instruction(opcode, entry.mnemonic, self.state.cycles - cycles_before, timer.elapsed());
        Ok(())
    }

    fn startup(&mut self) -> Result<()> {
        self.transition(Transition::Unlock)?;
        self.transition(Transition::Start)?;
        self.transition(Transition::Lock)?;

        info!("CPU {} starting at PC ${:04X}", self.id, self.state.pc);
        let result = self.emulation_loop();

        // Budget exhausted or a step failed: leave the engine stopped
        if self.runtime.is_running() {
            self.shutdown()?;
        }
        info!("CPU {} stopped after {} cycles", self.id, self.state.cycles);
        result
    }

    fn shutdown(&mut self) -> Result<()> {
        self.transition(Transition::Unlock)?;
        self.transition(Transition::Stop)?;
        self.transition(Transition::Lock)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::StatusFlags;
    use crate::instructions::Instruction;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref TEST_TABLE: InstructionTable = InstructionTable::new()
            .define(0xEA, "NOP", Instruction::Nop)
            .define(0xA9, "LDA", Instruction::LoadImmediate { register: "A" });
        static ref EMPTY_TABLE: InstructionTable = InstructionTable::new();
    }

    fn setup_cpu(config: MachineConfig) -> Cpu {
        Cpu::new("test", &TEST_TABLE, config).unwrap()
    }

    #[test]
    fn test_new_cpu_initial_state() {
        let cpu = setup_cpu(MachineConfig {
            initial_pc: 0x0100,
            initial_sp: 0x01FF,
            ..MachineConfig::default()
        });

        assert_eq!(cpu.state().pc, 0x0100);
        assert_eq!(cpu.state().sp, 0x01FF);
        assert_eq!(cpu.state().cycles, 0);
        assert!(cpu.state().flags.is_empty());
        assert!(cpu.registers().is_empty());
        assert_eq!(cpu.memory_host().len(), 4096);
        assert_eq!(cpu.run_state(), RunState::LockedStopped);
    }

    #[test]
    fn test_missing_dependencies() {
        assert!(matches!(
            Cpu::new("test", &EMPTY_TABLE, MachineConfig::default()),
            Err(CpuError::Uninitialized("instruction table"))
        ));

        let config = MachineConfig {
            memory_size: 0,
            ..MachineConfig::default()
        };
        assert!(matches!(
            Cpu::new("test", &TEST_TABLE, config),
            Err(CpuError::Uninitialized("memory bank"))
        ));
    }

    #[test]
    fn test_step_load_immediate() {
        let mut cpu = setup_cpu(MachineConfig::default());
        cpu.memory_host_mut().load(0, &[0xA9, 0x80]).unwrap();

        cpu.step().unwrap();

        assert_eq!(cpu.registers().get::<u8>("A").unwrap(), 0x80);
        assert_eq!(cpu.state().pc, 2);
        assert_eq!(cpu.state().cycles, 2);
        assert!(cpu.state().get_flag(StatusFlags::NEGATIVE));
        assert!(!cpu.state().get_flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_unknown_opcode() {
        let mut cpu = setup_cpu(MachineConfig::default());
        cpu.memory_host_mut().load(0, &[0xFF]).unwrap();

        match cpu.step() {
            Err(CpuError::UnknownOpcode { opcode, pc }) => {
                assert_eq!(opcode, 0xFF);
                assert_eq!(pc, 0);
            }
            other => panic!("expected UnknownOpcode, got {:?}", other),
        }
        assert!(cpu.registers().is_empty());
        assert!(cpu.state().flags.is_empty());
    }

    #[test]
    fn test_startup_runs_until_budget() {
        let mut cpu = setup_cpu(MachineConfig::default().with_cycle_budget(10));
        cpu.memory_host_mut().load(0, &[0xEA; 32]).unwrap();

        cpu.startup().unwrap();

        assert_eq!(cpu.state().cycles, 10);
        assert_eq!(cpu.state().pc, 10);
        assert_eq!(cpu.run_state(), RunState::LockedStopped);
    }

    #[test]
    fn test_startup_stops_on_error() {
        let mut cpu = setup_cpu(MachineConfig::default());
        cpu.memory_host_mut().load(0, &[0xEA, 0xEA, 0x42]).unwrap();

        assert!(matches!(
            cpu.startup(),
            Err(CpuError::UnknownOpcode { opcode: 0x42, pc: 2 })
        ));
        assert!(!cpu.is_running());
        assert_eq!(cpu.run_state(), RunState::LockedStopped);
        assert_eq!(cpu.state().cycles, 3);
    }

    #[test]
    fn test_startup_can_run_again() {
        let mut cpu = setup_cpu(MachineConfig::default().with_cycle_budget(4));
        cpu.memory_host_mut().load(0, &[0xEA; 16]).unwrap();

        cpu.startup().unwrap();
        cpu.startup().unwrap();

        // The budget applies per run
        assert_eq!(cpu.state().cycles, 8);
    }

    #[test]
    fn test_shutdown_before_startup() {
        let mut cpu = setup_cpu(MachineConfig::default());
        cpu.shutdown().unwrap();
        assert_eq!(cpu.run_state(), RunState::LockedStopped);
    }

    #[test]
    fn test_reset_keeps_memory_and_cycles() {
        let mut cpu = setup_cpu(MachineConfig::default());
        cpu.memory_host_mut().load(0, &[0xA9, 0x00]).unwrap();
        cpu.step().unwrap();
        assert!(cpu.state().get_flag(StatusFlags::ZERO));

        cpu.reset().unwrap();

        assert_eq!(cpu.state().pc, 0);
        assert_eq!(cpu.state().cycles, 2);
        assert!(cpu.state().flags.is_empty());
        assert!(cpu.registers().is_empty());
        assert_eq!(cpu.memory_host().peek(0), Some(0xA9));
    }

    #[test]
    fn test_pc_runs_off_end_of_memory() {
        let mut cpu = setup_cpu(MachineConfig {
            memory_size: 4,
            ..MachineConfig::default()
        });
        cpu.memory_host_mut().load(0, &[0xEA; 4]).unwrap();

        assert!(matches!(
            cpu.startup(),
            Err(CpuError::AddressOutOfBounds { address: 4, size: 4 })
        ));
        assert_eq!(cpu.state().pc, 4);
        assert_eq!(cpu.state().cycles, 5);
        assert_eq!(cpu.run_state(), RunState::LockedStopped);
    }

    #[test]
    fn test_distinct_ids() {
        let a = setup_cpu(MachineConfig::default());
        let b = setup_cpu(MachineConfig::default());
        assert_ne!(a.id(), b.id());
    }
}
