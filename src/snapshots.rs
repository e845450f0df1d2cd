use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cpu::Cpu;
use crate::registers::RegisterValue;
use crate::runtime::RunState;

/// Point-in-time view of a CPU for reporting. Not meant to be restored.
#[derive(Debug, Clone, Serialize)]
pub struct CpuSnapshot {
    pub cpu_id: String,
    pub variant: String,
    pub pc: u16,
    pub sp: u16,
    pub flags: u8,
    pub cycles: u64,
    pub run_state: RunState,
    pub registers: BTreeMap<String, RegisterValue>,
    pub memory_size: usize,
    pub captured_at: DateTime<Utc>,
}

impl CpuSnapshot {
    pub fn capture(cpu: &Cpu) -> Self {
        let state = cpu.state();
        let registers = cpu
            .registers()
            .iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        CpuSnapshot {
            cpu_id: cpu.id().to_string(),
            variant: cpu.variant().to_string(),
            pc: state.pc,
            sp: state.sp,
            flags: state.flags.bits(),
            cycles: state.cycles,
            run_state: cpu.run_state(),
            registers,
            memory_size: cpu.memory_host().len(),
            captured_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
