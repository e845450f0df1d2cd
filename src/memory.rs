use crate::error::{CpuError, Result};
use crate::metrics::record_memory_access;
use crate::state::CpuState;

/// Flat, zero-initialised byte storage. Access through `Memory` directly is
/// host-side and never charges cycles; the CPU goes through [`MemoryBank`].
#[derive(Debug, Clone)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Memory {
            data: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn peek(&self, address: u16) -> Option<u8> {
        self.data.get(address as usize).copied()
    }

    // Load a program image without touching the cycle counter
    pub fn load(&mut self, start_address: u16, data: &[u8]) -> Result<()> {
        let start = start_address as usize;
        let end = start + data.len();
        if end > self.data.len() {
            return Err(CpuError::AddressOutOfBounds {
                address: end - 1,
                size: self.data.len(),
            });
        }
        self.data[start..end].copy_from_slice(data);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn check(&self, address: usize, width: usize) -> Result<()> {
        if address + width > self.data.len() {
            return Err(CpuError::AddressOutOfBounds {
                address: address + width - 1,
                size: self.data.len(),
            });
        }
        Ok(())
    }
}

/// The CPU's view of its memory. Every access charges the borrowed state's
/// cycle counter by its width (1 per byte, 2 per word), even when the access
/// then traps on an out-of-bounds address.
pub struct MemoryBank<'a> {
    memory: &'a mut Memory,
    state: &'a mut CpuState,
}

impl<'a> MemoryBank<'a> {
    pub fn new(memory: &'a mut Memory, state: &'a mut CpuState) -> Self {
        MemoryBank { memory, state }
    }

    pub fn read(&mut self, address: u16) -> Result<u8> {
        self.charge("read", 1);
        let address = address as usize;
        self.memory.check(address, 1)?;
        Ok(self.memory.data[address])
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<()> {
        self.charge("write", 1);
        let address = address as usize;
        self.memory.check(address, 1)?;
        self.memory.data[address] = value;
        Ok(())
    }

    // Read a 16-bit value in little-endian format
    pub fn read_word(&mut self, address: u16) -> Result<u16> {
        self.charge("read", 2);
        let address = address as usize;
        self.memory.check(address, 2)?;
        let low = self.memory.data[address] as u16;
        let high = self.memory.data[address + 1] as u16;
        Ok((high << 8) | low)
    }

    // Write a 16-bit value in little-endian format
    pub fn write_word(&mut self, address: u16, value: u16) -> Result<()> {
        self.charge("write", 2);
        let address = address as usize;
        self.memory.check(address, 2)?;
        self.memory.data[address] = (value & 0xFF) as u8;
        self.memory.data[address + 1] = (value >> 8) as u8;
        Ok(())
    }

    pub fn read_next(&mut self) -> Result<u8> {
        let value = self.read(self.state.pc)?;
        self.state.pc = self.state.pc.wrapping_add(1);
        Ok(value)
    }

    pub fn write_next(&mut self, value: u8) -> Result<()> {
        self.write(self.state.pc, value)?;
        self.state.pc = self.state.pc.wrapping_add(1);
        Ok(())
    }

    pub fn read_word_next(&mut self) -> Result<u16> {
        let value = self.read_word(self.state.pc)?;
        self.state.pc = self.state.pc.wrapping_add(2);
        Ok(value)
    }

    pub fn write_word_next(&mut self, value: u16) -> Result<()> {
        self.write_word(self.state.pc, value)?;
        self.state.pc = self.state.pc.wrapping_add(2);
        Ok(())
    }

    fn charge(&mut self, operation: &str, cycles: u64) {
        self.state.cycles += cycles;
        record_memory_access(operation);
    }
}
