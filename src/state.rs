use crate::flags::StatusFlags;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuState {
    pub pc: u16,    // Program Counter
    pub sp: u16,    // Stack Pointer
    pub flags: StatusFlags,
    // Only ever grows, by the cost of each memory access
    pub cycles: u64,
}

impl CpuState {
    pub fn new(pc: u16, sp: u16) -> Self {
        CpuState {
            pc,
            sp,
            flags: StatusFlags::empty(),
            cycles: 0,
        }
    }

    pub fn get_flag(&self, flag: StatusFlags) -> bool {
        self.flags.contains(flag)
    }

    /// ORs `flags` into the status bits.
    pub fn raise_flags(&mut self, flags: StatusFlags) {
        self.flags |= flags;
    }
}
