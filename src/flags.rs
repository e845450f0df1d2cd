use bitflags::bitflags;

bitflags! {
    /// Processor status bits, laid out as in the 6502 status register.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

impl StatusFlags {
    /// Z and N as a load of `value` would raise them. Never clears anything.
    pub fn for_value(value: u8) -> Self {
        let mut flags = StatusFlags::empty();
        if value & 0x80 != 0 {
            flags |= StatusFlags::NEGATIVE;
        }
        if value == 0 {
            flags |= StatusFlags::ZERO;
        }
        flags
    }
}
