//! Property-based tests for CPU invariants.

use cpucore::{Cpu, CpuError, ExecutionEngine, MachineVariant, Mos6502, StatusFlags};
use proptest::prelude::*;

const LOADS: [(u8, &str); 3] = [(0xA9, "A"), (0xA2, "X"), (0xA0, "Y")];

/// CPU with its PC at `pc` and `program` laid out there
fn setup_cpu(pc: u16, program: &[u8]) -> Cpu {
    let mut cpu = Mos6502::new_cpu().unwrap();
    cpu.memory_host_mut().load(pc, program).unwrap();
    cpu.state_mut().pc = pc;
    cpu
}

proptest! {
    /// Property: immediate loads copy the operand, cost 2 cycles and advance PC by 2
    #[test]
    fn prop_load_immediate(
        load in prop::sample::select(LOADS.to_vec()),
        value in 0u8..=255u8,
        pc in 0u16..4094,
    ) {
        let (opcode, register) = load;
        let mut cpu = setup_cpu(pc, &[opcode, value]);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.registers().get::<u8>(register).unwrap(), value);
        prop_assert_eq!(cpu.state().cycles, 2);
        prop_assert_eq!(cpu.state().pc, pc + 2);
        prop_assert_eq!(cpu.state().get_flag(StatusFlags::NEGATIVE), value & 0x80 != 0);
        prop_assert_eq!(cpu.state().get_flag(StatusFlags::ZERO), value == 0);
    }

    /// Property: no-ops advance PC and cycles by one and touch nothing else
    #[test]
    fn prop_no_op(opcode in prop::sample::select(vec![0x00u8, 0x90]), pc in 0u16..4095) {
        let mut cpu = setup_cpu(pc, &[opcode]);
        cpu.registers_mut().set("A", 0x55u8);
        cpu.state_mut().flags = StatusFlags::CARRY;

        cpu.step().unwrap();

        prop_assert_eq!(cpu.state().pc, pc + 1);
        prop_assert_eq!(cpu.state().cycles, 1);
        prop_assert_eq!(cpu.state().flags, StatusFlags::CARRY);
        prop_assert_eq!(cpu.registers().get::<u8>("A").unwrap(), 0x55);
        prop_assert_eq!(cpu.registers().len(), 1);
    }

    /// Property: every opcode outside the table fails without touching registers or flags
    #[test]
    fn prop_unknown_opcode(opcode in 0u8..=255u8) {
        prop_assume!(Mos6502::instruction_table().lookup(opcode).is_none());
        let mut cpu = setup_cpu(0, &[opcode]);

        let result = cpu.step();

        prop_assert!(
            matches!(&result, Err(CpuError::UnknownOpcode { opcode: o, pc: 0 }) if *o == opcode),
            "unexpected result {:?}",
            result
        );
        prop_assert!(cpu.registers().is_empty());
        prop_assert!(cpu.state().flags.is_empty());
    }

    /// Property: words read back as written, at a cost of 2 cycles per access
    #[test]
    fn prop_word_round_trip(address in 0u16..4095, value in 0u16..=0xFFFF) {
        let mut cpu = Mos6502::new_cpu().unwrap();

        cpu.memory().write_word(address, value).unwrap();
        let read = cpu.memory().read_word(address).unwrap();

        prop_assert_eq!(read, value);
        prop_assert_eq!(cpu.state().cycles, 4);
        prop_assert_eq!(cpu.memory_host().peek(address), Some((value & 0xFF) as u8));
    }

    /// Property: accesses beyond the bank trap
    #[test]
    fn prop_out_of_bounds(address in 4096u16..=0xFFFF, value in 0u8..=255u8) {
        let mut cpu = Mos6502::new_cpu().unwrap();

        let written = cpu.memory().write(address, value);
        let read = cpu.memory().read(address);

        prop_assert!(
            matches!(&written, Err(CpuError::AddressOutOfBounds { size: 4096, .. })),
            "unexpected result {:?}",
            written
        );
        prop_assert!(
            matches!(&read, Err(CpuError::AddressOutOfBounds { size: 4096, .. })),
            "unexpected result {:?}",
            read
        );
        prop_assert_eq!(cpu.state().cycles, 2);
    }

    /// Property: the cycle counter never decreases across a run of steps
    #[test]
    fn prop_cycles_monotonic(program in prop::collection::vec(
        prop::sample::select(vec![0x00u8, 0x90, 0xA9, 0xA2, 0xA0, 0x42]),
        1..64,
    )) {
        let mut cpu = setup_cpu(0, &program);
        let mut last = 0;

        for _ in 0..program.len() {
            let result = cpu.step();
            prop_assert!(cpu.state().cycles > last);
            last = cpu.state().cycles;
            if result.is_err() {
                break;
            }
        }
    }
}
