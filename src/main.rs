use cpucore::{ExecutionEngine, MachineConfig, MachineVariant, Mos6502};

// Without a budget the loop runs until the PC falls off the end of memory, or
// forever on a 64 KiB machine, where the PC wraps back to 0 instead
const DEMO_CYCLE_BUDGET: u64 = 16;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => MachineConfig::from_file(path)?,
        None => Mos6502::config().with_cycle_budget(DEMO_CYCLE_BUDGET),
    };

    let mut cpu = Mos6502::new_cpu_with(config)?;

    // LDA #$12
    cpu.memory().write_next(0xA9)?;
    cpu.memory().write_next(0x12)?;

    let pc = cpu.state().pc;
    cpu.state_mut().pc = pc.wrapping_sub(2);

    cpu.startup()?;
    cpu.shutdown()?;

    println!("Cycles: {}", cpu.state().cycles);
    println!("{}", cpu.snapshot().to_json()?);

    Ok(())
}
