use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

lazy_static! {
    /// Registry every collector below is exported through
    pub static ref REGISTRY: Registry = Registry::new();

    /// Completed instructions, labelled by opcode byte and mnemonic
    pub static ref CPU_INSTRUCTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("cpu_instructions_total", "Instructions completed, by opcode and mnemonic"),
        &["opcode", "instruction"]
    ).expect("cpu_instructions_total definition is valid");

    /// Cycles charged by completed instructions, fetch included
    pub static ref CPU_CYCLES_TOTAL: Counter = Counter::new(
        "cpu_cycles_total", "Memory-access cycles charged by completed instructions"
    ).expect("cpu_cycles_total definition is valid");

    /// Wall-clock time from opcode fetch to the end of execution
    pub static ref INSTRUCTION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("instruction_duration_seconds", "Wall-clock time per instruction, fetch to completion")
            .buckets(vec![0.0000001, 0.0000005, 0.000001, 0.000005, 0.00001, 0.0001]),
        &["instruction"]
    ).expect("instruction_duration_seconds definition is valid");

    /// Charged memory bank accesses, reads and writes
    pub static ref MEMORY_ACCESSES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("memory_accesses_total", "Total memory bank read/write accesses"),
        &["operation"]
    ).expect("memory_accesses_total definition is valid");

    /// Errors returned by `step`, lifecycle transitions and memory accesses
    pub static ref CPU_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("cpu_errors_total", "Total number of execution errors by kind"),
        &["kind"]
    ).expect("cpu_errors_total definition is valid");

    /// Applied lock/unlock/start/stop transitions
    pub static ref LIFECYCLE_TRANSITIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("cpu_lifecycle_transitions_total", "Total number of runtime lifecycle transitions"),
        &["transition"]
    ).expect("cpu_lifecycle_transitions_total definition is valid");
}

/// Register the collectors with the global registry. Call once per process.
pub fn init_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(CPU_INSTRUCTIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CPU_CYCLES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(INSTRUCTION_DURATION.clone()))?;
    REGISTRY.register(Box::new(MEMORY_ACCESSES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CPU_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(LIFECYCLE_TRANSITIONS_TOTAL.clone()))?;
    Ok(())
}

/// Everything in the registry, in the Prometheus text format.
pub fn render_metrics() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Count a completed instruction and the cycles it charged.
pub fn record_instruction(opcode: u8, instruction_name: &str, cycles: u64, duration: Duration) {
    CPU_INSTRUCTIONS_TOTAL
        .with_label_values(&[&format!("0x{:02X}", opcode), instruction_name])
        .inc();

    CPU_CYCLES_TOTAL.inc_by(cycles as f64);

    INSTRUCTION_DURATION
        .with_label_values(&[instruction_name])
        .observe(duration.as_secs_f64());
}

pub fn record_memory_access(operation: &str) {
    MEMORY_ACCESSES_TOTAL.with_label_values(&[operation]).inc();
}

pub fn record_error(kind: &str) {
    CPU_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_transition(transition: &str) {
    LIFECYCLE_TRANSITIONS_TOTAL
        .with_label_values(&[transition])
        .inc();
}

/// Measures one instruction, from fetch to completion.
pub struct Timer {
    fetched_at: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Timer {
            fetched_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
