use thiserror::Error;

use crate::registers::RegisterKind;
use crate::runtime::{RunState, Transition};

pub type Result<T> = std::result::Result<T, CpuError>;

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("unknown opcode ${opcode:02X} at PC ${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },

    #[error("register {0} not found")]
    RegisterNotFound(String),

    #[error("register {name} holds a {found}, not a {expected}")]
    RegisterTypeMismatch {
        name: String,
        expected: RegisterKind,
        found: RegisterKind,
    },

    #[error("cannot apply {transition:?} while {state:?}")]
    InvalidState { state: RunState, transition: Transition },

    #[error("{0} is not attached")]
    Uninitialized(&'static str),

    #[error("address ${address:04X} is outside the {size}-byte memory bank")]
    AddressOutOfBounds { address: usize, size: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CpuError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CpuError::UnknownOpcode { .. } => "unknown_opcode",
            CpuError::RegisterNotFound(_) => "register_not_found",
            CpuError::RegisterTypeMismatch { .. } => "register_type_mismatch",
            CpuError::InvalidState { .. } => "invalid_state",
            CpuError::Uninitialized(_) => "uninitialized",
            CpuError::AddressOutOfBounds { .. } => "address_out_of_bounds",
            CpuError::Config(_) => "config",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read machine config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid machine config: {0}")]
    Invalid(String),
}
