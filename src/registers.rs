use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{CpuError, Result};
use crate::flags::StatusFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    Byte,
    Word,
    Flags,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegisterKind::Byte => "byte",
            RegisterKind::Word => "word",
            RegisterKind::Flags => "flags",
        };
        f.write_str(name)
    }
}

/// Contents of one named register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegisterValue {
    Byte(u8),
    Word(u16),
    Flags(#[serde(serialize_with = "serialize_flags")] StatusFlags),
}

fn serialize_flags<S: serde::Serializer>(
    flags: &StatusFlags,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(flags.bits())
}

impl RegisterValue {
    pub fn kind(&self) -> RegisterKind {
        match self {
            RegisterValue::Byte(_) => RegisterKind::Byte,
            RegisterValue::Word(_) => RegisterKind::Word,
            RegisterValue::Flags(_) => RegisterKind::Flags,
        }
    }
}

/// Types that can live in a register slot.
pub trait RegisterType: Sized {
    const KIND: RegisterKind;

    fn from_value(value: RegisterValue) -> Option<Self>;
    fn into_value(self) -> RegisterValue;
}

impl RegisterType for u8 {
    const KIND: RegisterKind = RegisterKind::Byte;

    fn from_value(value: RegisterValue) -> Option<Self> {
        match value {
            RegisterValue::Byte(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> RegisterValue {
        RegisterValue::Byte(self)
    }
}

impl RegisterType for u16 {
    const KIND: RegisterKind = RegisterKind::Word;

    fn from_value(value: RegisterValue) -> Option<Self> {
        match value {
            RegisterValue::Word(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> RegisterValue {
        RegisterValue::Word(self)
    }
}

impl RegisterType for StatusFlags {
    const KIND: RegisterKind = RegisterKind::Flags;

    fn from_value(value: RegisterValue) -> Option<Self> {
        match value {
            RegisterValue::Flags(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> RegisterValue {
        RegisterValue::Flags(self)
    }
}

/// Named general-purpose registers. Machines invent names as they execute;
/// reads are checked against the kind currently stored and slots are never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct RegisterFile {
    slots: BTreeMap<String, RegisterValue>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: RegisterType>(&self, name: &str) -> Result<T> {
        let value = self
            .slots
            .get(name)
            .ok_or_else(|| CpuError::RegisterNotFound(name.to_string()))?;
        T::from_value(*value).ok_or_else(|| CpuError::RegisterTypeMismatch {
            name: name.to_string(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    /// Stores `value`, replacing whatever the slot held before, whatever its kind.
    pub fn set<T: RegisterType>(&mut self, name: &str, value: T) {
        self.slots.insert(name.to_string(), value.into_value());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<RegisterKind> {
        self.slots.get(name).map(RegisterValue::kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, RegisterValue)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
