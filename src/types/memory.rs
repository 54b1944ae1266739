use crate::own::{DeepCopy, Own};
use crate::types::Limits;

/// The type of a linear memory: its size bounds in pages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemoryType {
    limits: Limits,
}

impl MemoryType {
    pub fn new(limits: Limits) -> MemoryType {
        MemoryType { limits }
    }

    pub fn make(limits: Limits) -> Own<MemoryType> {
        Own::new(MemoryType::new(limits))
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Fails if the bounds are inverted or exceed the 32-bit address space.
    pub(crate) fn to_wasmtime(&self) -> wasmtime::Result<wasmtime::MemoryType> {
        wasmtime::MemoryTypeBuilder::default()
            .min(self.limits.min.into())
            .max(self.limits.max().map(u64::from))
            .build()
    }

    pub(crate) fn from_wasmtime(ty: &wasmtime::MemoryType) -> MemoryType {
        MemoryType {
            limits: Limits::from_bounds(ty.minimum(), ty.maximum()),
        }
    }
}

impl DeepCopy for MemoryType {
    fn copy(&self) -> MemoryType {
        *self
    }
}
