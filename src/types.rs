//! Descriptors for values and for the things a module imports and exports.

use crate::vec::WasmVec;

mod export;
mod r#extern;
mod func;
mod global;
mod import;
mod memory;
mod table;
mod val;
pub use self::export::*;
pub use self::func::*;
pub use self::global::*;
pub use self::import::*;
pub use self::memory::*;
pub use self::r#extern::*;
pub use self::table::*;
pub use self::val::*;

/// A module or field name. Names are byte sequences; the engine only ever
/// produces valid UTF-8.
pub type Name = WasmVec<u8>;

/// Size bounds of a table (in elements) or memory (in pages).
///
/// Both bounds are inclusive. A `max` of `u32::MAX` means unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Limits {
    pub min: u32,
    pub max: u32,
}

impl Limits {
    /// Limits with the given minimum and no maximum.
    pub const fn new(min: u32) -> Limits {
        Limits { min, max: u32::MAX }
    }

    pub const fn with_max(min: u32, max: u32) -> Limits {
        Limits { min, max }
    }

    pub(crate) fn max(&self) -> Option<u32> {
        if self.max == u32::MAX {
            None
        } else {
            Some(self.max)
        }
    }

    /// Builds limits from engine bounds, saturating anything that does not
    /// fit in 32 bits.
    pub(crate) fn from_bounds<N>(min: N, max: Option<N>) -> Limits
    where
        u32: TryFrom<N>,
    {
        Limits {
            min: u32::try_from(min).unwrap_or(u32::MAX),
            max: max.map_or(u32::MAX, |m| u32::try_from(m).unwrap_or(u32::MAX)),
        }
    }
}

/// Whether a global can be written after creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mutability {
    Const,
    Var,
}

impl Mutability {
    pub(crate) fn to_wasmtime(self) -> wasmtime::Mutability {
        match self {
            Mutability::Const => wasmtime::Mutability::Const,
            Mutability::Var => wasmtime::Mutability::Var,
        }
    }

    pub(crate) fn from_wasmtime(m: wasmtime::Mutability) -> Mutability {
        match m {
            wasmtime::Mutability::Const => Mutability::Const,
            wasmtime::Mutability::Var => Mutability::Var,
        }
    }
}
