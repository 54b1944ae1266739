use crate::own::{DeepCopy, Own};
use crate::types::{Limits, ValType};

/// The type of a table: its element type and its size bounds in elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableType {
    element: ValType,
    limits: Limits,
}

impl TableType {
    pub fn new(element: ValType, limits: Limits) -> TableType {
        TableType { element, limits }
    }

    pub fn make(element: ValType, limits: Limits) -> Own<TableType> {
        Own::new(TableType::new(element, limits))
    }

    pub fn element(&self) -> &ValType {
        &self.element
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Tables only hold references, so a numeric element type has no engine
    /// counterpart.
    pub(crate) fn to_wasmtime(&self) -> Option<wasmtime::TableType> {
        let element = self.element.to_ref_type()?;
        Some(wasmtime::TableType::new(
            element,
            self.limits.min,
            self.limits.max(),
        ))
    }

    pub(crate) fn from_wasmtime(ty: &wasmtime::TableType) -> TableType {
        TableType {
            element: ValType::from_ref_type(ty.element()),
            limits: Limits::from_bounds(ty.minimum(), ty.maximum()),
        }
    }
}

impl DeepCopy for TableType {
    fn copy(&self) -> TableType {
        *self
    }
}
