use crate::own::{DeepCopy, Own};
use crate::types::{Mutability, ValType};

/// The type of a global: the type of its content and whether it may change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlobalType {
    content: ValType,
    mutability: Mutability,
}

impl GlobalType {
    pub fn new(content: ValType, mutability: Mutability) -> GlobalType {
        GlobalType {
            content,
            mutability,
        }
    }

    pub fn make(content: ValType, mutability: Mutability) -> Own<GlobalType> {
        Own::new(GlobalType::new(content, mutability))
    }

    pub fn content(&self) -> &ValType {
        &self.content
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub(crate) fn to_wasmtime(&self) -> wasmtime::GlobalType {
        wasmtime::GlobalType::new(self.content.to_wasmtime(), self.mutability.to_wasmtime())
    }

    pub(crate) fn from_wasmtime(ty: &wasmtime::GlobalType) -> GlobalType {
        GlobalType {
            content: ValType::from_wasmtime(ty.content()),
            mutability: Mutability::from_wasmtime(ty.mutability()),
        }
    }
}

impl DeepCopy for GlobalType {
    fn copy(&self) -> GlobalType {
        *self
    }
}
