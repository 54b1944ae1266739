use crate::own::{DeepCopy, Own};
use wasmtime::{HeapType, RefType};

/// The kinds of value that cross the API boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValKind {
    #[default]
    I32,
    I64,
    F32,
    F64,
    AnyRef,
    FuncRef,
}

pub fn is_num(kind: ValKind) -> bool {
    matches!(
        kind,
        ValKind::I32 | ValKind::I64 | ValKind::F32 | ValKind::F64
    )
}

pub fn is_ref(kind: ValKind) -> bool {
    !is_num(kind)
}

/// The type of a value: its kind and nothing else.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ValType {
    kind: ValKind,
}

impl ValType {
    pub const fn new(kind: ValKind) -> ValType {
        ValType { kind }
    }

    pub fn make(kind: ValKind) -> Own<ValType> {
        Own::new(ValType::new(kind))
    }

    pub fn kind(&self) -> ValKind {
        self.kind
    }

    pub fn is_num(&self) -> bool {
        is_num(self.kind)
    }

    pub fn is_ref(&self) -> bool {
        is_ref(self.kind)
    }

    pub(crate) fn to_wasmtime(&self) -> wasmtime::ValType {
        match self.kind {
            ValKind::I32 => wasmtime::ValType::I32,
            ValKind::I64 => wasmtime::ValType::I64,
            ValKind::F32 => wasmtime::ValType::F32,
            ValKind::F64 => wasmtime::ValType::F64,
            ValKind::AnyRef => wasmtime::ValType::EXTERNREF,
            ValKind::FuncRef => wasmtime::ValType::FUNCREF,
        }
    }

    /// The engine reference type for a table element, or `None` for numeric
    /// kinds.
    pub(crate) fn to_ref_type(&self) -> Option<RefType> {
        match self.kind {
            ValKind::AnyRef => Some(RefType::EXTERNREF),
            ValKind::FuncRef => Some(RefType::FUNCREF),
            _ => None,
        }
    }

    pub(crate) fn from_wasmtime(ty: &wasmtime::ValType) -> ValType {
        let kind = match ty {
            wasmtime::ValType::I32 => ValKind::I32,
            wasmtime::ValType::I64 => ValKind::I64,
            wasmtime::ValType::F32 => ValKind::F32,
            wasmtime::ValType::F64 => ValKind::F64,
            wasmtime::ValType::Ref(r) => return ValType::from_ref_type(r),
            wasmtime::ValType::V128 => {
                unreachable!("SIMD is disabled for every engine created by this crate")
            }
        };
        ValType::new(kind)
    }

    pub(crate) fn from_ref_type(ty: &RefType) -> ValType {
        match ty.heap_type() {
            HeapType::Func | HeapType::ConcreteFunc(_) | HeapType::NoFunc => {
                ValType::new(ValKind::FuncRef)
            }
            _ => ValType::new(ValKind::AnyRef),
        }
    }
}

impl DeepCopy for ValType {
    fn copy(&self) -> ValType {
        *self
    }
}

impl From<ValKind> for ValType {
    fn from(kind: ValKind) -> ValType {
        ValType::new(kind)
    }
}
