use crate::own::{DeepCopy, Own};
use crate::types::{FuncType, GlobalType, MemoryType, TableType};

/// The kinds of entity a module can import or export.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExternKind {
    Func,
    Global,
    Table,
    Memory,
}

/// The type of an importable or exportable entity.
///
/// The variant is fixed at construction; the concrete descriptor is only
/// reachable through the accessor matching [`ExternType::kind`].
#[derive(Debug, PartialEq)]
pub enum ExternType {
    Func(FuncType),
    Global(GlobalType),
    Table(TableType),
    Memory(MemoryType),
}

impl ExternType {
    pub fn kind(&self) -> ExternKind {
        match self {
            ExternType::Func(_) => ExternKind::Func,
            ExternType::Global(_) => ExternKind::Global,
            ExternType::Table(_) => ExternKind::Table,
            ExternType::Memory(_) => ExternKind::Memory,
        }
    }

    pub fn func(&self) -> Option<&FuncType> {
        match self {
            ExternType::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn func_mut(&mut self) -> Option<&mut FuncType> {
        match self {
            ExternType::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn global(&self) -> Option<&GlobalType> {
        match self {
            ExternType::Global(g) => Some(g),
            _ => None,
        }
    }

    pub fn global_mut(&mut self) -> Option<&mut GlobalType> {
        match self {
            ExternType::Global(g) => Some(g),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&TableType> {
        match self {
            ExternType::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut TableType> {
        match self {
            ExternType::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn memory(&self) -> Option<&MemoryType> {
        match self {
            ExternType::Memory(m) => Some(m),
            _ => None,
        }
    }

    pub fn memory_mut(&mut self) -> Option<&mut MemoryType> {
        match self {
            ExternType::Memory(m) => Some(m),
            _ => None,
        }
    }

    /// Converts an engine type, or returns `None` for entity kinds this API
    /// does not describe.
    pub(crate) fn from_wasmtime(ty: &wasmtime::ExternType) -> Option<ExternType> {
        match ty {
            wasmtime::ExternType::Func(f) => Some(FuncType::from_wasmtime(f).into()),
            wasmtime::ExternType::Global(g) => Some(GlobalType::from_wasmtime(g).into()),
            wasmtime::ExternType::Table(t) => Some(TableType::from_wasmtime(t).into()),
            wasmtime::ExternType::Memory(m) => Some(MemoryType::from_wasmtime(m).into()),
            #[allow(unreachable_patterns, reason = "newer engines add entity kinds")]
            _ => None,
        }
    }

    /// Converts an engine type into an owning handle, empty for entity kinds
    /// this API does not describe.
    pub(crate) fn own_from_wasmtime(ty: &wasmtime::ExternType) -> Own<ExternType> {
        match ExternType::from_wasmtime(ty) {
            Some(ty) => Own::new(ty),
            None => {
                log::debug!("skipping unsupported extern type {ty:?}");
                Own::empty()
            }
        }
    }
}

impl DeepCopy for ExternType {
    fn copy(&self) -> ExternType {
        match self {
            ExternType::Func(f) => ExternType::Func(f.copy()),
            ExternType::Global(g) => ExternType::Global(g.copy()),
            ExternType::Table(t) => ExternType::Table(t.copy()),
            ExternType::Memory(m) => ExternType::Memory(m.copy()),
        }
    }
}

impl From<FuncType> for ExternType {
    fn from(ty: FuncType) -> ExternType {
        ExternType::Func(ty)
    }
}

impl From<GlobalType> for ExternType {
    fn from(ty: GlobalType) -> ExternType {
        ExternType::Global(ty)
    }
}

impl From<TableType> for ExternType {
    fn from(ty: TableType) -> ExternType {
        ExternType::Table(ty)
    }
}

impl From<MemoryType> for ExternType {
    fn from(ty: MemoryType) -> ExternType {
        ExternType::Memory(ty)
    }
}
