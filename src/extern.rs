use crate::store::StoreRef;
use crate::types::{ExternKind, ExternType};
use crate::{DeepCopy, Func, Global, Memory, Own, Table};
use std::ffi::c_void;

/// A runtime entity that can be imported or exported: a function, global,
/// table or memory.
#[derive(Debug)]
pub enum Extern {
    Func(Func),
    Global(Global),
    Table(Table),
    Memory(Memory),
}

impl Extern {
    pub fn kind(&self) -> ExternKind {
        match self {
            Extern::Func(_) => ExternKind::Func,
            Extern::Global(_) => ExternKind::Global,
            Extern::Table(_) => ExternKind::Table,
            Extern::Memory(_) => ExternKind::Memory,
        }
    }

    pub fn type_(&self) -> Own<ExternType> {
        Own::new(match self {
            Extern::Func(f) => f.ty().into(),
            Extern::Global(g) => g.ty().into(),
            Extern::Table(t) => t.ty().into(),
            Extern::Memory(m) => m.ty().into(),
        })
    }

    pub fn func(&self) -> Option<&Func> {
        match self {
            Extern::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn func_mut(&mut self) -> Option<&mut Func> {
        match self {
            Extern::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn global(&self) -> Option<&Global> {
        match self {
            Extern::Global(g) => Some(g),
            _ => None,
        }
    }

    pub fn global_mut(&mut self) -> Option<&mut Global> {
        match self {
            Extern::Global(g) => Some(g),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Extern::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Extern::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn memory(&self) -> Option<&Memory> {
        match self {
            Extern::Memory(m) => Some(m),
            _ => None,
        }
    }

    pub fn memory_mut(&mut self) -> Option<&mut Memory> {
        match self {
            Extern::Memory(m) => Some(m),
            _ => None,
        }
    }

    pub fn get_host_info(&self) -> *mut c_void {
        match self {
            Extern::Func(f) => f.get_host_info(),
            Extern::Global(g) => g.get_host_info(),
            Extern::Table(t) => t.get_host_info(),
            Extern::Memory(m) => m.get_host_info(),
        }
    }

    pub fn set_host_info(&mut self, info: *mut c_void, finalizer: Option<fn(*mut c_void)>) {
        match self {
            Extern::Func(f) => f.set_host_info(info, finalizer),
            Extern::Global(g) => g.set_host_info(info, finalizer),
            Extern::Table(t) => t.set_host_info(info, finalizer),
            Extern::Memory(m) => m.set_host_info(info, finalizer),
        }
    }

    /// The engine entity, if this extern belongs to `store`.
    pub(crate) fn wasmtime_in(&self, store: &StoreRef) -> Option<wasmtime::Extern> {
        Some(match self {
            Extern::Func(f) => f.wasmtime_in(store)?.into(),
            Extern::Global(g) => g.wasmtime_in(store)?.into(),
            Extern::Table(t) => t.wasmtime_in(store)?.into(),
            Extern::Memory(m) => m.wasmtime_in(store)?.into(),
        })
    }

    pub(crate) fn from_wasmtime(ext: wasmtime::Extern, store: &StoreRef) -> Own<Extern> {
        let store = store.clone();
        match ext {
            wasmtime::Extern::Func(f) => Own::new(Func::from_wasmtime(f, store).into()),
            wasmtime::Extern::Global(g) => Own::new(Global::from_wasmtime(g, store).into()),
            wasmtime::Extern::Table(t) => Own::new(Table::from_wasmtime(t, store).into()),
            wasmtime::Extern::Memory(m) => Own::new(Memory::from_wasmtime(m, store).into()),
            #[allow(unreachable_patterns, reason = "newer engines add entity kinds")]
            other => {
                log::debug!("skipping unsupported extern {other:?}");
                Own::empty()
            }
        }
    }
}

impl DeepCopy for Extern {
    fn copy(&self) -> Extern {
        match self {
            Extern::Func(f) => Extern::Func(f.copy()),
            Extern::Global(g) => Extern::Global(g.copy()),
            Extern::Table(t) => Extern::Table(t.copy()),
            Extern::Memory(m) => Extern::Memory(m.copy()),
        }
    }
}

impl From<Func> for Extern {
    fn from(f: Func) -> Extern {
        Extern::Func(f)
    }
}

impl From<Global> for Extern {
    fn from(g: Global) -> Extern {
        Extern::Global(g)
    }
}

impl From<Table> for Extern {
    fn from(t: Table) -> Extern {
        Extern::Table(t)
    }
}

impl From<Memory> for Extern {
    fn from(m: Memory) -> Extern {
        Extern::Memory(m)
    }
}
