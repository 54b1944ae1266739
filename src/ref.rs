use crate::store::StoreRef;
use crate::{DeepCopy, Extern, Func, Global, Instance, Memory, Module, Own, Store, Table, ValKind};
use std::ffi::c_void;
use std::ptr;
use wasmtime::{AsContext, AsContextMut};

/// Data attached to an object by the embedder, together with the finalizer
/// that releases it.
pub(crate) struct HostInfo {
    info: *mut c_void,
    finalizer: Option<fn(*mut c_void)>,
}

impl HostInfo {
    pub(crate) fn get(&self) -> *mut c_void {
        self.info
    }

    pub(crate) fn set(&mut self, info: *mut c_void, finalizer: Option<fn(*mut c_void)>) {
        drop(std::mem::take(self));
        self.info = info;
        self.finalizer = finalizer;
    }
}

impl Default for HostInfo {
    fn default() -> HostInfo {
        HostInfo {
            info: ptr::null_mut(),
            finalizer: None,
        }
    }
}

impl std::fmt::Debug for HostInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostInfo")
            .field("info", &self.info)
            .field("finalizer", &self.finalizer.is_some())
            .finish()
    }
}

impl Drop for HostInfo {
    fn drop(&mut self) {
        if let Some(f) = self.finalizer.take() {
            f(self.info);
        }
    }
}

/// A host-defined object with no engine counterpart, useful only for the
/// host info attached to it.
#[derive(Debug, Default)]
pub struct Foreign {
    host_info: HostInfo,
}

declare_ref!(Foreign);

impl Foreign {
    pub fn make(_store: &Store) -> Own<Foreign> {
        Own::new(Foreign::default())
    }
}

impl DeepCopy for Foreign {
    fn copy(&self) -> Foreign {
        Foreign::default()
    }
}

/// The kinds of runtime object a [`Ref`] can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RefKind {
    Module,
    Foreign,
    Extern,
    Instance,
}

/// Any heap-resident runtime object.
pub enum Ref {
    Module(Module),
    Foreign(Foreign),
    Extern(Extern),
    Instance(Instance),
}

impl Ref {
    pub fn kind(&self) -> RefKind {
        match self {
            Ref::Module(_) => RefKind::Module,
            Ref::Foreign(_) => RefKind::Foreign,
            Ref::Extern(_) => RefKind::Extern,
            Ref::Instance(_) => RefKind::Instance,
        }
    }

    pub fn as_module(&self) -> Option<&Module> {
        match self {
            Ref::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_module_mut(&mut self) -> Option<&mut Module> {
        match self {
            Ref::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_foreign(&self) -> Option<&Foreign> {
        match self {
            Ref::Foreign(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_foreign_mut(&mut self) -> Option<&mut Foreign> {
        match self {
            Ref::Foreign(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_extern(&self) -> Option<&Extern> {
        match self {
            Ref::Extern(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_extern_mut(&mut self) -> Option<&mut Extern> {
        match self {
            Ref::Extern(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Ref::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_instance_mut(&mut self) -> Option<&mut Instance> {
        match self {
            Ref::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn get_host_info(&self) -> *mut c_void {
        match self {
            Ref::Module(m) => m.get_host_info(),
            Ref::Foreign(f) => f.get_host_info(),
            Ref::Extern(e) => e.get_host_info(),
            Ref::Instance(i) => i.get_host_info(),
        }
    }

    pub fn set_host_info(&mut self, info: *mut c_void, finalizer: Option<fn(*mut c_void)>) {
        match self {
            Ref::Module(m) => m.set_host_info(info, finalizer),
            Ref::Foreign(f) => f.set_host_info(info, finalizer),
            Ref::Extern(e) => e.set_host_info(info, finalizer),
            Ref::Instance(i) => i.set_host_info(info, finalizer),
        }
    }

    /// Converts to an engine reference of the given element kind.
    ///
    /// Function references must name a function of `store`. Any other
    /// object travels as the payload of an `externref`; externals and
    /// instances must also belong to `store`.
    pub(crate) fn to_wasmtime(
        r: Option<&Ref>,
        kind: ValKind,
        store: &StoreRef,
        mut cx: impl AsContextMut,
    ) -> Option<wasmtime::Ref> {
        let r = match (r, kind) {
            (None, ValKind::FuncRef) => return Some(wasmtime::Ref::Func(None)),
            (None, ValKind::AnyRef) => return Some(wasmtime::Ref::Extern(None)),
            (Some(r), ValKind::FuncRef) => {
                let func = r.as_extern()?.func()?.wasmtime_in(store)?;
                return Some(wasmtime::Ref::Func(Some(func)));
            }
            (Some(r), ValKind::AnyRef) => r,
            _ => return None,
        };
        let payload = match r {
            Ref::Module(m) => HostRef::Module(m.wasmtime().clone()),
            Ref::Foreign(_) => HostRef::Foreign,
            Ref::Extern(e) => HostRef::Extern(e.wasmtime_in(store)?),
            Ref::Instance(i) => {
                let (instance, module) = i.wasmtime_in(store)?;
                HostRef::Instance(instance, module)
            }
        };
        let externref = wasmtime::ExternRef::new(&mut cx, payload);
        crate::handle_result(externref, "allocating an externref", |r| {
            wasmtime::Ref::Extern(Some(r))
        })
    }

    /// Wraps an engine reference in a fresh object without host info.
    /// References the embedder did not create read as null.
    pub(crate) fn from_wasmtime(
        r: &wasmtime::Ref,
        store: &StoreRef,
        cx: impl AsContext,
    ) -> Own<Ref> {
        match r {
            wasmtime::Ref::Func(Some(f)) => Own::new(Func::from_wasmtime(*f, store.clone()).into()),
            wasmtime::Ref::Extern(Some(r)) => {
                let payload = r.data(&cx).ok().and_then(|data| data.downcast_ref::<HostRef>());
                match payload {
                    Some(HostRef::Module(m)) => Own::new(Module::from_wasmtime(m.clone()).into()),
                    Some(HostRef::Foreign) => Own::new(Foreign::default().into()),
                    Some(HostRef::Extern(e)) => Extern::from_wasmtime(e.clone(), store).upcast(),
                    Some(HostRef::Instance(i, m)) => {
                        Own::new(Instance::from_wasmtime(*i, m.clone(), store.clone()).into())
                    }
                    None => Own::empty(),
                }
            }
            _ => Own::empty(),
        }
    }
}

/// The payload of an `externref` created from a [`Ref`]. Host info is not
/// carried across.
enum HostRef {
    Module(wasmtime::Module),
    Foreign,
    Extern(wasmtime::Extern),
    Instance(wasmtime::Instance, wasmtime::Module),
}

impl DeepCopy for Ref {
    fn copy(&self) -> Ref {
        match self {
            Ref::Module(m) => Ref::Module(m.copy()),
            Ref::Foreign(f) => Ref::Foreign(f.copy()),
            Ref::Extern(e) => Ref::Extern(e.copy()),
            Ref::Instance(i) => Ref::Instance(i.copy()),
        }
    }
}

impl std::fmt::Debug for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ref").field(&self.kind()).finish()
    }
}

impl From<Module> for Ref {
    fn from(m: Module) -> Ref {
        Ref::Module(m)
    }
}

impl From<Foreign> for Ref {
    fn from(f: Foreign) -> Ref {
        Ref::Foreign(f)
    }
}

impl From<Extern> for Ref {
    fn from(e: Extern) -> Ref {
        Ref::Extern(e)
    }
}

impl From<Instance> for Ref {
    fn from(i: Instance) -> Ref {
        Ref::Instance(i)
    }
}

impl From<Func> for Ref {
    fn from(f: Func) -> Ref {
        Ref::Extern(f.into())
    }
}

impl From<Global> for Ref {
    fn from(g: Global) -> Ref {
        Ref::Extern(g.into())
    }
}

impl From<Table> for Ref {
    fn from(t: Table) -> Ref {
        Ref::Extern(t.into())
    }
}

impl From<Memory> for Ref {
    fn from(m: Memory) -> Ref {
        Ref::Extern(m.into())
    }
}
