use crate::r#ref::HostInfo;
use crate::store::StoreRef;
use crate::types::GlobalType;
use crate::{DeepCopy, Own, Store, Val};

/// A global variable.
#[derive(Debug)]
pub struct Global {
    store: StoreRef,
    global: wasmtime::Global,
    host_info: HostInfo,
}

declare_ref!(Global);

impl Global {
    /// Creates a global of type `ty` holding `val`, or an empty handle if
    /// `val` does not match the content type.
    pub fn make(store: &Store, ty: &GlobalType, val: &Val) -> Own<Global> {
        let store = store.store.clone();
        let global = {
            let mut cx = store.context();
            let mut cx = wasmtime::RootScope::new(&mut *cx);
            let Some(val) = val.to_wasmtime(ty.content().kind(), &store, &mut cx) else {
                log::debug!("initial value does not match global type {ty:?}");
                return Own::empty();
            };
            wasmtime::Global::new(&mut cx, ty.to_wasmtime(), val)
        };
        crate::handle_result(global, "creating a global", |global| {
            Global::from_wasmtime(global, store)
        })
        .map_or_else(Own::empty, Own::new)
    }

    pub fn type_(&self) -> Own<GlobalType> {
        Own::new(self.ty())
    }

    pub fn get(&self) -> Val {
        let mut cx = self.store.context();
        let mut cx = wasmtime::RootScope::new(&mut *cx);
        let val = self.global.get(&mut cx);
        Val::from_wasmtime(&val, &self.store, &cx)
    }

    /// Stores `val`. Fails if the global is immutable or `val` does not
    /// match its content type.
    pub fn set(&self, val: &Val) -> bool {
        let kind = self.ty().content().kind();
        let mut cx = self.store.context();
        let mut cx = wasmtime::RootScope::new(&mut *cx);
        let Some(val) = val.to_wasmtime(kind, &self.store, &mut cx) else {
            return false;
        };
        let result = self.global.set(&mut cx, val);
        crate::handle_result(result, "setting a global", |()| ()).is_some()
    }

    pub(crate) fn ty(&self) -> GlobalType {
        GlobalType::from_wasmtime(&self.global.ty(&*self.store.context()))
    }

    pub(crate) fn from_wasmtime(global: wasmtime::Global, store: StoreRef) -> Global {
        Global {
            store,
            global,
            host_info: HostInfo::default(),
        }
    }

    pub(crate) fn wasmtime_in(&self, store: &StoreRef) -> Option<wasmtime::Global> {
        self.store.same(store).then_some(self.global)
    }
}

impl DeepCopy for Global {
    fn copy(&self) -> Global {
        Global::from_wasmtime(self.global, self.store.clone())
    }
}
