use crate::r#ref::HostInfo;
use crate::store::StoreRef;
use crate::{DeepCopy, Extern, Module, Own, Store, Trap, WasmVec};
use std::panic::{self, AssertUnwindSafe};

/// An instantiated module.
#[derive(Debug)]
pub struct Instance {
    store: StoreRef,
    instance: wasmtime::Instance,
    module: wasmtime::Module,
    host_info: HostInfo,
}

declare_ref!(Instance);

impl Instance {
    /// Instantiates `module`, satisfying its imports in declaration order
    /// from `imports`. Returns an empty handle if linking fails or the start
    /// function traps.
    pub fn make(store: &Store, module: &Module, imports: &WasmVec<Own<Extern>>) -> Own<Instance> {
        match Instance::try_make(store, module, imports) {
            Ok(instance) => instance,
            Err(trap) => {
                log::debug!("instantiation failed: {}", trap.message());
                Own::empty()
            }
        }
    }

    /// Like [`Instance::make`], but reports why instantiation failed.
    pub fn try_make(
        store: &Store,
        module: &Module,
        imports: &WasmVec<Own<Extern>>,
    ) -> Result<Own<Instance>, Own<Trap>> {
        let fail = |msg: String| Err(Own::new(Trap::new(msg)));
        let module = module.wasmtime();
        let store = &store.store;
        if !wasmtime::Engine::same(module.engine(), &store.engine()) {
            return fail("module was compiled for a different engine".to_string());
        }
        let expected = module.imports().len();
        if imports.len() != expected {
            return fail(format!("expected {expected} imports, got {}", imports.len()));
        }
        let mut externs = Vec::with_capacity(expected);
        for (i, import) in imports.iter().enumerate() {
            let Some(import) = import.as_deref() else {
                return fail(format!("import {i} is null"));
            };
            let Some(ext) = import.wasmtime_in(store) else {
                return fail(format!("import {i} belongs to a different store"));
            };
            externs.push(ext);
        }
        // The start function may run host callbacks.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            wasmtime::Instance::new(&mut *store.context(), module, &externs)
        }));
        let instance = match result {
            Ok(instance) => instance.map_err(Trap::from_error)?,
            Err(panic) => return Err(Trap::from_panic(panic)),
        };
        log::trace!("instantiated module with {expected} imports");
        Ok(Own::new(Instance::from_wasmtime(
            instance,
            module.clone(),
            store.clone(),
        )))
    }

    /// The instance's exports, in the module's declaration order.
    pub fn exports(&self) -> WasmVec<Own<Extern>> {
        let mut cx = self.store.context();
        self.module
            .exports()
            .map(|export| match self.instance.get_export(&mut *cx, export.name()) {
                Some(ext) => Extern::from_wasmtime(ext, &self.store),
                None => Own::empty(),
            })
            .collect()
    }

    pub(crate) fn from_wasmtime(
        instance: wasmtime::Instance,
        module: wasmtime::Module,
        store: StoreRef,
    ) -> Instance {
        Instance {
            store,
            instance,
            module,
            host_info: HostInfo::default(),
        }
    }

    pub(crate) fn wasmtime_in(
        &self,
        store: &StoreRef,
    ) -> Option<(wasmtime::Instance, wasmtime::Module)> {
        self.store
            .same(store)
            .then(|| (self.instance, self.module.clone()))
    }
}

impl DeepCopy for Instance {
    fn copy(&self) -> Instance {
        Instance::from_wasmtime(self.instance, self.module.clone(), self.store.clone())
    }
}
