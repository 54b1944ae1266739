use crate::r#ref::HostInfo;
use crate::types::{ExportType, ImportType};
use crate::{DeepCopy, Own, Store, WasmVec};

/// A compiled module.
#[derive(Debug)]
pub struct Module {
    module: wasmtime::Module,
    host_info: HostInfo,
}

declare_ref!(Module);

impl Module {
    /// Checks whether `binary` is a valid module for the store's engine.
    pub fn validate(store: &Store, binary: &WasmVec<u8>) -> bool {
        let engine = store.store.engine();
        let result = wasmtime::Module::validate(&engine, binary.as_slice());
        crate::handle_result(result, "validating a module", |()| ()).is_some()
    }

    /// Compiles `binary`, or returns an empty handle if it is not a valid
    /// module.
    pub fn make(store: &Store, binary: &WasmVec<u8>) -> Own<Module> {
        let engine = store.store.engine();
        let module = wasmtime::Module::from_binary(&engine, binary.as_slice());
        crate::handle_result(module, "compiling a module", Module::from_wasmtime)
            .map_or_else(Own::empty, Own::new)
    }

    /// The module's imports, in declaration order. Imports of entity kinds
    /// this API does not describe occupy an empty slot.
    pub fn imports(&self) -> WasmVec<Own<ImportType>> {
        self.module
            .imports()
            .map(|i| ImportType::from_wasmtime(&i))
            .collect()
    }

    /// The module's exports, in declaration order. Exports of entity kinds
    /// this API does not describe occupy an empty slot.
    pub fn exports(&self) -> WasmVec<Own<ExportType>> {
        self.module
            .exports()
            .map(|e| ExportType::from_wasmtime(&e))
            .collect()
    }

    /// Serializes the compiled module, or returns the invalid sequence on
    /// failure.
    pub fn serialize(&self) -> WasmVec<u8> {
        crate::handle_result(self.module.serialize(), "serializing a module", WasmVec::from)
            .unwrap_or_else(WasmVec::invalid)
    }

    /// Loads a module produced by [`Module::serialize`].
    ///
    /// `serialized` must be the unmodified output of `serialize`. Artifacts
    /// from a different engine version, or compiled with settings that change
    /// the generated code's contract such as fuel metering, are rejected with
    /// an empty handle. Optimization level alone does not make an artifact
    /// incompatible.
    pub fn deserialize(store: &Store, serialized: &WasmVec<u8>) -> Own<Module> {
        if !serialized.is_valid() {
            return Own::empty();
        }
        let engine = store.store.engine();
        // SAFETY: the bytes come from `Module::serialize`; the engine checks
        // their version and configuration header before loading them.
        let module = unsafe { wasmtime::Module::deserialize(&engine, serialized.as_slice()) };
        crate::handle_result(module, "deserializing a module", Module::from_wasmtime)
            .map_or_else(Own::empty, Own::new)
    }

    pub(crate) fn wasmtime(&self) -> &wasmtime::Module {
        &self.module
    }

    pub(crate) fn from_wasmtime(module: wasmtime::Module) -> Module {
        Module {
            module,
            host_info: HostInfo::default(),
        }
    }
}

impl DeepCopy for Module {
    fn copy(&self) -> Module {
        Module::from_wasmtime(self.module.clone())
    }
}
