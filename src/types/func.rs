use crate::own::{DeepCopy, Own};
use crate::types::{ValKind, ValType};
use crate::vec::WasmVec;

/// The signature of a function: parameter and result types, in order.
#[derive(Debug, Default, PartialEq)]
pub struct FuncType {
    params: WasmVec<ValType>,
    results: WasmVec<ValType>,
}

impl FuncType {
    pub fn new(params: WasmVec<ValType>, results: WasmVec<ValType>) -> FuncType {
        FuncType { params, results }
    }

    pub fn make(params: WasmVec<ValType>, results: WasmVec<ValType>) -> Own<FuncType> {
        Own::new(FuncType::new(params, results))
    }

    pub fn params(&self) -> &WasmVec<ValType> {
        &self.params
    }

    pub fn results(&self) -> &WasmVec<ValType> {
        &self.results
    }

    pub(crate) fn result_kinds(&self) -> Vec<ValKind> {
        self.results.iter().map(ValType::kind).collect()
    }

    pub(crate) fn to_wasmtime(&self, engine: &wasmtime::Engine) -> wasmtime::FuncType {
        wasmtime::FuncType::new(
            engine,
            self.params.iter().map(ValType::to_wasmtime),
            self.results.iter().map(ValType::to_wasmtime),
        )
    }

    pub(crate) fn from_wasmtime(ty: &wasmtime::FuncType) -> FuncType {
        FuncType {
            params: ty.params().map(|p| ValType::from_wasmtime(&p)).collect(),
            results: ty.results().map(|r| ValType::from_wasmtime(&r)).collect(),
        }
    }
}

impl DeepCopy for FuncType {
    fn copy(&self) -> FuncType {
        FuncType {
            params: self.params.copy(),
            results: self.results.copy(),
        }
    }
}
