use crate::own::{DeepCopy, Own};
use crate::types::{ExternType, Name};

/// A module import: a two-part name and the type of the expected entity.
#[derive(Debug, PartialEq)]
pub struct ImportType {
    module: Name,
    name: Name,
    ty: Own<ExternType>,
}

impl ImportType {
    /// Creates an import descriptor, or an empty handle if `ty` is empty.
    pub fn make(module: Name, name: Name, ty: Own<ExternType>) -> Own<ImportType> {
        if ty.is_empty() {
            return Own::empty();
        }
        Own::new(ImportType { module, name, ty })
    }

    pub fn module(&self) -> &Name {
        &self.module
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn ty(&self) -> &ExternType {
        &self.ty
    }

    pub(crate) fn from_wasmtime(import: &wasmtime::ImportType<'_>) -> Own<ImportType> {
        ImportType::make(
            import.module().into(),
            import.name().into(),
            ExternType::own_from_wasmtime(&import.ty()),
        )
    }
}

impl DeepCopy for ImportType {
    fn copy(&self) -> ImportType {
        ImportType {
            module: self.module.copy(),
            name: self.name.copy(),
            ty: self.ty.copy(),
        }
    }
}
