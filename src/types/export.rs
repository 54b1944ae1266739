use crate::own::{DeepCopy, Own};
use crate::types::{ExternType, Name};

/// A module export: its name and the type of the exported entity.
#[derive(Debug, PartialEq)]
pub struct ExportType {
    name: Name,
    ty: Own<ExternType>,
}

impl ExportType {
    /// Creates an export descriptor, or an empty handle if `ty` is empty.
    pub fn make(name: Name, ty: Own<ExternType>) -> Own<ExportType> {
        if ty.is_empty() {
            return Own::empty();
        }
        Own::new(ExportType { name, ty })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn ty(&self) -> &ExternType {
        &self.ty
    }

    pub(crate) fn from_wasmtime(export: &wasmtime::ExportType<'_>) -> Own<ExportType> {
        ExportType::make(
            export.name().into(),
            ExternType::own_from_wasmtime(&export.ty()),
        )
    }
}

impl DeepCopy for ExportType {
    fn copy(&self) -> ExportType {
        ExportType {
            name: self.name.copy(),
            ty: self.ty.copy(),
        }
    }
}
