use crate::r#ref::HostInfo;
use crate::store::StoreRef;
use crate::types::{TableType, ValKind};
use crate::{DeepCopy, Own, Ref, Store};

/// A table of references.
#[derive(Debug)]
pub struct Table {
    store: StoreRef,
    table: wasmtime::Table,
    host_info: HostInfo,
}

declare_ref!(Table);

impl Table {
    /// Creates a table of type `ty` with every element set to `init`, or
    /// null if `init` is `None`.
    pub fn make(store: &Store, ty: &TableType, init: Option<&Ref>) -> Own<Table> {
        let store = store.store.clone();
        let Some(wasm_ty) = ty.to_wasmtime() else {
            log::debug!("table element type must be a reference, got {ty:?}");
            return Own::empty();
        };
        if ty.limits().min > ty.limits().max {
            log::debug!("table minimum exceeds its maximum in {ty:?}");
            return Own::empty();
        }
        let table = {
            let mut cx = store.context();
            let mut cx = wasmtime::RootScope::new(&mut *cx);
            let Some(init) = Ref::to_wasmtime(init, ty.element().kind(), &store, &mut cx) else {
                log::debug!("initial element does not match table type {ty:?}");
                return Own::empty();
            };
            wasmtime::Table::new(&mut cx, wasm_ty, init)
        };
        crate::handle_result(table, "creating a table", |table| {
            Table::from_wasmtime(table, store)
        })
        .map_or_else(Own::empty, Own::new)
    }

    pub fn type_(&self) -> Own<TableType> {
        Own::new(self.ty())
    }

    /// The element at `index`; empty if the element is null or `index` is
    /// out of bounds.
    pub fn get(&self, index: u32) -> Own<Ref> {
        let mut cx = self.store.context();
        let mut cx = wasmtime::RootScope::new(&mut *cx);
        match self.table.get(&mut cx, index.into()) {
            Some(r) => Ref::from_wasmtime(&r, &self.store, &cx),
            None => Own::empty(),
        }
    }

    /// Stores `r` at `index`. Fails if `index` is out of bounds or `r`
    /// cannot be stored in this table.
    pub fn set(&self, index: u32, r: Option<&Ref>) -> bool {
        let element = self.element();
        let mut cx = self.store.context();
        let mut cx = wasmtime::RootScope::new(&mut *cx);
        let Some(r) = Ref::to_wasmtime(r, element, &self.store, &mut cx) else {
            return false;
        };
        let result = self.table.set(&mut cx, index.into(), r);
        crate::handle_result(result, "setting a table element", |()| ()).is_some()
    }

    /// The current number of elements.
    pub fn size(&self) -> u32 {
        let size = self.table.size(&*self.store.context());
        u32::try_from(size).unwrap_or(u32::MAX)
    }

    /// Adds `delta` null elements, returning the previous size. Growth is
    /// all or nothing: on failure the size is unchanged.
    pub fn grow(&self, delta: u32) -> Option<u32> {
        self.grow_with(delta, None)
    }

    /// Adds `delta` elements set to `init`, returning the previous size.
    pub fn grow_with(&self, delta: u32, init: Option<&Ref>) -> Option<u32> {
        let element = self.element();
        let mut cx = self.store.context();
        let mut cx = wasmtime::RootScope::new(&mut *cx);
        let init = Ref::to_wasmtime(init, element, &self.store, &mut cx)?;
        let result = self.table.grow(&mut cx, delta.into(), init);
        crate::handle_result(result, "growing a table", |prev| u32::try_from(prev).ok())?
    }

    fn element(&self) -> ValKind {
        self.ty().element().kind()
    }

    pub(crate) fn ty(&self) -> TableType {
        TableType::from_wasmtime(&self.table.ty(&*self.store.context()))
    }

    pub(crate) fn from_wasmtime(table: wasmtime::Table, store: StoreRef) -> Table {
        Table {
            store,
            table,
            host_info: HostInfo::default(),
        }
    }

    pub(crate) fn wasmtime_in(&self, store: &StoreRef) -> Option<wasmtime::Table> {
        self.store.same(store).then_some(self.table)
    }
}

impl DeepCopy for Table {
    fn copy(&self) -> Table {
        Table::from_wasmtime(self.table, self.store.clone())
    }
}
