use crate::{Engine, Own};
use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

/// Per-store data handed to the engine.
///
/// Host callbacks only receive the engine's view of the store, so the data
/// keeps a way back to the shared handle every API object holds.
pub(crate) struct StoreData {
    this: Weak<RefCell<wasmtime::Store<StoreData>>>,
}

impl StoreData {
    pub(crate) fn store_ref(&self) -> Option<StoreRef> {
        self.this.upgrade().map(|store| StoreRef { store })
    }
}

/// A shared reference to an engine store.
///
/// Every runtime object keeps one of these, so a store lives as long as the
/// last object created in it.
#[derive(Clone)]
pub(crate) struct StoreRef {
    store: Rc<RefCell<wasmtime::Store<StoreData>>>,
}

impl std::fmt::Debug for StoreRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRef")
            .field("store", &Rc::as_ptr(&self.store))
            .finish()
    }
}

impl StoreRef {
    fn new(engine: &wasmtime::Engine) -> StoreRef {
        let store = Rc::new_cyclic(|this| {
            RefCell::new(wasmtime::Store::new(
                engine,
                StoreData { this: this.clone() },
            ))
        });
        StoreRef { store }
    }

    /// Borrows the engine store.
    ///
    /// # Panics
    ///
    /// Panics when called from within a host callback running in this store.
    pub(crate) fn context(&self) -> RefMut<'_, wasmtime::Store<StoreData>> {
        match self.store.try_borrow_mut() {
            Ok(store) => store,
            Err(_) => panic!("store accessed from within one of its own host callbacks"),
        }
    }

    pub(crate) fn try_context(&self) -> Option<RefMut<'_, wasmtime::Store<StoreData>>> {
        self.store.try_borrow_mut().ok()
    }

    pub(crate) fn engine(&self) -> wasmtime::Engine {
        self.context().engine().clone()
    }

    /// Whether both references designate the same store.
    pub(crate) fn same(&self, other: &StoreRef) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

/// An execution context. Every runtime object belongs to exactly one store
/// and must only be used together with objects of the same store.
#[derive(Debug)]
pub struct Store {
    pub(crate) store: StoreRef,
}

impl Store {
    /// Creates a store for `engine`. If the engine meters fuel the store
    /// starts out with the configured initial amount.
    pub fn make(engine: &Engine) -> Own<Store> {
        let store = StoreRef::new(engine.wasmtime());
        if let Some(fuel) = engine.initial_fuel() {
            let result = store.context().set_fuel(fuel);
            if crate::handle_result(result, "setting initial fuel", |()| ()).is_none() {
                return Own::empty();
            }
        }
        log::trace!("created store");
        Own::new(Store { store })
    }

    /// Remaining fuel, or `None` if fuel metering is disabled.
    pub fn fuel(&self) -> Option<u64> {
        self.store.context().get_fuel().ok()
    }

    /// Replaces the remaining fuel. Fails if fuel metering is disabled.
    pub fn set_fuel(&self, fuel: u64) -> bool {
        let result = self.store.context().set_fuel(fuel);
        crate::handle_result(result, "setting fuel", |()| ()).is_some()
    }
}
