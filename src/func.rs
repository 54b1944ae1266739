use crate::r#ref::HostInfo;
use crate::store::{StoreData, StoreRef};
use crate::trap::HostTrap;
use crate::types::{FuncType, ValType};
use crate::{DeepCopy, Own, Store, Trap, Val, WasmVec};
use anyhow::{anyhow, bail};
use std::mem::ManuallyDrop;
use std::panic::{self, AssertUnwindSafe};

/// A host function: maps the arguments to the results, or fails with a trap.
pub type Callback = fn(&WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>>;

/// A host function receiving an environment registered alongside it.
pub type CallbackWithEnv<E> = fn(&E, &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>>;

/// Runs the embedder's finalizer over a callback environment when the engine
/// drops the callback.
struct HostEnv<E> {
    env: ManuallyDrop<E>,
    finalizer: Option<fn(E)>,
}

impl<E> Drop for HostEnv<E> {
    fn drop(&mut self) {
        // SAFETY: `env` is not used again after this point.
        let env = unsafe { ManuallyDrop::take(&mut self.env) };
        if let Some(f) = self.finalizer {
            f(env);
        }
    }
}

/// A function, defined either by a module or by the host.
#[derive(Debug)]
pub struct Func {
    store: StoreRef,
    func: wasmtime::Func,
    host_info: HostInfo,
}

declare_ref!(Func);

fn create_function(
    store: &Store,
    ty: &FuncType,
    func: impl Fn(&WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> + Send + Sync + 'static,
) -> Own<Func> {
    let store = store.store.clone();
    let kinds = ty.result_kinds();
    let func = {
        let mut cx = store.context();
        let ty = ty.to_wasmtime(cx.engine());
        wasmtime::Func::new(
            &mut *cx,
            ty,
            move |mut caller: wasmtime::Caller<'_, StoreData>, params, results| {
                let Some(store) = caller.data().store_ref() else {
                    bail!("host function called after its store was dropped");
                };
                let args = params
                    .iter()
                    .map(|p| Val::from_wasmtime(p, &store, &caller))
                    .collect::<WasmVec<Val>>();
                let out = func(&args)
                    .map_err(|trap| anyhow::Error::new(HostTrap::new(trap.as_deref())))?;
                if !out.is_valid() {
                    bail!("host function returned an invalid result vector");
                }
                if out.len() != results.len() {
                    bail!(
                        "host function returned {} results, expected {}",
                        out.len(),
                        results.len()
                    );
                }
                for (i, (slot, (val, kind))) in results
                    .iter_mut()
                    .zip(out.iter().zip(&kinds))
                    .enumerate()
                {
                    *slot = val.to_wasmtime(*kind, &store, &mut caller).ok_or_else(|| {
                        anyhow!("host function result {i} is not a valid {kind:?}")
                    })?;
                }
                Ok(())
            },
        )
    };
    log::trace!("created host function");
    Own::new(Func {
        store,
        func,
        host_info: HostInfo::default(),
    })
}

impl Func {
    /// Creates a host function of type `ty` in `store`.
    pub fn make(store: &Store, ty: &FuncType, callback: Callback) -> Own<Func> {
        create_function(store, ty, move |args| callback(args))
    }

    /// Creates a host function with an environment. The `finalizer`, if
    /// any, receives the environment once the store drops the function;
    /// otherwise the environment is simply dropped.
    pub fn make_with_env<E>(
        store: &Store,
        ty: &FuncType,
        callback: CallbackWithEnv<E>,
        env: E,
        finalizer: Option<fn(E)>,
    ) -> Own<Func>
    where
        E: Send + Sync + 'static,
    {
        let env = HostEnv {
            env: ManuallyDrop::new(env),
            finalizer,
        };
        create_function(store, ty, move |args| callback(&env.env, args))
    }

    pub fn type_(&self) -> Own<FuncType> {
        Own::new(self.ty())
    }

    pub fn param_arity(&self) -> usize {
        self.func.ty(&*self.store.context()).params().len()
    }

    pub fn result_arity(&self) -> usize {
        self.func.ty(&*self.store.context()).results().len()
    }

    /// Calls the function synchronously.
    ///
    /// Any fault, whether raised by wasm code, by a host callback or by
    /// arguments that do not match the function's type, is returned as a
    /// trap. A panic in a host callback is also turned into a trap.
    pub fn call(&self, args: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
        let Some(mut cx) = self.store.try_context() else {
            return Err(Own::new(Trap::new(
                "cannot call into a store from within one of its own host callbacks",
            )));
        };
        let ty = self.func.ty(&*cx);
        if !args.is_valid() {
            return Err(Own::new(Trap::new("argument vector is invalid")));
        }
        if args.len() != ty.params().len() {
            return Err(Own::new(Trap::new(format!(
                "expected {} arguments, got {}",
                ty.params().len(),
                args.len()
            ))));
        }
        let mut cx = wasmtime::RootScope::new(&mut *cx);
        let mut params = Vec::with_capacity(args.len());
        for (i, (arg, param)) in args.iter().zip(ty.params()).enumerate() {
            let kind = ValType::from_wasmtime(&param).kind();
            match arg.to_wasmtime(kind, &self.store, &mut cx) {
                Some(val) => params.push(val),
                None => {
                    return Err(Own::new(Trap::new(format!(
                        "argument {i} is not a valid {kind:?}"
                    ))));
                }
            }
        }
        let mut results = vec![wasmtime::Val::I32(0); ty.results().len()];

        // We're calling arbitrary host code here, so catch panics and turn
        // them into traps.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.func.call(&mut cx, &params, &mut results)
        }));
        match result {
            Ok(Ok(())) => Ok(results
                .iter()
                .map(|r| Val::from_wasmtime(r, &self.store, &cx))
                .collect()),
            Ok(Err(err)) => Err(Trap::from_error(err)),
            Err(panic) => Err(Trap::from_panic(panic)),
        }
    }

    /// Calls the function with copies of `args`.
    pub fn call_values(&self, args: &[Val]) -> Result<WasmVec<Val>, Own<Trap>> {
        self.call(&args.iter().map(Val::copy).collect::<WasmVec<Val>>())
    }

    pub(crate) fn ty(&self) -> FuncType {
        FuncType::from_wasmtime(&self.func.ty(&*self.store.context()))
    }

    pub(crate) fn from_wasmtime(func: wasmtime::Func, store: StoreRef) -> Func {
        Func {
            store,
            func,
            host_info: HostInfo::default(),
        }
    }

    /// The engine function, if this function belongs to `store`.
    pub(crate) fn wasmtime_in(&self, store: &StoreRef) -> Option<wasmtime::Func> {
        self.store.same(store).then_some(self.func)
    }
}

impl DeepCopy for Func {
    fn copy(&self) -> Func {
        Func::from_wasmtime(self.func, self.store.clone())
    }
}
