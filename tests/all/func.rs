use crate::{call, compile, export_func, func_type, instantiate, store};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
use wasm_embed::types::*;
use wasm_embed::*;

fn double(args: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    Ok(wasm_vec![args[0].i32() * 2])
}

fn fail(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    Err(Own::new(Trap::new("host says no")))
}

fn explode(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    panic!("kaboom")
}

fn nothing(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    Ok(WasmVec::default())
}

fn invalid(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    Ok(WasmVec::invalid())
}

#[test]
fn host_func_called_directly() -> Result<()> {
    let store = store();
    let ty = func_type(&[ValKind::I32], &[ValKind::I32]);
    let f = Func::make(&store, &ty, double);
    assert_eq!(f.param_arity(), 1);
    assert_eq!(f.result_arity(), 1);
    assert_eq!(*f.type_(), ty);

    let results = call(&f, wasm_vec![21i32])?;
    assert_eq!(results.size(), 1);
    assert_eq!(results[0].i32(), 42);
    Ok(())
}

#[test]
fn host_func_called_from_wasm() -> Result<()> {
    let store = store();
    let double = Func::make(
        &store,
        &func_type(&[ValKind::I32], &[ValKind::I32]),
        double,
    );
    let instance = instantiate(
        &store,
        r#"
            (module
                (import "" "double" (func $double (param i32) (result i32)))
                (func (export "quad") (param i32) (result i32)
                    local.get 0
                    call $double
                    call $double))
        "#,
        &wasm_vec![double.upcast::<Extern>()],
    )?;
    let exports = instance.exports();
    let quad = export_func(&exports, 0)?;
    let results = call(quad, wasm_vec![3i32])?;
    assert_eq!(results[0].i32(), 12);
    Ok(())
}

#[test]
fn empty_results_are_valid() -> Result<()> {
    let store = store();
    let f = Func::make(&store, &FuncType::default(), nothing);
    let results = call(&f, WasmVec::default())?;
    assert!(results.is_valid());
    assert_eq!(results.size(), 0);
    Ok(())
}

#[test]
fn invalid_vectors_are_not_empty_ones() {
    let store = store();
    let f = Func::make(&store, &FuncType::default(), nothing);
    let trap = f.call(&WasmVec::invalid()).unwrap_err();
    assert_eq!(trap.message(), "argument vector is invalid");
    assert_eq!(trap.code(), None);

    let f = Func::make(&store, &FuncType::default(), invalid);
    let trap = f.call(&WasmVec::default()).unwrap_err();
    assert!(trap.message().contains("invalid result vector"), "{}", trap.message());

    let f = Func::make(&store, &func_type(&[], &[ValKind::I32]), invalid);
    assert!(f.call(&WasmVec::default()).is_err());
}

#[test]
fn env_finalizer_runs_once() -> Result<()> {
    static FINALIZED: AtomicUsize = AtomicUsize::new(0);

    fn add(env: &i32, args: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
        Ok(wasm_vec![args[0].i32() + *env])
    }

    fn finalize(env: i32) {
        FINALIZED.fetch_add(env as usize, SeqCst);
    }

    let store = store();
    let ty = func_type(&[ValKind::I32], &[ValKind::I32]);
    let f = Func::make_with_env(&store, &ty, add, 5, Some(finalize));
    assert_eq!(call(&f, wasm_vec![1i32])?[0].i32(), 6);
    let copy = f.copy();
    assert_eq!(call(&copy, wasm_vec![2i32])?[0].i32(), 7);

    drop(f);
    drop(copy);
    assert_eq!(FINALIZED.load(SeqCst), 0);
    drop(store);
    assert_eq!(FINALIZED.load(SeqCst), 5);
    Ok(())
}

#[test]
fn env_without_finalizer_is_dropped() {
    static DROPPED: AtomicUsize = AtomicUsize::new(0);

    struct Env;

    impl Drop for Env {
        fn drop(&mut self) {
            DROPPED.fetch_add(1, SeqCst);
        }
    }

    fn callback(_: &Env, _: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
        Ok(WasmVec::default())
    }

    let store = store();
    let f = Func::make_with_env(&store, &FuncType::default(), callback, Env, None);
    assert!(f.call(&WasmVec::default()).is_ok());
    drop(f);
    drop(store);
    assert_eq!(DROPPED.load(SeqCst), 1);
}

#[test]
fn host_trap_is_reported() -> Result<()> {
    let store = store();
    let fail = Func::make(&store, &FuncType::default(), fail);
    let instance = instantiate(
        &store,
        r#"
            (module
                (import "" "fail" (func $fail))
                (func (export "run") call $fail))
        "#,
        &wasm_vec![fail.upcast::<Extern>()],
    )?;
    let exports = instance.exports();
    let trap = export_func(&exports, 0)?.call(&WasmVec::default()).unwrap_err();
    assert_eq!(trap.message(), "host says no");
    assert_eq!(trap.code(), None);
    Ok(())
}

#[test]
fn host_panic_becomes_trap() {
    let store = store();
    let f = Func::make(&store, &FuncType::default(), explode);
    let trap = f.call(&WasmVec::default()).unwrap_err();
    assert!(trap.message().contains("kaboom"), "{}", trap.message());

    // The store is still usable afterwards.
    let g = Func::make(&store, &FuncType::default(), nothing);
    assert!(g.call(&WasmVec::default()).is_ok());
}

#[test]
fn wrong_result_count_is_a_trap() {
    let store = store();
    let f = Func::make(&store, &func_type(&[], &[ValKind::I64]), nothing);
    assert!(f.call(&WasmVec::default()).is_err());
}

#[test]
fn arguments_are_checked() {
    let store = store();
    let f = Func::make(
        &store,
        &func_type(&[ValKind::I32], &[ValKind::I32]),
        double,
    );
    let trap = f.call(&WasmVec::default()).unwrap_err();
    assert_eq!(trap.code(), None);
    assert!(f.call(&wasm_vec![1i64]).is_err());
    assert!(f.call(&wasm_vec![1i32, 2i32]).is_err());
    assert!(f.call_values(&[Val::from(4i32)]).is_ok());
}

#[test]
fn funcref_round_trips_through_wasm() -> Result<()> {
    let store = store();
    let instance = instantiate(
        &store,
        r#"
            (module
                (func (export "id") (param funcref) (result funcref) local.get 0)
                (func (export "answer") (result i32) i32.const 42))
        "#,
        &WasmVec::default(),
    )?;
    let exports = instance.exports();
    let id = export_func(&exports, 0)?;
    let answer = export_func(&exports, 1)?.copy();

    let mut results = call(id, wasm_vec![Own::new(answer)])?;
    let returned = results.slot(0).release_ref();
    let returned = returned
        .as_extern()
        .and_then(Extern::func)
        .context("expected a function")?;
    assert_eq!(call(returned, WasmVec::default())?[0].i32(), 42);

    let results = call(id, wasm_vec![Val::null()])?;
    assert!(results[0].is_null());
    Ok(())
}

#[test]
fn host_objects_round_trip_through_wasm_as_anyref() -> Result<()> {
    let store = store();
    let instance = instantiate(
        &store,
        r#"(module (func (export "id") (param externref) (result externref) local.get 0))"#,
        &WasmVec::default(),
    )?;
    let exports = instance.exports();
    let id = export_func(&exports, 0)?;

    let mut results = call(id, wasm_vec![Foreign::make(&store)])?;
    let returned = results.slot(0).release_ref();
    assert_eq!(returned.kind(), RefKind::Foreign);
    assert!(returned.get_host_info().is_null());

    let results = call(id, wasm_vec![instance.copy()])?;
    let returned = results[0].ref_().and_then(Ref::as_instance).context("expected an instance")?;
    assert_eq!(returned.exports().size(), 1);
    Ok(())
}

#[test]
fn host_callbacks_receive_anyref_arguments() -> Result<()> {
    fn kind_of(args: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
        let kind = match args[0].ref_().map(Ref::kind) {
            None => 0,
            Some(RefKind::Module) => 1,
            Some(RefKind::Foreign) => 2,
            Some(RefKind::Extern) => 3,
            Some(RefKind::Instance) => 4,
        };
        Ok(wasm_vec![kind])
    }

    let store = store();
    let ty = func_type(&[ValKind::AnyRef], &[ValKind::I32]);
    let f = Func::make(&store, &ty, kind_of);
    let module = compile(&store, "(module)")?;
    assert_eq!(call(&f, wasm_vec![Val::null()])?[0].i32(), 0);
    assert_eq!(call(&f, wasm_vec![module])?[0].i32(), 1);
    assert_eq!(call(&f, wasm_vec![Foreign::make(&store)])?[0].i32(), 2);
    Ok(())
}

#[test]
fn funcref_parameters_take_functions_of_the_same_store() -> Result<()> {
    let store = store();
    let module = compile(
        &store,
        r#"(module (func (export "id") (param funcref) (result funcref) local.get 0))"#,
    )?;
    let instance = Instance::make(&store, &module, &WasmVec::default());
    let exports = instance.exports();
    let id = export_func(&exports, 0)?;

    let foreign = Foreign::make(&store);
    assert!(id.call(&wasm_vec![foreign]).is_err());

    let other = crate::store();
    let elsewhere = Func::make(&other, &FuncType::default(), nothing);
    assert!(id.call(&wasm_vec![elsewhere]).is_err());
    Ok(())
}
