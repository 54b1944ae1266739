use crate::{compile, func_type, store};
use anyhow::{Context, Result};
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
use wasm_embed::*;

fn nothing(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    Ok(WasmVec::default())
}

#[test]
fn finalizers_run_once_per_attachment() -> Result<()> {
    static FINALIZED: AtomicUsize = AtomicUsize::new(0);

    fn finalize(info: *mut c_void) {
        FINALIZED.fetch_add(info as usize, SeqCst);
    }

    let store = store();
    let mut module = compile(&store, "(module)")?;
    let mut func = Func::make(&store, &func_type(&[], &[]), nothing);
    let mut instance = Instance::make(&store, &module, &WasmVec::default());

    module.set_host_info(1 as *mut c_void, Some(finalize));
    func.set_host_info(10 as *mut c_void, Some(finalize));
    instance.set_host_info(100 as *mut c_void, Some(finalize));
    assert_eq!(module.get_host_info() as usize, 1);
    assert_eq!(func.get_host_info() as usize, 10);
    assert_eq!(instance.get_host_info() as usize, 100);

    func.set_host_info(1000 as *mut c_void, Some(finalize));
    assert_eq!(FINALIZED.load(SeqCst), 10);

    drop(module);
    drop(func);
    drop(instance);
    assert_eq!(FINALIZED.load(SeqCst), 1111);
    Ok(())
}

#[test]
fn copies_start_without_host_info() {
    static FINALIZED: AtomicUsize = AtomicUsize::new(0);

    fn finalize(_: *mut c_void) {
        FINALIZED.fetch_add(1, SeqCst);
    }

    let store = store();
    let mut func = Func::make(&store, &func_type(&[], &[]), nothing);
    func.set_host_info(ptr::dangling_mut(), Some(finalize));

    let copy = func.copy();
    assert!(copy.get_host_info().is_null());
    drop(copy);
    assert_eq!(FINALIZED.load(SeqCst), 0);
    drop(func);
    assert_eq!(FINALIZED.load(SeqCst), 1);
}

#[test]
fn host_info_travels_with_the_object() -> Result<()> {
    static FINALIZED: AtomicUsize = AtomicUsize::new(0);

    fn finalize(_: *mut c_void) {
        FINALIZED.fetch_add(1, SeqCst);
    }

    let store = store();
    let mut module = compile(&store, "(module)")?;
    module.set_host_info(ptr::dangling_mut(), Some(finalize));

    let mut val = Val::from(module);
    assert_eq!(val.ref_().map(Ref::kind), Some(RefKind::Module));
    let r = val.ref_().context("expected a reference")?;
    assert_eq!(r.get_host_info(), ptr::dangling_mut());

    let moved = val.take();
    assert!(val.is_null());
    drop(val);
    assert_eq!(FINALIZED.load(SeqCst), 0);

    let copy = moved.copy();
    let r = copy.ref_().context("expected a reference")?;
    assert!(r.as_module().is_some());
    assert!(r.get_host_info().is_null());
    drop(copy);
    assert_eq!(FINALIZED.load(SeqCst), 0);

    drop(moved);
    assert_eq!(FINALIZED.load(SeqCst), 1);
    Ok(())
}

#[test]
fn foreign_objects_only_carry_host_info() {
    static FINALIZED: AtomicUsize = AtomicUsize::new(0);

    fn finalize(_: *mut c_void) {
        FINALIZED.fetch_add(1, SeqCst);
    }

    let store = store();
    let mut foreign = Foreign::make(&store);
    foreign.set_host_info(ptr::dangling_mut(), Some(finalize));
    let mut r = foreign.upcast::<Ref>();
    assert_eq!(r.kind(), RefKind::Foreign);
    r.set_host_info(ptr::null_mut(), None);
    assert_eq!(FINALIZED.load(SeqCst), 1);
    drop(r);
    assert_eq!(FINALIZED.load(SeqCst), 1);
}
