use crate::{call, compile, func_type, store};
use anyhow::{Context, Result};
use wasm_embed::types::*;
use wasm_embed::*;

const IMPORTS_ONE_FUNC: &str = r#"
    (module
        (import "host" "f" (func (param i32)))
        (func (export "run") i32.const 1 call 0))
"#;

fn sink(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    Ok(WasmVec::default())
}

fn explode(_: &WasmVec<Val>) -> Result<WasmVec<Val>, Own<Trap>> {
    panic!("start function blew up")
}

#[test]
fn import_count_must_match() -> Result<()> {
    let store = store();
    let module = compile(&store, IMPORTS_ONE_FUNC)?;
    assert!(Instance::make(&store, &module, &WasmVec::default()).is_empty());

    let f = Func::make(&store, &func_type(&[ValKind::I32], &[]), sink);
    let imports: WasmVec<Own<Extern>> = wasm_vec![f.copy().upcast::<Extern>(), f.upcast::<Extern>()];
    let trap = Instance::try_make(&store, &module, &imports).unwrap_err();
    assert!(trap.message().contains("expected 1 imports"), "{}", trap.message());
    Ok(())
}

#[test]
fn null_imports_are_rejected() -> Result<()> {
    let store = store();
    let module = compile(&store, IMPORTS_ONE_FUNC)?;
    let imports: WasmVec<Own<Extern>> = wasm_vec![Own::<Extern>::empty()];
    assert!(Instance::make(&store, &module, &imports).is_empty());
    Ok(())
}

#[test]
fn import_types_must_match() -> Result<()> {
    let store = store();
    let module = compile(&store, IMPORTS_ONE_FUNC)?;
    let wrong = Func::make(&store, &func_type(&[ValKind::I64], &[]), sink);
    assert!(Instance::make(&store, &module, &wasm_vec![wrong.upcast::<Extern>()]).is_empty());

    let memory = Memory::make(&store, &MemoryType::new(Limits::new(1)));
    assert!(Instance::make(&store, &module, &wasm_vec![memory.upcast::<Extern>()]).is_empty());
    Ok(())
}

#[test]
fn imports_must_come_from_the_same_store() -> Result<()> {
    let store = store();
    let module = compile(&store, IMPORTS_ONE_FUNC)?;
    let other = crate::store();
    let f = Func::make(&other, &func_type(&[ValKind::I32], &[]), sink);
    let trap = Instance::try_make(&store, &module, &wasm_vec![f.upcast::<Extern>()]).unwrap_err();
    assert!(trap.message().contains("different store"), "{}", trap.message());
    Ok(())
}

#[test]
fn modules_must_come_from_the_same_engine() -> Result<()> {
    let store = store();
    let other = crate::store();
    let module = compile(&other, "(module)")?;
    assert!(Instance::make(&store, &module, &WasmVec::default()).is_empty());
    Ok(())
}

#[test]
fn start_function_trap_is_reported() -> Result<()> {
    let store = store();
    let module = compile(
        &store,
        r#"
            (module
                (func $start unreachable)
                (start $start))
        "#,
    )?;
    let trap = Instance::try_make(&store, &module, &WasmVec::default()).unwrap_err();
    assert_eq!(trap.code(), Some(TrapCode::UnreachableCodeReached));
    assert!(Instance::make(&store, &module, &WasmVec::default()).is_empty());
    Ok(())
}

#[test]
fn start_function_panic_is_reported() -> Result<()> {
    let store = store();
    let module = compile(
        &store,
        r#"
            (module
                (import "host" "explode" (func $explode))
                (start $explode))
        "#,
    )?;
    let explode = Func::make(&store, &FuncType::default(), explode);
    let imports = wasm_vec![explode.upcast::<Extern>()];

    let trap = Instance::try_make(&store, &module, &imports).unwrap_err();
    assert!(trap.message().contains("start function blew up"), "{}", trap.message());
    assert_eq!(trap.code(), None);
    assert!(Instance::make(&store, &module, &imports).is_empty());

    // The store is still usable afterwards.
    let module = compile(&store, r#"(module (func (export "one") (result i32) i32.const 1))"#)?;
    let instance = Instance::make(&store, &module, &WasmVec::default());
    let exports = instance.exports();
    let one = exports[0].func().context("expected a function")?;
    assert_eq!(call(one, WasmVec::default())?[0].i32(), 1);
    Ok(())
}

#[test]
fn exports_follow_declaration_order() -> Result<()> {
    let store = store();
    let module = compile(
        &store,
        r#"
            (module
                (memory (export "m") 1)
                (func (export "f"))
                (global (export "g") i32 (i32.const 0))
                (table (export "t") 1 funcref))
        "#,
    )?;
    let instance = Instance::make(&store, &module, &WasmVec::default());
    let exports = instance.exports();
    let kinds = exports.iter().map(|e| e.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            ExternKind::Memory,
            ExternKind::Func,
            ExternKind::Global,
            ExternKind::Table,
        ]
    );

    let types = module.exports();
    for (export, ty) in exports.iter().zip(types.iter()) {
        assert_eq!(*export.type_(), *ty.ty());
    }
    Ok(())
}

#[test]
fn exports_outlive_the_instance() -> Result<()> {
    let store = store();
    let module = compile(&store, r#"(module (func (export "one") (result i32) i32.const 1))"#)?;
    let instance = Instance::make(&store, &module, &WasmVec::default());
    let exports = instance.exports();
    drop(instance);
    drop(module);
    let one = exports[0].func().context("expected a function")?;
    assert_eq!(call(one, WasmVec::default())?[0].i32(), 1);
    Ok(())
}

#[test]
fn copies_share_exports() -> Result<()> {
    let store = store();
    let module = compile(
        &store,
        r#"
            (module
                (global (export "g") (mut i32) (i32.const 0)))
        "#,
    )?;
    let instance = Instance::make(&store, &module, &WasmVec::default());
    let copy = instance.copy();
    let exports = instance.exports();
    let global = exports[0].global().context("expected a global")?;
    assert!(global.set(&Val::from(4i32)));
    let copied = copy.exports();
    assert_eq!(copied[0].global().context("expected a global")?.get().i32(), 4);
    Ok(())
}
