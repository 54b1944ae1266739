use crate::{compile, store};
use anyhow::{Context, Result};
use wasm_embed::types::*;
use wasm_embed::*;

const DESCRIBED: &str = r#"
    (module
        (import "env" "log" (func (param i32) (result i64)))
        (import "env" "scale" (global (mut f32)))
        (import "env" "table" (table 1 2 funcref))
        (import "env" "memory" (memory 1))
        (func (export "run"))
        (global (export "answer") i32 (i32.const 42))
        (memory (export "heap") 2 4))
"#;

#[test]
fn validate() -> Result<()> {
    let store = store();
    let binary = WasmVec::from(wat::parse_str(DESCRIBED)?);
    assert!(Module::validate(&store, &binary));
    assert!(!Module::validate(&store, &WasmVec::from_bytes(b"\0asm garbage")));
    assert!(!Module::validate(&store, &WasmVec::invalid()));
    Ok(())
}

#[test]
fn invalid_binaries_do_not_compile() {
    let store = store();
    assert!(Module::make(&store, &WasmVec::from_bytes(b"not wasm")).is_empty());
    assert!(Module::make(&store, &WasmVec::invalid()).is_empty());
}

#[test]
fn import_descriptors() -> Result<()> {
    let store = store();
    let module = compile(&store, DESCRIBED)?;
    let imports = module.imports();
    assert_eq!(imports.size(), 4);

    let names = imports
        .iter()
        .map(|i| (i.module().to_str(), i.name().to_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            (Some("env"), Some("log")),
            (Some("env"), Some("scale")),
            (Some("env"), Some("table")),
            (Some("env"), Some("memory")),
        ]
    );

    let func = imports[0].ty().func().context("expected a function")?;
    assert_eq!(
        *func,
        FuncType::new(
            wasm_vec![ValType::new(ValKind::I32)],
            wasm_vec![ValType::new(ValKind::I64)],
        )
    );

    let global = imports[1].ty().global().context("expected a global")?;
    assert_eq!(global.content().kind(), ValKind::F32);
    assert_eq!(global.mutability(), Mutability::Var);

    let table = imports[2].ty().table().context("expected a table")?;
    assert_eq!(table.element().kind(), ValKind::FuncRef);
    assert_eq!(table.limits(), Limits::with_max(1, 2));

    let memory = imports[3].ty().memory().context("expected a memory")?;
    assert_eq!(memory.limits(), Limits::new(1));
    assert!(imports[3].ty().func().is_none());
    Ok(())
}

#[test]
fn export_descriptors() -> Result<()> {
    let store = store();
    let module = compile(&store, DESCRIBED)?;
    let exports = module.exports();
    let kinds = exports
        .iter()
        .map(|e| (e.name().to_str(), e.ty().kind()))
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            (Some("run"), ExternKind::Func),
            (Some("answer"), ExternKind::Global),
            (Some("heap"), ExternKind::Memory),
        ]
    );
    assert_eq!(
        *exports[1].ty().global().context("expected a global")?,
        GlobalType::new(ValType::new(ValKind::I32), Mutability::Const)
    );
    assert_eq!(
        exports[2].ty().memory().context("expected a memory")?.limits(),
        Limits::with_max(2, 4)
    );
    Ok(())
}

#[test]
fn copies_describe_the_same_module() -> Result<()> {
    let store = store();
    let module = compile(&store, DESCRIBED)?;
    let copy = module.copy();
    assert_eq!(copy.imports(), module.imports());
    assert_eq!(copy.exports(), module.exports());
    drop(module);
    assert_eq!(copy.exports().size(), 3);
    Ok(())
}

#[test]
fn descriptors_are_independent_of_the_module() -> Result<()> {
    let store = store();
    let module = compile(&store, DESCRIBED)?;
    let mut exports = module.exports();
    drop(module);
    let first = exports.slot(0).take();
    assert_eq!(first.name().to_str(), Some("run"));
    assert!(exports[0].is_empty());
    Ok(())
}
