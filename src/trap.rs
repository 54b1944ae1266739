use crate::{DeepCopy, Own, Store};
use std::any::Any;

/// Why the engine stopped executing wasm code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrapCode {
    StackOverflow,
    MemoryOutOfBounds,
    HeapMisaligned,
    TableOutOfBounds,
    IndirectCallToNull,
    BadSignature,
    IntegerOverflow,
    IntegerDivisionByZero,
    BadConversionToInteger,
    UnreachableCodeReached,
    Interrupt,
    OutOfFuel,
}

impl TrapCode {
    fn from_wasmtime(trap: wasmtime::Trap) -> Option<TrapCode> {
        use wasmtime::Trap;
        Some(match trap {
            Trap::StackOverflow => TrapCode::StackOverflow,
            Trap::MemoryOutOfBounds => TrapCode::MemoryOutOfBounds,
            Trap::HeapMisaligned => TrapCode::HeapMisaligned,
            Trap::TableOutOfBounds => TrapCode::TableOutOfBounds,
            Trap::IndirectCallToNull => TrapCode::IndirectCallToNull,
            Trap::BadSignature => TrapCode::BadSignature,
            Trap::IntegerOverflow => TrapCode::IntegerOverflow,
            Trap::IntegerDivisionByZero => TrapCode::IntegerDivisionByZero,
            Trap::BadConversionToInteger => TrapCode::BadConversionToInteger,
            Trap::UnreachableCodeReached => TrapCode::UnreachableCodeReached,
            Trap::Interrupt => TrapCode::Interrupt,
            Trap::OutOfFuel => TrapCode::OutOfFuel,
            _ => return None,
        })
    }
}

/// A trap raised by a host callback, carried through the engine unchanged.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct HostTrap {
    message: String,
    code: Option<TrapCode>,
}

impl HostTrap {
    pub(crate) fn new(trap: Option<&Trap>) -> HostTrap {
        match trap {
            Some(trap) => HostTrap {
                message: trap.message.clone(),
                code: trap.code,
            },
            None => HostTrap {
                message: "host function failed".to_string(),
                code: None,
            },
        }
    }
}

/// The fault outcome of a function call.
pub struct Trap {
    message: String,
    code: Option<TrapCode>,
    host_info: crate::r#ref::HostInfo,
}

declare_ref!(Trap);

impl Trap {
    pub fn new(message: impl Into<String>) -> Trap {
        Trap {
            message: message.into(),
            code: None,
            host_info: Default::default(),
        }
    }

    pub fn make(_store: &Store, message: &str) -> Own<Trap> {
        Own::new(Trap::new(message))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The engine's reason for the trap, if it was raised by wasm code.
    pub fn code(&self) -> Option<TrapCode> {
        self.code
    }

    /// Converts an engine error into a trap.
    pub(crate) fn from_error(err: wasmtime::Error) -> Own<Trap> {
        if let Some(host) = err.downcast_ref::<HostTrap>() {
            return Own::new(Trap {
                message: host.message.clone(),
                code: host.code,
                host_info: Default::default(),
            });
        }
        let code = err
            .downcast_ref::<wasmtime::Trap>()
            .and_then(|trap| TrapCode::from_wasmtime(*trap));
        log::debug!("call failed: {err:?}");
        Own::new(Trap {
            message: err.root_cause().to_string(),
            code,
            host_info: Default::default(),
        })
    }

    /// Converts the payload of a panic that unwound out of a host callback
    /// into a trap carrying the panic message.
    pub(crate) fn from_panic(panic: Box<dyn Any + Send>) -> Own<Trap> {
        let msg = if let Some(msg) = panic.downcast_ref::<String>() {
            msg.clone()
        } else if let Some(msg) = panic.downcast_ref::<&'static str>() {
            msg.to_string()
        } else {
            "rust panic happened".to_string()
        };
        log::warn!("host callback panicked: {msg}");
        Own::new(Trap::new(msg))
    }
}

impl DeepCopy for Trap {
    fn copy(&self) -> Trap {
        Trap {
            message: self.message.clone(),
            code: self.code,
            host_info: Default::default(),
        }
    }
}

impl std::fmt::Debug for Trap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trap")
            .field("message", &self.message)
            .field("code", &self.code)
            .finish()
    }
}
