//! An ownership-aware embedding API for WebAssembly, layered over Wasmtime.
//!
//! This crate mirrors the shape of the standard `wasm.hh` embedding API:
//! every runtime object is owned through an [`Own`] handle, sequences of
//! values and objects are [`WasmVec`]s with an explicit *invalid* state, and
//! failures are reported through sentinels (`bool`, empty handles, invalid
//! sequences) rather than through `Result`s. The only exception is
//! [`Func::call`], whose fault outcome is a [`Trap`].
//!
//! Validation, compilation, linking and execution are all performed by the
//! `wasmtime` crate. Objects are scoped to the [`Store`] they were created
//! in and are not thread-safe.

/// Implements the host-info accessors for a runtime object type holding a
/// `host_info: HostInfo` field.
macro_rules! declare_ref {
    ($name:ident) => {
        impl $name {
            /// The pointer most recently attached to this object, or null.
            pub fn get_host_info(&self) -> *mut ::std::ffi::c_void {
                self.host_info.get()
            }

            /// Attaches `info` to this object. The finalizer of the previous
            /// attachment, if any, runs before the new one is stored; the new
            /// finalizer runs when this object is dropped or the attachment
            /// is replaced again.
            pub fn set_host_info(
                &mut self,
                info: *mut ::std::ffi::c_void,
                finalizer: Option<fn(*mut ::std::ffi::c_void)>,
            ) {
                self.host_info.set(info, finalizer);
            }
        }
    };
}

mod config;
mod engine;
mod r#extern;
mod func;
mod global;
mod instance;
mod memory;
mod module;
mod own;
mod r#ref;
mod store;
mod table;
mod trap;
pub mod types;
mod val;
mod vec;

pub use crate::config::*;
pub use crate::engine::*;
pub use crate::func::*;
pub use crate::global::*;
pub use crate::instance::*;
pub use crate::memory::*;
pub use crate::module::*;
pub use crate::own::*;
pub use crate::r#extern::*;
pub use crate::r#ref::*;
pub use crate::store::*;
pub use crate::table::*;
pub use crate::trap::*;
pub use crate::types::{ValKind, ValType};
pub use crate::val::*;
pub use crate::vec::*;

/// Collapses an engine result into the sentinel discipline of this API,
/// logging the failure.
pub(crate) fn handle_result<T, U>(
    result: wasmtime::Result<T>,
    what: &str,
    ok: impl FnOnce(T) -> U,
) -> Option<U> {
    match result {
        Ok(value) => Some(ok(value)),
        Err(e) => {
            log::debug!("{what} failed: {e:#}");
            None
        }
    }
}
