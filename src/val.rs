use crate::store::StoreRef;
use crate::{DeepCopy, Func, Own, Ref, ValKind};
use wasmtime::{AsContext, AsContextMut};

/// A value: one of the four number kinds, or an owned (possibly null)
/// reference.
///
/// Moving a reference out of a `Val` with [`Val::take`] or
/// [`Val::release_ref`] leaves a null reference behind, never an alias.
#[derive(Debug)]
pub enum Val {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Ref(Own<Ref>),
}

impl Val {
    /// A null reference.
    pub fn null() -> Val {
        Val::Ref(Own::empty())
    }

    pub fn kind(&self) -> ValKind {
        match self {
            Val::I32(_) => ValKind::I32,
            Val::I64(_) => ValKind::I64,
            Val::F32(_) => ValKind::F32,
            Val::F64(_) => ValKind::F64,
            Val::Ref(_) => ValKind::AnyRef,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Ref(r) if r.is_empty())
    }

    /// # Panics
    ///
    /// Panics if this is not an `i32`.
    pub fn i32(&self) -> i32 {
        match self {
            Val::I32(i) => *i,
            _ => self.mismatch("i32"),
        }
    }

    /// # Panics
    ///
    /// Panics if this is not an `i64`.
    pub fn i64(&self) -> i64 {
        match self {
            Val::I64(i) => *i,
            _ => self.mismatch("i64"),
        }
    }

    /// # Panics
    ///
    /// Panics if this is not an `f32`.
    pub fn f32(&self) -> f32 {
        match self {
            Val::F32(f) => *f,
            _ => self.mismatch("f32"),
        }
    }

    /// # Panics
    ///
    /// Panics if this is not an `f64`.
    pub fn f64(&self) -> f64 {
        match self {
            Val::F64(f) => *f,
            _ => self.mismatch("f64"),
        }
    }

    /// Borrows the referenced object, `None` for a null reference.
    ///
    /// # Panics
    ///
    /// Panics if this is not a reference.
    pub fn ref_(&self) -> Option<&Ref> {
        match self {
            Val::Ref(r) => r.as_deref(),
            _ => self.mismatch("ref"),
        }
    }

    /// Moves the referenced object out, leaving a null reference.
    ///
    /// # Panics
    ///
    /// Panics if this is not a reference.
    pub fn release_ref(&mut self) -> Own<Ref> {
        match self {
            Val::Ref(r) => r.take(),
            _ => self.mismatch("ref"),
        }
    }

    /// Moves the value out, leaving a null reference.
    pub fn take(&mut self) -> Val {
        std::mem::take(self)
    }

    /// Destroys the value, leaving a null reference.
    pub fn reset(&mut self) {
        *self = Val::null();
    }

    /// Copies the value; a referenced object is deep-copied.
    pub fn copy(&self) -> Val {
        match self {
            Val::I32(i) => Val::I32(*i),
            Val::I64(i) => Val::I64(*i),
            Val::F32(f) => Val::F32(*f),
            Val::F64(f) => Val::F64(*f),
            Val::Ref(r) => Val::Ref(r.copy()),
        }
    }

    fn mismatch(&self, accessor: &str) -> ! {
        panic!("`Val::{accessor}` called on a value of kind {:?}", self.kind())
    }

    /// Converts to an engine value of the `expected` kind, or `None` if this
    /// value cannot be passed to `store` as one.
    pub(crate) fn to_wasmtime(
        &self,
        expected: ValKind,
        store: &StoreRef,
        cx: impl AsContextMut,
    ) -> Option<wasmtime::Val> {
        match (self, expected) {
            (Val::I32(i), ValKind::I32) => Some(wasmtime::Val::I32(*i)),
            (Val::I64(i), ValKind::I64) => Some(wasmtime::Val::I64(*i)),
            (Val::F32(f), ValKind::F32) => Some(wasmtime::Val::F32(f.to_bits())),
            (Val::F64(f), ValKind::F64) => Some(wasmtime::Val::F64(f.to_bits())),
            (Val::Ref(r), ValKind::AnyRef | ValKind::FuncRef) => {
                Ref::to_wasmtime(r.as_deref(), expected, store, cx).map(Into::into)
            }
            _ => None,
        }
    }

    pub(crate) fn from_wasmtime(val: &wasmtime::Val, store: &StoreRef, cx: impl AsContext) -> Val {
        match val {
            wasmtime::Val::I32(i) => Val::I32(*i),
            wasmtime::Val::I64(i) => Val::I64(*i),
            wasmtime::Val::F32(bits) => Val::F32(f32::from_bits(*bits)),
            wasmtime::Val::F64(bits) => Val::F64(f64::from_bits(*bits)),
            wasmtime::Val::FuncRef(Some(f)) => {
                Val::Ref(Own::new(Func::from_wasmtime(*f, store.clone()).into()))
            }
            wasmtime::Val::ExternRef(Some(r)) => {
                Val::Ref(Ref::from_wasmtime(&wasmtime::Ref::Extern(Some(*r)), store, cx))
            }
            wasmtime::Val::V128(_) => {
                unreachable!("SIMD is disabled for every engine created by this crate")
            }
            _ => Val::null(),
        }
    }
}

impl Default for Val {
    fn default() -> Val {
        Val::null()
    }
}

impl DeepCopy for Val {
    fn copy(&self) -> Val {
        Val::copy(self)
    }
}

impl From<i32> for Val {
    fn from(i: i32) -> Val {
        Val::I32(i)
    }
}

impl From<i64> for Val {
    fn from(i: i64) -> Val {
        Val::I64(i)
    }
}

impl From<f32> for Val {
    fn from(f: f32) -> Val {
        Val::F32(f)
    }
}

impl From<f64> for Val {
    fn from(f: f64) -> Val {
        Val::F64(f)
    }
}

impl<T> From<Own<T>> for Val
where
    Ref: From<T>,
{
    fn from(r: Own<T>) -> Val {
        Val::Ref(r.upcast())
    }
}
