//! Fixed-length sequences of API values and owned API objects.
//!
//! A [`WasmVec`] never changes length once created; only its slots can be
//! replaced. The element type decides how slots are constructed, copied and
//! accessed through the [`Element`] trait: plain values are copied by value
//! and accessed by `&mut`, while [`Own`] elements are deep-copied and accessed
//! through a [`Slot`] which keeps every ownership transfer explicit.

use crate::own::{DeepCopy, Own};
use crate::{ValType, val::Val};
use std::fmt;
use std::ops::Index;

/// Element types a [`WasmVec`] can hold.
///
/// `Default` provides the value a fresh slot starts out with (zero for
/// numbers, an empty handle for [`Own`]), and moving an element out of a
/// slot leaves this value behind.
pub trait Element: Default {
    /// The accessor handed out by [`WasmVec::slot`].
    type Slot<'a>
    where
        Self: 'a;

    /// Produces an independent copy of this element.
    fn copy_element(&self) -> Self;

    fn slot(elem: &mut Self) -> Self::Slot<'_>;
}

macro_rules! value_elements {
    ($($ty:ty)*) => ($(
        impl Element for $ty {
            type Slot<'a> = &'a mut $ty;

            fn copy_element(&self) -> Self {
                *self
            }

            fn slot(elem: &mut Self) -> &mut Self {
                elem
            }
        }
    )*)
}

value_elements! { u8 u32 i32 i64 f32 f64 ValType }

impl Element for Val {
    type Slot<'a> = &'a mut Val;

    fn copy_element(&self) -> Val {
        self.copy()
    }

    fn slot(elem: &mut Val) -> &mut Val {
        elem
    }
}

impl<T: DeepCopy> Element for Own<T> {
    type Slot<'a>
        = Slot<'a, T>
    where
        T: 'a;

    fn copy_element(&self) -> Own<T> {
        self.copy()
    }

    fn slot(elem: &mut Own<T>) -> Slot<'_, T> {
        Slot { elem }
    }
}

/// Indexed access to one owning slot of a `WasmVec<Own<T>>`.
pub struct Slot<'a, T> {
    elem: &'a mut Own<T>,
}

impl<'a, T> Slot<'a, T> {
    /// Borrows the occupant without taking ownership.
    pub fn get(&self) -> Option<&T> {
        self.elem.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.elem.as_deref_mut()
    }

    pub fn is_null(&self) -> bool {
        self.elem.is_empty()
    }

    /// Stores `value` in the slot, destroying the previous occupant.
    pub fn set(&mut self, value: Own<T>) {
        self.elem.reset(value);
    }

    /// Detaches the occupant without destroying it, leaving the slot null.
    pub fn release(&mut self) -> Option<Box<T>> {
        self.elem.release()
    }

    /// Moves the occupant out into a new owning handle.
    pub fn take(self) -> Own<T> {
        self.elem.take()
    }
}

/// Length reserved to mark an invalid sequence.
const INVALID_SIZE: usize = usize::MAX;

/// A fixed-length sequence of `T`, or the distinguished *invalid* sequence.
///
/// A valid sequence has a buffer exactly when its length is non-zero. The
/// invalid sequence has length [`usize::MAX`] and no buffer, and is what
/// fallible operations return in place of an error.
pub struct WasmVec<T: Element> {
    size: usize,
    data: Option<Box<[T]>>,
}

impl<T: Element> WasmVec<T> {
    /// Allocates `size` slots holding `T::default()`, or returns the invalid
    /// sequence if the allocation cannot be satisfied.
    fn allocate(size: usize) -> WasmVec<T> {
        if size == 0 {
            return WasmVec::default();
        }
        if size == INVALID_SIZE {
            return WasmVec::invalid();
        }
        let mut buf = Vec::new();
        if buf.try_reserve_exact(size).is_err() {
            log::debug!("failed to allocate a sequence of {size} elements");
            return WasmVec::invalid();
        }
        buf.resize_with(size, T::default);
        WasmVec {
            size,
            data: Some(buf.into_boxed_slice()),
        }
    }

    /// Creates `size` default-initialized elements (null handles for owning
    /// sequences).
    pub fn make_uninitialized(size: usize) -> WasmVec<T> {
        WasmVec::allocate(size)
    }

    /// Adopts the elements of `init`, moving each one out and leaving the
    /// source slots in their default state.
    pub fn make_from(init: &mut [T]) -> WasmVec<T> {
        let mut v = WasmVec::allocate(init.len());
        if let Some(data) = v.data.as_deref_mut() {
            for (dst, src) in data.iter_mut().zip(init.iter_mut()) {
                *dst = std::mem::take(src);
            }
        }
        v
    }

    /// Wraps each item into an element and adopts the result.
    pub fn make<I>(items: I) -> WasmVec<T>
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        let mut init = items.into_iter().map(Into::into).collect::<Vec<T>>();
        WasmVec::make_from(&mut init)
    }

    /// Takes ownership of an already populated buffer as-is.
    pub fn adopt(data: Box<[T]>) -> WasmVec<T> {
        if data.is_empty() {
            WasmVec::default()
        } else {
            WasmVec {
                size: data.len(),
                data: Some(data),
            }
        }
    }

    /// The invalid sequence.
    pub fn invalid() -> WasmVec<T> {
        WasmVec {
            size: INVALID_SIZE,
            data: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.size != INVALID_SIZE
    }

    /// The logical length; [`usize::MAX`] for the invalid sequence.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of elements actually held, which is zero for the invalid
    /// sequence.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Accesses slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn slot(&mut self, index: usize) -> T::Slot<'_> {
        let len = self.len();
        match self.data.as_deref_mut() {
            Some(data) if index < len => T::slot(&mut data[index]),
            _ => panic!("slot index {index} out of bounds for a sequence of length {len}"),
        }
    }

    /// Moves the whole sequence out, leaving this one empty.
    pub fn take(&mut self) -> WasmVec<T> {
        std::mem::take(self)
    }

    /// Replaces this sequence with the contents of `other`, which is left
    /// empty. Elements previously held here are destroyed.
    pub fn reset(&mut self, other: &mut WasmVec<T>) {
        *self = other.take();
    }

    /// Relinquishes the buffer, leaving this sequence empty.
    pub fn release(&mut self) -> Box<[T]> {
        let data = self.data.take();
        self.size = 0;
        data.unwrap_or_default()
    }

    /// Produces a sequence whose elements are independent copies of this
    /// one's. Copying the invalid sequence yields the invalid sequence.
    pub fn copy(&self) -> WasmVec<T> {
        if !self.is_valid() {
            return WasmVec::invalid();
        }
        let mut v = WasmVec::allocate(self.size);
        if let Some(data) = v.data.as_deref_mut() {
            for (dst, src) in data.iter_mut().zip(self.iter()) {
                *dst = src.copy_element();
            }
        }
        v
    }
}

impl WasmVec<u8> {
    pub fn from_bytes(bytes: &[u8]) -> WasmVec<u8> {
        WasmVec::adopt(bytes.into())
    }

    /// Views the bytes as UTF-8, if they are.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_slice()).ok()
    }
}

impl From<&str> for WasmVec<u8> {
    fn from(s: &str) -> WasmVec<u8> {
        WasmVec::from_bytes(s.as_bytes())
    }
}

impl From<String> for WasmVec<u8> {
    fn from(s: String) -> WasmVec<u8> {
        WasmVec::from(s.into_bytes())
    }
}

impl<T: Element> DeepCopy for WasmVec<T> {
    fn copy(&self) -> WasmVec<T> {
        WasmVec::copy(self)
    }
}

impl<T: Element> Default for WasmVec<T> {
    fn default() -> WasmVec<T> {
        WasmVec {
            size: 0,
            data: None,
        }
    }
}

impl<T: Element> From<Vec<T>> for WasmVec<T> {
    fn from(v: Vec<T>) -> WasmVec<T> {
        WasmVec::adopt(v.into_boxed_slice())
    }
}

impl<T: Element> FromIterator<T> for WasmVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> WasmVec<T> {
        WasmVec::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<'a, T: Element> IntoIterator for &'a WasmVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> IntoIterator for WasmVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.release().into_vec().into_iter()
    }
}

impl<T: Element> Index<usize> for WasmVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Element + PartialEq> PartialEq for WasmVec<T> {
    fn eq(&self, other: &WasmVec<T>) -> bool {
        self.size == other.size && self.as_slice() == other.as_slice()
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for WasmVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.debug_list().entries(self.iter()).finish()
        } else {
            f.write_str("<invalid>")
        }
    }
}

/// Builds a [`WasmVec`] from a list of items, converting each into the
/// element type.
///
/// ```ignore
/// let params: WasmVec<Val> = wasm_vec![1i32, 2i64];
/// ```
#[macro_export]
macro_rules! wasm_vec {
    () => ($crate::WasmVec::default());
    ($($x:expr),+ $(,)?) => (
        $crate::WasmVec::from_iter([$(::core::convert::Into::into($x)),+])
    );
}
