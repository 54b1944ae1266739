//! Unique ownership of heap-resident API objects.
//!
//! Every object handed out by this crate is owned through an [`Own`]. An
//! `Own` is the only owner of its object: moving it out with [`Own::take`]
//! leaves the source empty, and dropping it releases the object exactly once.
//! There is no implicit duplication; objects that can be duplicated
//! implement [`DeepCopy`] and are cloned explicitly through
//! [`Own::copy`].

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Explicit, polymorphic duplication of an API object.
///
/// Only the concrete object knows how to reproduce its own state, so every
/// object kind implements this itself. The result is always independently
/// owned and of the same concrete kind as `self`.
pub trait DeepCopy {
    /// Produces an independently owned duplicate of `self`.
    fn copy(&self) -> Self;
}

/// An exclusive owning handle, possibly empty.
///
/// The empty state is the "neutral" state a handle is left in after its
/// object has been moved out, and the failure sentinel returned by fallible
/// factories.
pub struct Own<T: ?Sized>(Option<Box<T>>);

impl<T> Own<T> {
    /// Moves `value` onto the heap and takes ownership of it.
    pub fn new(value: T) -> Own<T> {
        Own(Some(Box::new(value)))
    }

    /// Consumes the handle, returning the owned value if any.
    pub fn into_inner(self) -> Option<T> {
        self.0.map(|b| *b)
    }

    /// Moves the owned object into a more general kind of object, e.g. a
    /// `Func` into an `Extern`.
    pub fn upcast<U: From<T>>(self) -> Own<U> {
        Own(self.0.map(|b| Box::new(U::from(*b))))
    }
}

impl<T: ?Sized> Own<T> {
    /// An empty handle owning nothing.
    pub const fn empty() -> Own<T> {
        Own(None)
    }

    /// Takes immediate ownership of an already boxed object.
    pub fn from_box(value: Box<T>) -> Own<T> {
        Own(Some(value))
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Borrows the owned object, or `None` for an empty handle.
    pub fn as_deref(&self) -> Option<&T> {
        self.0.as_deref()
    }

    pub fn as_deref_mut(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut()
    }

    /// Relinquishes ownership without destroying the object, leaving this
    /// handle empty.
    pub fn release(&mut self) -> Option<Box<T>> {
        self.0.take()
    }

    /// Transfers ownership into a new handle, leaving this one empty.
    pub fn take(&mut self) -> Own<T> {
        Own(self.0.take())
    }

    /// Replaces the owned object with the one owned by `other`. The previous
    /// occupant is destroyed first.
    pub fn reset(&mut self, mut other: Own<T>) {
        self.0 = None;
        self.0 = other.0.take();
    }
}

impl<T: DeepCopy> Own<T> {
    /// Deep-copies the owned object into a new handle. Copying an empty
    /// handle yields an empty handle.
    pub fn copy(&self) -> Own<T> {
        Own(self.0.as_ref().map(|b| Box::new(b.copy())))
    }
}

impl<T: ?Sized> Default for Own<T> {
    fn default() -> Own<T> {
        Own::empty()
    }
}

impl<T> From<T> for Own<T> {
    fn from(value: T) -> Own<T> {
        Own::new(value)
    }
}

impl<T: ?Sized> From<Box<T>> for Own<T> {
    fn from(value: Box<T>) -> Own<T> {
        Own::from_box(value)
    }
}

impl<T: ?Sized> From<Option<Box<T>>> for Own<T> {
    fn from(value: Option<Box<T>>) -> Own<T> {
        Own(value)
    }
}

impl<T: ?Sized> Deref for Own<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.0 {
            Some(b) => b,
            None => panic!("dereferenced an empty `Own` handle"),
        }
    }
}

impl<T: ?Sized> DerefMut for Own<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.0 {
            Some(b) => b,
            None => panic!("dereferenced an empty `Own` handle"),
        }
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Own<T> {
    fn eq(&self, other: &Own<T>) -> bool {
        self.as_deref() == other.as_deref()
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Own<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(b) => f.debug_tuple("Own").field(&b).finish(),
            None => f.write_str("Own(<empty>)"),
        }
    }
}
