//! Heap wrapper for shared, copy-on-write container storage.
//!
//! `Heap<T>` wraps `Rc<T>`. Its constructor is `pub(super)`, so arrays,
//! objects and strings can only be allocated through `Value`'s factory
//! methods. Evaluation is single-threaded, hence `Rc` rather than `Arc`.
//!
//! Dropping the last handle to an array or object releases its members
//! through a work list instead of recursing, so a value nested a hundred
//! thousand levels deep is freed without exhausting the stack.

use super::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Storage that can hand its member values over for release.
pub trait Children {
    /// Move every member value into `out`, leaving `self` empty.
    fn take_children(&mut self, _out: &mut Vec<Value>) {}
}

impl Children for String {}

impl Children for Vec<Value> {
    fn take_children(&mut self, out: &mut Vec<Value>) {
        out.append(self);
    }
}

impl Children for Map {
    fn take_children(&mut self, out: &mut Vec<Value>) {
        out.extend(self.drain(..).map(|(_, v)| v));
    }
}

/// A shared heap allocation owned by a [`Value`](super::Value).
#[repr(transparent)]
pub struct Heap<T: ?Sized + Children>(Rc<T>);

impl<T: Children> Heap<T> {
    #[inline]
    pub(super) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }

    /// Mutable access, cloning the contents first if they are shared.
    #[inline]
    pub(crate) fn make_mut(&mut self) -> &mut T
    where
        T: Clone,
    {
        Rc::make_mut(&mut self.0)
    }

    /// Take the contents, cloning only if they are shared.
    #[inline]
    pub(crate) fn into_inner(mut self) -> T
    where
        T: Clone + Default,
    {
        std::mem::take(self.make_mut())
    }

    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized + Children> Heap<T> {
    /// Hand the members over when this is the last handle.
    fn release(&mut self, out: &mut Vec<Value>) {
        if let Some(contents) = Rc::get_mut(&mut self.0) {
            contents.take_children(out);
        }
    }
}

impl<T: ?Sized + Children> Drop for Heap<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.release(&mut pending);
        while let Some(value) = pending.pop() {
            match value {
                Value::Array(mut items) => items.release(&mut pending),
                Value::Object(mut map) => map.release(&mut pending),
                _ => {}
            }
        }
    }
}

impl<T: ?Sized + Children> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + Children> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized + Children + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized + Children> AsRef<T> for Heap<T> {
    #[inline]
    fn as_ref(&self) -> &T {
        &self.0
    }
}
