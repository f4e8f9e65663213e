// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler handles with identity semantics

use crate::error::HandlerResult;
use std::fmt;
use std::sync::Arc;

type HandlerFn<P> = dyn Fn(&P) -> HandlerResult + Send + Sync;

/// A shareable, invocable handler
///
/// Cloning a `Handler` yields the same handler: clones compare equal under
/// [`Handler::same`], and `EventBus::unsubscribe` removes every subscription
/// registered with any clone. Two handlers built from structurally identical
/// closures are still distinct.
pub struct Handler<P> {
    f: Arc<HandlerFn<P>>,
}

impl<P> Handler<P> {
    /// Wrap a fallible closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&P) -> HandlerResult + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Wrap a closure that cannot fail
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self::new(move |payload: &P| {
            f(payload);
            Ok(())
        })
    }

    /// Identity comparison
    pub fn same(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable pointers are not unique per type.
        std::ptr::eq(
            Arc::as_ptr(&self.f) as *const (),
            Arc::as_ptr(&other.f) as *const (),
        )
    }

    pub(crate) fn call(&self, payload: &P) -> HandlerResult {
        (self.f)(payload)
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&(Arc::as_ptr(&self.f) as *const ()))
            .finish()
    }
}
