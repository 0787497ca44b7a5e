//! # Deferred References
//!
//! A deferred reference stands in for a descriptor that cannot be built
//! eagerly, typically because it refers back to the type being defined.
//! Construction stores either a zero-argument resolver (evaluated once, on
//! first visit, and memoized) or a weak back-reference created by
//! [`Schema::recursive`](crate::Schema::recursive).
//!
//! ## Invariant
//!
//! Creating a deferred reference never evaluates it. Cycles in a descriptor
//! graph exist only through this type, so building a descriptor always
//! terminates.

use std::fmt;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::schema::Schema;

type Resolver = dyn Fn() -> Schema + Send + Sync;

/// A lazily resolved descriptor.
#[derive(Clone)]
pub struct Deferred {
    target: Target,
}

#[derive(Clone)]
enum Target {
    /// Resolver closure, evaluated at most once.
    Thunk {
        resolve: Arc<Resolver>,
        cell: Arc<OnceCell<Schema>>,
    },
    /// Root handle of a recursive definition; keeps the definition alive.
    Owned(Arc<OnceCell<Schema>>),
    /// Self-reference inside a recursive definition.
    Back(Weak<OnceCell<Schema>>),
}

impl Deferred {
    pub(crate) fn from_fn<F>(resolve: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self {
            target: Target::Thunk {
                resolve: Arc::new(resolve),
                cell: Arc::new(OnceCell::new()),
            },
        }
    }

    pub(crate) fn owned(cell: Arc<OnceCell<Schema>>) -> Self {
        Self {
            target: Target::Owned(cell),
        }
    }

    pub(crate) fn back(cell: &Arc<OnceCell<Schema>>) -> Self {
        Self {
            target: Target::Back(Arc::downgrade(cell)),
        }
    }

    /// Resolve the reference, running the resolver on first use.
    ///
    /// Returns `None` when a back-reference outlived the recursive
    /// definition it points into, or when called on a self-reference while
    /// its definition is still being built.
    ///
    /// A resolver must not resolve its own reference; doing so blocks.
    pub fn get(&self) -> Option<Schema> {
        match &self.target {
            Target::Thunk { resolve, cell } => Some(cell.get_or_init(|| resolve()).clone()),
            Target::Owned(cell) => cell.get().cloned(),
            Target::Back(weak) => weak.upgrade().and_then(|cell| cell.get().cloned()),
        }
    }

    /// The resolved descriptor if it is already available, without running
    /// a pending resolver.
    pub fn peek(&self) -> Option<Schema> {
        match &self.target {
            Target::Thunk { cell, .. } | Target::Owned(cell) => cell.get().cloned(),
            Target::Back(weak) => weak.upgrade().and_then(|cell| cell.get().cloned()),
        }
    }

    /// Returns true once the descriptor has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.peek().is_some()
    }

    /// Returns true if both references resolve through the same cell.
    ///
    /// The root handle of a recursive definition and the self-references
    /// inside it share one cell.
    pub fn same_target(&self, other: &Deferred) -> bool {
        std::ptr::eq(self.cell_ptr(), other.cell_ptr())
    }

    fn cell_ptr(&self) -> *const OnceCell<Schema> {
        match &self.target {
            Target::Thunk { cell, .. } | Target::Owned(cell) => Arc::as_ptr(cell),
            Target::Back(weak) => weak.as_ptr(),
        }
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.target {
            Target::Thunk { .. } => "thunk",
            Target::Owned(_) => "owned",
            Target::Back(_) => "back",
        };
        f.debug_struct("Deferred")
            .field("kind", &kind)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl fmt::Display for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(Schema::Object(object)) => f.write_str(object.name()),
            _ => f.write_str("<deferred>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_thunk_runs_once_on_first_get() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let deferred = Deferred::from_fn(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Schema::Number
        });
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert!(!deferred.is_resolved());

        assert!(matches!(deferred.get(), Some(Schema::Number)));
        assert!(matches!(deferred.get(), Some(Schema::Number)));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(deferred.is_resolved());
    }

    #[test]
    fn test_clones_share_the_resolution() {
        let deferred = Deferred::from_fn(|| Schema::String);
        let copy = deferred.clone();
        deferred.get();
        assert!(copy.is_resolved());
    }

    #[test]
    fn test_back_reference_dangles_after_owner_dropped() {
        let cell = Arc::new(OnceCell::new());
        let back = Deferred::back(&cell);
        assert!(back.get().is_none());
        cell.set(Schema::Boolean).unwrap();
        assert!(matches!(back.get(), Some(Schema::Boolean)));
        drop(cell);
        assert!(back.get().is_none());
    }

    #[test]
    fn test_display_does_not_force_resolution() {
        let deferred = Deferred::from_fn(|| Schema::Number);
        assert_eq!(deferred.to_string(), "<deferred>");
        assert!(!deferred.is_resolved());
    }
}
