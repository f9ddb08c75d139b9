//! Bucket invariants for the room list store.
//!
//! Each check looks at a [`ListsSnapshot`], the room ids per bucket plus the
//! readiness flag, and reports a [`Violation`] when the bucket layout breaks
//! a categorization rule. [`crate::SimDriver`] can run the registry on every
//! render; tests run it directly against a store.
//!
//! ```ignore
//! let snapshot = ListsSnapshot::from_store(&store);
//! InvariantRegistry::standard().check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    ExclusiveLists, NoDuplicateEntries, TagsTakePrecedence, UnreadyListsEmpty,
    WellKnownListsPresent,
};
pub use snapshot::ListsSnapshot;

/// Outcome of a single check.
pub type InvariantResult = Result<(), Violation>;

/// A broken bucket rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Check that failed.
    pub invariant: &'static str,
    /// Offending room and bucket.
    pub message: String,
}

/// A rule over the bucket layout.
pub trait Invariant: Send + Sync {
    /// Snake-case name used in violations.
    fn name(&self) -> &'static str;

    /// Check `state`, naming the first offending room on failure.
    fn check(&self, state: &ListsSnapshot) -> InvariantResult;
}

/// Ordered set of bucket checks.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bucket rule the store guarantees:
    ///
    /// - [`WellKnownListsPresent`]
    /// - [`UnreadyListsEmpty`]
    /// - [`ExclusiveLists`]
    /// - [`TagsTakePrecedence`]
    /// - [`NoDuplicateEntries`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(WellKnownListsPresent);
        registry.add(UnreadyListsEmpty);
        registry.add(ExclusiveLists);
        registry.add(TagsTakePrecedence);
        registry.add(NoDuplicateEntries);
        registry
    }

    /// Register a check. Checks run in registration order.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every check against `state`.
    ///
    /// Fails with one violation per failing check.
    pub fn check_all(&self, state: &ListsSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|check| check.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
