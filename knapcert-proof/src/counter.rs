//! Constraint id allocation.

use crate::constraint::ConstraintId;

/// Monotonic allocator for constraint ids.
///
/// The counter only ever moves forward; callers reserve the ids a statement
/// introduces and never hand them back.
#[derive(Debug, Clone)]
pub struct ConstraintCounter {
    last: u64,
}

impl ConstraintCounter {
    /// Create a counter whose first `issued` ids are already taken, typically
    /// by the constraints of the input instance.
    #[must_use]
    pub fn new(issued: u64) -> Self {
        Self { last: issued }
    }

    /// Reserve `n` fresh ids and return the first one.
    ///
    /// Reserving zero ids returns the id that the next reservation would start at.
    pub fn reserve(&mut self, n: u64) -> ConstraintId {
        let first = self.last + 1;
        self.last += n;
        ConstraintId::new(first)
    }

    /// The most recently issued id (0 if nothing was ever issued).
    #[must_use]
    pub fn last(&self) -> ConstraintId {
        ConstraintId::new(self.last)
    }

    /// The id the next reservation will start at.
    #[must_use]
    pub fn peek(&self) -> ConstraintId {
        ConstraintId::new(self.last + 1)
    }
}
