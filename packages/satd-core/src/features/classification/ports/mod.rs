//! Debt predicate port (interface)
//!
//! Boundary to the technical-debt classifier. The resolver re-runs the
//! predicate per candidate during resolution, so implementations must
//! be pure, stateless, and cheap to call.

/// Debt predicate trait - decides whether a comment text admits debt
pub trait DebtPredicate: Send + Sync {
    fn is_debt(&self, text: &str) -> bool;
}
