//! Property lattices tracked for every expression.
//!
//! - Convexity (linear, convex, concave, unknown)
//! - Monotonicity (constant, nondecreasing, nonincreasing, unknown)

pub mod convexity;
pub mod monotonicity;

pub use convexity::Convexity;
pub use monotonicity::Monotonicity;
