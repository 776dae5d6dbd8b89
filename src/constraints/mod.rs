//! Constraints and objectives.

pub mod constraint;

pub use constraint::{constraint, maximize, minimize, objective, ConstraintExt};
