//! Interval arithmetic over the extended reals.
//!
//! This module provides the numeric engine behind bound propagation:
//! - `Interval` with sound (outward rounded) arithmetic
//! - Elementary and periodic function bounds
//! - The tolerance policy shared by every comparison in the crate

pub mod bound;
pub mod functions;
pub mod round;

pub use bound::Interval;
pub use functions::{monotone, Direction, ElementaryFunction, INVERSE_PAIRS};
pub use round::{almost_eq, almost_gte, almost_lte, ABS_TOL, REL_TOL};
