//! Atom functions for building expressions.
//!
//! - **Linear atoms**: sums, linear combinations, negation, operators
//! - **Nonlinear atoms**: products, quotients, powers, quadratics, named functions

pub mod affine;
pub mod nonlinear;

// Re-export linear operations
pub use affine::{linear, negation, scale, sum};

// Re-export nonlinear atoms
pub use nonlinear::{
    abs, acos, asin, atan, cos, division, exp, exp_base, log, log10, monomial, power, powf,
    product, quadratic, reciprocal, sin, sqrt, tan, unary,
};
