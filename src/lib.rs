//! # cvxbound
//!
//! Sound interval bounds, convexity and monotonicity for expression trees.
//!
//! cvxbound walks an expression (an objective, a constraint, or any
//! subexpression of a model) bottom-up and records, for every node, an
//! interval guaranteed to contain its value, its curvature and its direction.
//! The results let a caller decide whether a nonlinear problem is convex
//! without solving it.
//!
//! ## Quick Start
//!
//! ```
//! use cvxbound::prelude::*;
//!
//! let x = bounded_variable(0.0, 1.0);
//! let e = cos(&x);
//!
//! let ctx = analyze(&e)?;
//! assert_eq!(ctx.convexity(&e)?, Convexity::Concave);
//! assert_eq!(ctx.monotonicity(&e)?, Monotonicity::Nonincreasing);
//! assert!(ctx.bound(&e)?.is_positive());
//! # Ok::<(), cvxbound::CvxError>(())
//! ```
//!
//! ## Propagation Rules
//!
//! Each node kind has three rules, run in this order once all children are
//! resolved:
//!
//! - **Bound**: interval arithmetic with outward rounding
//! - **Monotonicity**: sign of the first derivative over the child bounds
//! - **Convexity**: composition rules on the sign of the second derivative
//!
//! A combination no rule covers is reported as `Unknown`. A node kind with no
//! registered rules is an error.
//!
//! ## Architecture
//!
//! - **Expression trees** built from `Expr` nodes with `Arc` sharing
//! - **Intervals** with ULP-based outward rounding and tolerance comparisons
//! - **Rule table** mapping node kind to bound/monotonicity/convexity rules
//! - **Analyzer** running an iterative post-order traversal into a `Context`

pub mod analysis;
pub mod atoms;
pub mod constraints;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod expr;
pub mod interval;
pub mod properties;
pub mod rules;

/// Prelude module for convenient imports.
///
/// ```
/// use cvxbound::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        bounded_variable, constant, named_variable, nonneg_variable, nonpos_variable, variable,
        Expr, ExprId, ExprKind, NodeKind, Sense, UnaryFunction, VariableBuilder,
    };

    // Atoms
    pub use crate::atoms::{
        abs, acos, asin, atan, cos, division, exp, exp_base, linear, log, log10, monomial,
        negation, power, powf, product, quadratic, reciprocal, scale, sin, sqrt, sum, tan, unary,
    };

    // Constraints
    pub use crate::constraints::{constraint, maximize, minimize, objective, ConstraintExt};

    // Analysis
    pub use crate::analysis::{analyze, Analyzer, Settings};
    pub use crate::context::Context;
    pub use crate::dispatch::{RuleSet, RuleTable};
    pub use crate::interval::Interval;
    pub use crate::properties::{Convexity, Monotonicity};

    // Errors
    pub use crate::error::{CvxError, Result};
}

// Re-export main types at crate root
pub use analysis::{analyze, Analyzer, Settings};
pub use context::Context;
pub use error::{CvxError, Result};
pub use interval::Interval;
pub use properties::{Convexity, Monotonicity};
