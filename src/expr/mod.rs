//! Expression types and creation utilities.
//!
//! This module provides the expression trees the analysis walks over:
//! - `Expr` - an expression node with identity, kind tag and children
//! - `NodeKind` / `UnaryFunction` - the closed set of node kinds
//! - Variable creation via `variable()` and `VariableBuilder`
//! - Constant creation via `constant()`

pub mod constant;
pub mod expression;
pub mod variable;

// Re-export main types
pub use constant::constant;
pub use expression::{
    ConstraintData, Expr, ExprId, ExprKind, NodeKind, ObjectiveData, QuadraticTerm, Sense,
    UnaryFunction, VariableData,
};
pub use variable::{
    bounded_variable, named_variable, nonneg_variable, nonpos_variable, variable,
    VariableBuilder,
};
