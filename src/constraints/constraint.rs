//! Constraint and objective root nodes.
//!
//! A constraint `lower <= body <= upper` and an objective over `body` are
//! expression nodes with a single child, so they take part in the same
//! bottom-up analysis as every other node.

use std::sync::Arc;

use crate::expr::{ConstraintData, Expr, ExprKind, ObjectiveData, Sense};

/// Create a constraint `lower <= body <= upper`; a missing side is unbounded.
pub fn constraint(body: &Expr, lower: Option<f64>, upper: Option<f64>) -> Expr {
    Expr::new(ExprKind::Constraint(ConstraintData {
        body: Arc::new(body.clone()),
        lower,
        upper,
    }))
}

/// Create an objective.
pub fn objective(body: &Expr, sense: Sense) -> Expr {
    Expr::new(ExprKind::Objective(ObjectiveData {
        body: Arc::new(body.clone()),
        sense,
    }))
}

/// Create a minimization objective.
pub fn minimize(body: &Expr) -> Expr {
    objective(body, Sense::Minimize)
}

/// Create a maximization objective.
pub fn maximize(body: &Expr) -> Expr {
    objective(body, Sense::Maximize)
}

/// Extension trait for creating constraints from expressions.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(&self, rhs: f64) -> Expr;

    /// Create inequality constraint: self <= rhs.
    fn leq(&self, rhs: f64) -> Expr;

    /// Create inequality constraint: self >= rhs.
    fn geq(&self, rhs: f64) -> Expr;

    /// Create range constraint: lower <= self <= upper.
    fn between(&self, lower: f64, upper: f64) -> Expr;
}

impl ConstraintExt for Expr {
    fn equals(&self, rhs: f64) -> Expr {
        constraint(self, Some(rhs), Some(rhs))
    }

    fn leq(&self, rhs: f64) -> Expr {
        constraint(self, None, Some(rhs))
    }

    fn geq(&self, rhs: f64) -> Expr {
        constraint(self, Some(rhs), None)
    }

    fn between(&self, lower: f64, upper: f64) -> Expr {
        constraint(self, Some(lower), Some(upper))
    }
}
