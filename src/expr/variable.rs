//! Variable creation with builder pattern.

use super::expression::{Expr, ExprKind, VariableData};

/// Builder for creating variables with various attributes.
#[derive(Default)]
pub struct VariableBuilder {
    data: VariableData,
}

impl VariableBuilder {
    /// Create a new, unbounded variable builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the variable.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.data.name = Some(name.into());
        self
    }

    /// Set the lower bound.
    pub fn lower(mut self, lower: f64) -> Self {
        self.data.lower = Some(lower);
        self
    }

    /// Set the upper bound.
    pub fn upper(mut self, upper: f64) -> Self {
        self.data.upper = Some(upper);
        self
    }

    /// Set both bounds.
    pub fn bounds(self, lower: f64, upper: f64) -> Self {
        self.lower(lower).upper(upper)
    }

    /// Constrain the variable to be non-negative (x >= 0).
    pub fn nonneg(mut self) -> Self {
        self.data.lower = Some(self.data.lower.map_or(0.0, |l| l.max(0.0)));
        self
    }

    /// Constrain the variable to be non-positive (x <= 0).
    pub fn nonpos(mut self) -> Self {
        self.data.upper = Some(self.data.upper.map_or(0.0, |u| u.min(0.0)));
        self
    }

    /// Set the current value.
    pub fn value(mut self, value: f64) -> Self {
        self.data.value = Some(value);
        self
    }

    /// Build the variable expression.
    pub fn build(self) -> Expr {
        Expr::new(ExprKind::Variable(self.data))
    }
}

/// Create an unbounded variable.
///
/// # Examples
///
/// ```
/// use cvxbound::expr::variable;
///
/// let x = variable();
/// assert!(x.is_variable());
/// ```
pub fn variable() -> Expr {
    VariableBuilder::new().build()
}

/// Create a named, unbounded variable.
pub fn named_variable(name: impl Into<String>) -> Expr {
    VariableBuilder::new().name(name).build()
}

/// Create a variable with bounds `[lower, upper]`.
pub fn bounded_variable(lower: f64, upper: f64) -> Expr {
    VariableBuilder::new().bounds(lower, upper).build()
}

/// Create a non-negative variable.
pub fn nonneg_variable() -> Expr {
    VariableBuilder::new().nonneg().build()
}

/// Create a non-positive variable.
pub fn nonpos_variable() -> Expr {
    VariableBuilder::new().nonpos().build()
}
