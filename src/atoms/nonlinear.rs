//! Nonlinear atoms.
//!
//! The curvature and monotonicity of these atoms depend on the sign and
//! curvature of their arguments, so the composition rules in
//! [`rules`](crate::rules) decide what can be proven about them.

use std::sync::Arc;

use crate::expr::{constant, Expr, ExprKind, QuadraticTerm, UnaryFunction};

// ============================================================================
// Products and quotients
// ============================================================================

/// Product: a * b.
pub fn product(a: &Expr, b: &Expr) -> Expr {
    Expr::new(ExprKind::Product(Arc::new(a.clone()), Arc::new(b.clone())))
}

/// Monomial term: coefficient * x.
pub fn monomial(coefficient: f64, x: &Expr) -> Expr {
    Expr::new(ExprKind::Monomial(
        Arc::new(constant(coefficient)),
        Arc::new(x.clone()),
    ))
}

/// Division: a / b.
pub fn division(a: &Expr, b: &Expr) -> Expr {
    Expr::new(ExprKind::Division(Arc::new(a.clone()), Arc::new(b.clone())))
}

/// Reciprocal: 1 / x.
///
/// Properties:
/// - Convex and decreasing where x > 0
/// - Concave and decreasing where x < 0
pub fn reciprocal(x: &Expr) -> Expr {
    Expr::new(ExprKind::Reciprocal(Arc::new(x.clone())))
}

// ============================================================================
// Powers
// ============================================================================

/// Power: base ^ exponent, where either side may be an expression.
pub fn power(base: &Expr, exponent: &Expr) -> Expr {
    Expr::new(ExprKind::Power(
        Arc::new(base.clone()),
        Arc::new(exponent.clone()),
    ))
}

/// Power with a numeric exponent: x^p.
///
/// - p even and positive: convex when x is linear
/// - p > 1: convex when x is convex and nonnegative
/// - p < 0: convex when x is concave and nonnegative
/// - 0 < p < 1: concave when x is concave and nonnegative
pub fn powf(x: &Expr, p: f64) -> Expr {
    power(x, &constant(p))
}

/// Exponential with a numeric base: base^x.
pub fn exp_base(base: f64, x: &Expr) -> Expr {
    power(&constant(base), x)
}

/// Absolute value: |x|.
pub fn abs(x: &Expr) -> Expr {
    Expr::new(ExprKind::Abs(Arc::new(x.clone())))
}

/// Quadratic expression: sum of coefficient * var1 * var2.
///
/// A repeated variable in a term (`(c, x, x)`) is a square.
pub fn quadratic(terms: &[(f64, &Expr, &Expr)]) -> Expr {
    Expr::new(ExprKind::Quadratic(
        terms
            .iter()
            .map(|&(coefficient, a, b)| QuadraticTerm {
                var1: Arc::new(a.clone()),
                var2: Arc::new(b.clone()),
                coefficient,
            })
            .collect(),
    ))
}

// ============================================================================
// Named unary functions
// ============================================================================

/// Apply a named unary function.
pub fn unary(func: UnaryFunction, x: &Expr) -> Expr {
    Expr::new(ExprKind::UnaryFunction(func, Arc::new(x.clone())))
}

/// Square root: concave and increasing.
pub fn sqrt(x: &Expr) -> Expr {
    unary(UnaryFunction::Sqrt, x)
}

/// Exponential: convex and increasing.
pub fn exp(x: &Expr) -> Expr {
    unary(UnaryFunction::Exp, x)
}

/// Natural logarithm: concave and increasing.
pub fn log(x: &Expr) -> Expr {
    unary(UnaryFunction::Log, x)
}

/// Base-10 logarithm: concave and increasing.
pub fn log10(x: &Expr) -> Expr {
    unary(UnaryFunction::Log10, x)
}

/// Sine.
pub fn sin(x: &Expr) -> Expr {
    unary(UnaryFunction::Sin, x)
}

/// Cosine.
pub fn cos(x: &Expr) -> Expr {
    unary(UnaryFunction::Cos, x)
}

/// Tangent.
pub fn tan(x: &Expr) -> Expr {
    unary(UnaryFunction::Tan, x)
}

/// Arcsine: increasing on [-1, 1].
pub fn asin(x: &Expr) -> Expr {
    unary(UnaryFunction::Asin, x)
}

/// Arccosine: decreasing on [-1, 1].
pub fn acos(x: &Expr) -> Expr {
    unary(UnaryFunction::Acos, x)
}

/// Arctangent: increasing.
pub fn atan(x: &Expr) -> Expr {
    unary(UnaryFunction::Atan, x)
}
