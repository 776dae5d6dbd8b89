//! Linear atoms and operator overloading.
//!
//! Linear atoms are both convex and concave. They include:
//! - Addition, subtraction, negation
//! - Sums and linear combinations with a constant term
//! - Scaling by a number (a monomial term when applied to a variable)

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::expr::{constant, Expr, ExprKind};

// ============================================================================
// Operator overloading for Expr
// ============================================================================

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        negation(&self)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        negation(self)
    }
}

/// Implement a binary operator for every owned/borrowed combination of `Expr`.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $build:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $build(&self, &rhs)
            }
        }

        impl $trait for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $build(self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $build(&self, rhs)
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $build(self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, |a: &Expr, b: &Expr| sum(&[a.clone(), b.clone()]));
impl_binary_op!(Sub, sub, |a: &Expr, b: &Expr| sum(&[a.clone(), negation(b)]));
impl_binary_op!(Mul, mul, crate::atoms::product);
impl_binary_op!(Div, div, crate::atoms::division);

// Scalar multiplication
impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        scale(self, &rhs)
    }
}

impl Mul<&Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: &Expr) -> Expr {
        scale(self, rhs)
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        scale(rhs, &self)
    }
}

impl Mul<f64> for &Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        scale(rhs, self)
    }
}

// Scalar addition
impl Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        sum(&[self, constant(rhs)])
    }
}

impl Add<f64> for &Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        sum(&[self.clone(), constant(rhs)])
    }
}

// Division by scalar
impl Div<f64> for Expr {
    type Output = Expr;

    fn div(self, rhs: f64) -> Expr {
        crate::atoms::division(&self, &constant(rhs))
    }
}

impl Div<f64> for &Expr {
    type Output = Expr;

    fn div(self, rhs: f64) -> Expr {
        crate::atoms::division(self, &constant(rhs))
    }
}

// ============================================================================
// Linear atom functions
// ============================================================================

/// Sum of expressions.
pub fn sum(exprs: &[Expr]) -> Expr {
    Expr::new(ExprKind::Sum(exprs.iter().cloned().map(Arc::new).collect()))
}

/// Linear combination `constant + sum(coefficients[i] * exprs[i])`.
///
/// # Errors
///
/// Returns an error if the number of coefficients and expressions differ.
pub fn linear(coefficients: &[f64], exprs: &[Expr], constant_term: f64) -> crate::Result<Expr> {
    if coefficients.len() != exprs.len() {
        return Err(crate::CvxError::InvalidExpression(format!(
            "linear expression has {} coefficients but {} terms",
            coefficients.len(),
            exprs.len()
        )));
    }
    Ok(Expr::new(ExprKind::Linear {
        coefficients: coefficients.to_vec(),
        children: exprs.iter().cloned().map(Arc::new).collect(),
        constant: constant_term,
    }))
}

/// Negation: -x.
pub fn negation(x: &Expr) -> Expr {
    Expr::new(ExprKind::Negation(Arc::new(x.clone())))
}

/// Scale by a number: a monomial term for variables, a product otherwise.
pub fn scale(coefficient: f64, x: &Expr) -> Expr {
    if x.is_variable() {
        crate::atoms::monomial(coefficient, x)
    } else {
        crate::atoms::product(&constant(coefficient), x)
    }
}
