//! Convexity propagation rules.
//!
//! Composition rules for `h(g(x))` follow from the sign of
//!
//! ```text
//! h''(x) = f''(g) * g'^2 + f'(g) * g''
//! ```
//!
//! so each rule combines the curvature of `f` over the bound of `g` with the
//! monotonicity of `f` and the curvature of `g`. Any combination not covered
//! by a rule is `Unknown`.

use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::{DMatrix, SymmetricEigen};

use crate::context::Context;
use crate::error::Result;
use crate::expr::{Expr, ExprId, ExprKind, NodeKind, QuadraticTerm, Sense, UnaryFunction};
use crate::interval::round::{is_almost_even, is_almost_integer};
use crate::interval::{almost_eq, almost_gte, almost_lte, Interval};
use crate::properties::Convexity;

use super::{constant_value, unexpected};

// ============================================================================
// Helpers
// ============================================================================

/// Swap convex and concave.
pub fn negate(c: Convexity) -> Convexity {
    match c {
        Convexity::Convex => Convexity::Concave,
        Convexity::Concave => Convexity::Convex,
        other => other,
    }
}

/// Convexity of `coefficient * g`.
fn scaled(coefficient: f64, c: Convexity) -> Convexity {
    if almost_eq(coefficient, 0.0) {
        Convexity::Linear
    } else if coefficient > 0.0 {
        c
    } else {
        negate(c)
    }
}

/// Convexity of a sum of terms.
fn combine(terms: impl IntoIterator<Item = Convexity>) -> Convexity {
    let (mut linear, mut convex, mut concave) = (true, true, true);
    for c in terms {
        linear &= c.is_linear();
        convex &= c.is_convex();
        concave &= c.is_concave();
    }
    if linear {
        Convexity::Linear
    } else if convex {
        Convexity::Convex
    } else if concave {
        Convexity::Concave
    } else {
        Convexity::Unknown
    }
}

/// Convexity of `g^2`.
fn square(c: Convexity, bound: &Interval) -> Convexity {
    if c.is_linear()
        || (c.is_convex() && bound.is_nonnegative())
        || (c.is_concave() && bound.is_nonpositive())
    {
        Convexity::Convex
    } else {
        Convexity::Unknown
    }
}

/// Convexity of `g * k` where `k` has the constant bound `factor`.
fn times_constant(c: Convexity, factor: &Interval) -> Convexity {
    if factor.is_zero() || c.is_linear() {
        Convexity::Linear
    } else if factor.is_nonnegative() {
        c
    } else if factor.is_nonpositive() {
        negate(c)
    } else {
        Convexity::Unknown
    }
}

fn product_of(f: &Expr, g: &Expr, ctx: &Context) -> Result<Convexity> {
    if f.id() == g.id() {
        return Ok(square(ctx.convexity(f)?, &ctx.bound(f)?));
    }
    if ctx.monotonicity(f)?.is_constant() {
        return Ok(times_constant(ctx.convexity(g)?, &ctx.bound(f)?));
    }
    if ctx.monotonicity(g)?.is_constant() {
        return Ok(times_constant(ctx.convexity(f)?, &ctx.bound(g)?));
    }
    Ok(Convexity::Unknown)
}

/// Convexity of `k / g` for a constant numerator with bound `numerator`.
fn constant_over(numerator: &Interval, c: Convexity, g: &Interval) -> Convexity {
    if numerator.is_zero() {
        return Convexity::Linear;
    }
    let positive = numerator.is_nonnegative();
    let negative = numerator.is_nonpositive();
    if c.is_concave() && g.is_positive() {
        if positive {
            return Convexity::Convex;
        }
        if negative {
            return Convexity::Concave;
        }
    }
    if c.is_convex() && g.is_negative() {
        if positive {
            return Convexity::Concave;
        }
        if negative {
            return Convexity::Convex;
        }
    }
    Convexity::Unknown
}

/// Convexity of `|g|`.
fn abs_of(c: Convexity, bound: &Interval) -> Convexity {
    if c.is_linear() {
        return if bound.is_nonnegative() || bound.is_nonpositive() {
            Convexity::Linear
        } else {
            Convexity::Convex
        };
    }
    match c {
        Convexity::Convex if bound.is_nonnegative() => Convexity::Convex,
        Convexity::Convex if bound.is_nonpositive() => Convexity::Concave,
        Convexity::Concave if bound.is_nonpositive() => Convexity::Convex,
        Convexity::Concave if bound.is_nonnegative() => Convexity::Concave,
        _ => Convexity::Unknown,
    }
}

// ============================================================================
// Leaves and linear nodes
// ============================================================================

pub fn constant_convexity(expr: &Expr, _ctx: &Context) -> Result<Convexity> {
    match expr.kind() {
        ExprKind::Constant(_) => Ok(Convexity::Linear),
        _ => Err(unexpected(expr, NodeKind::Constant)),
    }
}

pub fn variable_convexity(expr: &Expr, _ctx: &Context) -> Result<Convexity> {
    match expr.kind() {
        ExprKind::Variable(_) => Ok(Convexity::Linear),
        _ => Err(unexpected(expr, NodeKind::Variable)),
    }
}

pub fn sum_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Sum(children) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Sum));
    };
    let terms = children
        .iter()
        .map(|c| ctx.convexity(c))
        .collect::<Result<Vec<_>>>()?;
    Ok(combine(terms))
}

pub fn linear_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Linear {
        coefficients,
        children,
        ..
    } = expr.kind()
    else {
        return Err(unexpected(expr, NodeKind::Linear));
    };
    let terms = coefficients
        .iter()
        .zip(children)
        .map(|(&coef, c)| Ok(scaled(coef, ctx.convexity(c)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(combine(terms))
}

pub fn negation_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    match expr.kind() {
        ExprKind::Negation(a) => Ok(negate(ctx.convexity(a)?)),
        _ => Err(unexpected(expr, NodeKind::Negation)),
    }
}

// ============================================================================
// Products and quotients
// ============================================================================

pub fn product_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    match expr.kind() {
        ExprKind::Product(a, b) => product_of(a, b, ctx),
        _ => Err(unexpected(expr, NodeKind::Product)),
    }
}

pub fn monomial_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    match expr.kind() {
        ExprKind::Monomial(a, b) => product_of(a, b, ctx),
        _ => Err(unexpected(expr, NodeKind::Monomial)),
    }
}

pub fn division_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Division(f, g) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Division));
    };
    let cf = ctx.convexity(f)?;
    let cg = ctx.convexity(g)?;
    let bg = ctx.bound(g)?;

    if ctx.monotonicity(g)?.is_constant() {
        if cf.is_linear() && !bg.contains(0.0) {
            return Ok(Convexity::Linear);
        }
        return Ok(if bg.is_positive() {
            cf
        } else if bg.is_negative() {
            negate(cf)
        } else {
            Convexity::Unknown
        });
    }
    if ctx.monotonicity(f)?.is_constant() {
        return Ok(constant_over(&ctx.bound(f)?, cg, &bg));
    }
    Ok(Convexity::Unknown)
}

pub fn reciprocal_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Reciprocal(g) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Reciprocal));
    };
    let bg = ctx.bound(g)?;
    if ctx.monotonicity(g)?.is_constant() && !bg.contains(0.0) {
        return Ok(Convexity::Linear);
    }
    Ok(constant_over(&Interval::point(1.0), ctx.convexity(g)?, &bg))
}

pub fn abs_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    match expr.kind() {
        ExprKind::Abs(g) => Ok(abs_of(ctx.convexity(g)?, &ctx.bound(g)?)),
        _ => Err(unexpected(expr, NodeKind::Abs)),
    }
}

// ============================================================================
// Quadratic forms
// ============================================================================

/// Definiteness of a symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsdStatus {
    /// All eigenvalues are zero.
    Zero,
    /// Positive semi-definite.
    Psd,
    /// Negative semi-definite.
    Nsd,
    /// Indefinite.
    Neither,
}

impl PsdStatus {
    /// Classify a symmetric matrix by the signs of its eigenvalues.
    pub fn of_matrix(m: DMatrix<f64>) -> Self {
        if m.is_empty() {
            return PsdStatus::Zero;
        }
        let eigenvalues = SymmetricEigen::new(m).eigenvalues;
        let (min, max) = (eigenvalues.min(), eigenvalues.max());
        match (almost_gte(min, 0.0), almost_lte(max, 0.0)) {
            (true, true) => PsdStatus::Zero,
            (true, false) => PsdStatus::Psd,
            (false, true) => PsdStatus::Nsd,
            (false, false) => PsdStatus::Neither,
        }
    }
}

/// Symmetric coefficient matrix of `sum(c * x_i * x_j)`.
fn coefficient_matrix(terms: &[QuadraticTerm]) -> DMatrix<f64> {
    let mut index: HashMap<ExprId, usize> = HashMap::new();
    for t in terms {
        for v in [&t.var1, &t.var2] {
            let next = index.len();
            index.entry(v.id()).or_insert(next);
        }
    }
    let n = index.len();
    let mut m = DMatrix::zeros(n, n);
    for t in terms {
        let i = index[&t.var1.id()];
        let j = index[&t.var2.id()];
        if i == j {
            m[(i, i)] += t.coefficient;
        } else {
            m[(i, j)] += t.coefficient / 2.0;
            m[(j, i)] += t.coefficient / 2.0;
        }
    }
    m
}

/// Curvature from the eigenvalues of the coefficient matrix.
///
/// Only valid when every factor is linear; otherwise `Unknown`.
pub fn quadratic_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Quadratic(terms) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Quadratic));
    };
    for t in terms {
        if !ctx.convexity(&t.var1)?.is_linear() || !ctx.convexity(&t.var2)?.is_linear() {
            return Ok(Convexity::Unknown);
        }
    }
    Ok(match PsdStatus::of_matrix(coefficient_matrix(terms)) {
        PsdStatus::Zero => Convexity::Linear,
        PsdStatus::Psd => Convexity::Convex,
        PsdStatus::Nsd => Convexity::Concave,
        PsdStatus::Neither => Convexity::Unknown,
    })
}

// ============================================================================
// Powers
// ============================================================================

/// Convexity of `g ^ p` for a numeric exponent `p`.
fn constant_exponent(p: f64, c: Convexity, bound: &Interval) -> Convexity {
    if almost_eq(p, 0.0) {
        return Convexity::Linear;
    }
    if almost_eq(p, 1.0) {
        return c;
    }
    let nonneg = bound.is_nonnegative();
    let nonpos = bound.is_nonpositive();

    if is_almost_integer(p) {
        let even = is_almost_even(p);
        return match (even, p > 0.0) {
            // g^2, g^4, ...
            (true, true) => square(c, bound),
            // g^-2, g^-4, ...: convex on either side of the pole
            (true, false) => {
                if (c.is_convex() && nonpos) || (c.is_concave() && nonneg) {
                    Convexity::Convex
                } else {
                    Convexity::Unknown
                }
            }
            // g^3, g^5, ...
            (false, true) => {
                if c.is_convex() && nonneg {
                    Convexity::Convex
                } else if c.is_concave() && nonpos {
                    Convexity::Concave
                } else {
                    Convexity::Unknown
                }
            }
            // g^-1, g^-3, ...
            (false, false) => {
                if c.is_concave() && nonneg {
                    Convexity::Convex
                } else if c.is_convex() && nonpos {
                    Convexity::Concave
                } else {
                    Convexity::Unknown
                }
            }
        };
    }

    if !nonneg {
        return Convexity::Unknown;
    }
    if c.is_convex() && p > 1.0 {
        Convexity::Convex
    } else if c.is_concave() && p < 0.0 {
        Convexity::Convex
    } else if c.is_concave() && p > 0.0 && p < 1.0 {
        Convexity::Concave
    } else {
        Convexity::Unknown
    }
}

/// Convexity of `a ^ g` for a numeric base `a`.
fn constant_base(a: f64, c: Convexity) -> Convexity {
    if a > 0.0 && a < 1.0 && !almost_eq(a, 1.0) {
        if c.is_concave() {
            return Convexity::Convex;
        }
        return Convexity::Unknown;
    }
    if almost_gte(a, 1.0) {
        return if c.is_convex() {
            Convexity::Convex
        } else {
            Convexity::Unknown
        };
    }
    Convexity::Unknown
}

pub fn power_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Power(base, exponent) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Power));
    };
    if ctx.monotonicity(exponent)?.is_constant() {
        return Ok(match constant_value(ctx, exponent)? {
            Some(p) => constant_exponent(p, ctx.convexity(base)?, &ctx.bound(base)?),
            None => Convexity::Unknown,
        });
    }
    if let Some(a) = constant_value(ctx, base)? {
        return Ok(constant_base(a, ctx.convexity(exponent)?));
    }
    Ok(Convexity::Unknown)
}

// ============================================================================
// Named functions
// ============================================================================

/// `sin(g)`: sign of `-sin(g) * g'^2 + cos(g) * g''`.
fn sin_of(c: Convexity, bound: &Interval) -> Convexity {
    if bound.size() > PI {
        return Convexity::Unknown;
    }
    let sin = bound.sin();
    let cos = bound.cos();
    if sin.is_nonnegative() {
        if c.is_linear()
            || (c.is_concave() && cos.is_nonnegative())
            || (c.is_convex() && cos.is_nonpositive())
        {
            return Convexity::Concave;
        }
    } else if sin.is_nonpositive()
        && (c.is_linear()
            || (c.is_convex() && cos.is_nonnegative())
            || (c.is_concave() && cos.is_nonpositive()))
    {
        return Convexity::Convex;
    }
    Convexity::Unknown
}

/// `cos(g)`: sign of `-cos(g) * g'^2 - sin(g) * g''`.
fn cos_of(c: Convexity, bound: &Interval) -> Convexity {
    if bound.size() > PI {
        return Convexity::Unknown;
    }
    let sin = bound.sin();
    let cos = bound.cos();
    if cos.is_nonnegative() {
        if c.is_linear()
            || (c.is_convex() && sin.is_nonnegative())
            || (c.is_concave() && sin.is_nonpositive())
        {
            return Convexity::Concave;
        }
    } else if cos.is_nonpositive()
        && (c.is_linear()
            || (c.is_concave() && sin.is_nonnegative())
            || (c.is_convex() && sin.is_nonpositive()))
    {
        return Convexity::Convex;
    }
    Convexity::Unknown
}

fn tan_of(c: Convexity, bound: &Interval) -> Convexity {
    let tan = bound.tan();
    if tan.is_unbounded() || tan.is_empty() {
        return Convexity::Unknown;
    }
    if tan.is_nonnegative() && c.is_convex() {
        Convexity::Convex
    } else if tan.is_nonpositive() && c.is_concave() {
        Convexity::Concave
    } else {
        Convexity::Unknown
    }
}

fn asin_of(c: Convexity, bound: &Interval) -> Convexity {
    if Interval::raw(0.0, 1.0).contains_interval(bound) && c.is_convex() {
        Convexity::Convex
    } else if Interval::raw(-1.0, 0.0).contains_interval(bound) && c.is_concave() {
        Convexity::Concave
    } else {
        Convexity::Unknown
    }
}

fn acos_of(c: Convexity, bound: &Interval) -> Convexity {
    if Interval::raw(-1.0, 0.0).contains_interval(bound) && c.is_concave() {
        Convexity::Convex
    } else if Interval::raw(0.0, 1.0).contains_interval(bound) && c.is_convex() {
        Convexity::Concave
    } else {
        Convexity::Unknown
    }
}

fn atan_of(c: Convexity, bound: &Interval) -> Convexity {
    if bound.is_nonpositive() && c.is_convex() {
        Convexity::Convex
    } else if bound.is_nonnegative() && c.is_concave() {
        Convexity::Concave
    } else {
        Convexity::Unknown
    }
}

pub fn unary_function_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::UnaryFunction(func, arg) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::UnaryFunction));
    };
    let c = ctx.convexity(arg)?;
    let bound = ctx.bound(arg)?;
    Ok(match func {
        UnaryFunction::Sqrt | UnaryFunction::Log | UnaryFunction::Log10 if c.is_concave() => {
            Convexity::Concave
        }
        UnaryFunction::Exp if c.is_convex() => Convexity::Convex,
        UnaryFunction::Sqrt | UnaryFunction::Log | UnaryFunction::Log10 | UnaryFunction::Exp => {
            Convexity::Unknown
        }
        UnaryFunction::Sin => sin_of(c, &bound),
        UnaryFunction::Cos => cos_of(c, &bound),
        UnaryFunction::Tan => tan_of(c, &bound),
        UnaryFunction::Asin => asin_of(c, &bound),
        UnaryFunction::Acos => acos_of(c, &bound),
        UnaryFunction::Atan => atan_of(c, &bound),
        UnaryFunction::Abs => abs_of(c, &bound),
    })
}

// ============================================================================
// Roots
// ============================================================================

/// Convexity of the constraint function, oriented so `<=` holds.
pub fn constraint_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Constraint(con) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Constraint));
    };
    let body = ctx.convexity(&con.body)?;
    Ok(match (con.bounded_below(), con.bounded_above()) {
        (true, true) if body.is_linear() => Convexity::Linear,
        (true, true) => Convexity::Unknown,
        (true, false) => negate(body),
        (false, true) => body,
        (false, false) => Convexity::Linear,
    })
}

pub fn objective_convexity(expr: &Expr, ctx: &Context) -> Result<Convexity> {
    let ExprKind::Objective(o) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Objective));
    };
    let body = ctx.convexity(&o.body)?;
    Ok(match o.sense {
        Sense::Minimize => body,
        Sense::Maximize => negate(body),
    })
}
