//! Bound propagation rules.
//!
//! Each rule computes a sound interval for a node from the intervals of its
//! children. Where no bound can be derived the result is
//! [`Interval::unbounded`], never an error.

use crate::context::Context;
use crate::error::Result;
use crate::expr::{Expr, ExprKind, NodeKind, UnaryFunction};
use crate::interval::Interval;

use super::{constant_value, unexpected};

/// `[c, c]` for a constant `c`.
pub fn constant_bound(expr: &Expr, _ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Constant(v) => Ok(Interval::point(*v)),
        _ => Err(unexpected(expr, NodeKind::Constant)),
    }
}

/// The declared bounds of a variable.
pub fn variable_bound(expr: &Expr, _ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Variable(v) => Interval::from_bounds(v.lower, v.upper),
        _ => Err(unexpected(expr, NodeKind::Variable)),
    }
}

pub fn sum_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    let ExprKind::Sum(children) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Sum));
    };
    children
        .iter()
        .try_fold(Interval::zero(), |acc, c| Ok(acc + ctx.bound(c)?))
}

pub fn linear_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    let ExprKind::Linear {
        coefficients,
        children,
        constant,
    } = expr.kind()
    else {
        return Err(unexpected(expr, NodeKind::Linear));
    };
    coefficients
        .iter()
        .zip(children)
        .try_fold(Interval::point(*constant), |acc, (&coef, c)| {
            Ok(acc + ctx.bound(c)? * coef)
        })
}

/// Product of two bounds, using the square when both factors are one node.
fn product_of(a: &Expr, b: &Expr, ctx: &Context) -> Result<Interval> {
    if a.id() == b.id() {
        return Ok(ctx.bound(a)?.sqr());
    }
    Ok(ctx.bound(a)? * ctx.bound(b)?)
}

pub fn product_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Product(a, b) => product_of(a, b, ctx),
        _ => Err(unexpected(expr, NodeKind::Product)),
    }
}

pub fn monomial_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Monomial(a, b) => product_of(a, b, ctx),
        _ => Err(unexpected(expr, NodeKind::Monomial)),
    }
}

/// Quotient; unbounded when the divisor contains zero.
pub fn division_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Division(a, b) => Ok(ctx.bound(a)? / ctx.bound(b)?),
        _ => Err(unexpected(expr, NodeKind::Division)),
    }
}

pub fn reciprocal_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Reciprocal(a) => Ok(ctx.bound(a)?.inverse()),
        _ => Err(unexpected(expr, NodeKind::Reciprocal)),
    }
}

/// Bound of `base ^ exponent`.
///
/// A constant exponent uses the exact power bound, a constant positive base
/// uses `exp(exponent * ln(base))`. Otherwise the bound is derived from
/// `exp(exponent * ln(base))` when the base is strictly positive.
pub fn power_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    let ExprKind::Power(base, exponent) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Power));
    };
    let base_bound = ctx.bound(base)?;
    let exponent_bound = ctx.bound(exponent)?;

    if let Some(p) = constant_value(ctx, exponent)? {
        return Ok(base_bound.powf(p));
    }
    if let Some(a) = constant_value(ctx, base)? {
        return Ok(exponent_bound.exp_base(a));
    }
    if base_bound.is_positive() {
        return Ok((exponent_bound * base_bound.log()).exp());
    }
    Ok(Interval::unbounded())
}

pub fn negation_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Negation(a) => Ok(-ctx.bound(a)?),
        _ => Err(unexpected(expr, NodeKind::Negation)),
    }
}

pub fn abs_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Abs(a) => Ok(ctx.bound(a)?.abs()),
        _ => Err(unexpected(expr, NodeKind::Abs)),
    }
}

pub fn quadratic_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    let ExprKind::Quadratic(terms) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Quadratic));
    };
    terms.iter().try_fold(Interval::zero(), |acc, t| {
        Ok(acc + product_of(&t.var1, &t.var2, ctx)? * t.coefficient)
    })
}

pub fn unary_function_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    let ExprKind::UnaryFunction(func, arg) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::UnaryFunction));
    };
    let x = ctx.bound(arg)?;
    Ok(match func {
        UnaryFunction::Sqrt => x.sqrt(),
        UnaryFunction::Exp => x.exp(),
        UnaryFunction::Log => x.log(),
        UnaryFunction::Log10 => x.log10(),
        UnaryFunction::Sin => x.sin(),
        UnaryFunction::Cos => x.cos(),
        UnaryFunction::Tan => x.tan(),
        UnaryFunction::Asin => x.asin(),
        UnaryFunction::Acos => x.acos(),
        UnaryFunction::Atan => x.atan(),
        UnaryFunction::Abs => x.abs(),
    })
}

/// The body's bound intersected with the constraint's sides.
///
/// An empty intersection (an infeasible constraint) yields the empty interval.
pub fn constraint_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    let ExprKind::Constraint(c) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Constraint));
    };
    let sides = Interval::from_bounds(c.lower, c.upper)?;
    Ok(ctx.bound(&c.body)?.intersect(&sides))
}

pub fn objective_bound(expr: &Expr, ctx: &Context) -> Result<Interval> {
    match expr.kind() {
        ExprKind::Objective(o) => ctx.bound(&o.body),
        _ => Err(unexpected(expr, NodeKind::Objective)),
    }
}
