//! Monotonicity propagation rules.
//!
//! Rules reason about the sign of the first derivative: a product `f * g`
//! is nondecreasing when both `f' * g` and `f * g'` are nonnegative over the
//! children's bounds, and so on. Constants are reported as
//! `Constant(None)`; the analyzer fills in the value from the node's bound.

use crate::context::Context;
use crate::error::Result;
use crate::expr::{Expr, ExprKind, NodeKind, Sense, UnaryFunction};
use crate::interval::round::{is_almost_even, is_almost_integer};
use crate::interval::{almost_eq, Interval};
use crate::properties::Monotonicity;

use super::{constant_value, unexpected};

// ============================================================================
// Helpers
// ============================================================================

/// Reverse the direction of a monotonicity.
pub fn negate(m: Monotonicity) -> Monotonicity {
    match m {
        Monotonicity::Nondecreasing => Monotonicity::Nonincreasing,
        Monotonicity::Nonincreasing => Monotonicity::Nondecreasing,
        Monotonicity::Constant(_) => Monotonicity::Constant(None),
        Monotonicity::Unknown => Monotonicity::Unknown,
    }
}

/// Monotonicity of `coefficient * f`.
fn scaled(coefficient: f64, m: Monotonicity) -> Monotonicity {
    if almost_eq(coefficient, 0.0) {
        Monotonicity::Constant(None)
    } else if coefficient > 0.0 {
        m
    } else {
        negate(m)
    }
}

/// Monotonicity of a sum of terms.
fn combine(terms: impl IntoIterator<Item = Monotonicity>) -> Monotonicity {
    let (mut constant, mut nondecreasing, mut nonincreasing) = (true, true, true);
    for m in terms {
        constant &= m.is_constant();
        nondecreasing &= m.is_nondecreasing();
        nonincreasing &= m.is_nonincreasing();
    }
    from_signs(nondecreasing, nonincreasing, constant)
}

fn from_signs(nondecreasing: bool, nonincreasing: bool, constant: bool) -> Monotonicity {
    match (nondecreasing, nonincreasing) {
        _ if constant => Monotonicity::Constant(None),
        (true, true) => Monotonicity::Constant(None),
        (true, false) => Monotonicity::Nondecreasing,
        (false, true) => Monotonicity::Nonincreasing,
        (false, false) => Monotonicity::Unknown,
    }
}

/// Sign of `f' * g` given the monotonicity of `f` and the bound of `g`.
///
/// Returns `(nonnegative, nonpositive)`.
fn derivative_sign(m: Monotonicity, other: &Interval) -> (bool, bool) {
    if m.is_constant() {
        return (true, true);
    }
    let nonneg = (m.is_nondecreasing() && other.is_nonnegative())
        || (m.is_nonincreasing() && other.is_nonpositive());
    let nonpos = (m.is_nondecreasing() && other.is_nonpositive())
        || (m.is_nonincreasing() && other.is_nonnegative());
    (nonneg, nonpos)
}

/// Monotonicity of `f * g` from `f' * g + f * g'`.
fn product_of(mf: Monotonicity, bf: &Interval, mg: Monotonicity, bg: &Interval) -> Monotonicity {
    if mf.is_constant() && mg.is_constant() {
        return Monotonicity::Constant(None);
    }
    let (a_nonneg, a_nonpos) = derivative_sign(mf, bg);
    let (b_nonneg, b_nonpos) = derivative_sign(mg, bf);
    from_signs(a_nonneg && b_nonneg, a_nonpos && b_nonpos, false)
}

fn children_product(a: &Expr, b: &Expr, ctx: &Context) -> Result<Monotonicity> {
    Ok(product_of(
        ctx.monotonicity(a)?,
        &ctx.bound(a)?,
        ctx.monotonicity(b)?,
        &ctx.bound(b)?,
    ))
}

// ============================================================================
// Leaves and linear nodes
// ============================================================================

pub fn constant_monotonicity(expr: &Expr, _ctx: &Context) -> Result<Monotonicity> {
    match expr.kind() {
        ExprKind::Constant(v) => Ok(Monotonicity::Constant(Some(*v))),
        _ => Err(unexpected(expr, NodeKind::Constant)),
    }
}

/// Variables are nondecreasing in themselves; a fixed variable is constant.
pub fn variable_monotonicity(expr: &Expr, _ctx: &Context) -> Result<Monotonicity> {
    match expr.kind() {
        ExprKind::Variable(v) => match (v.lower, v.upper) {
            (Some(l), Some(u)) if almost_eq(l, u) => {
                Ok(Monotonicity::Constant(Some(l / 2.0 + u / 2.0)))
            }
            _ => Ok(Monotonicity::Nondecreasing),
        },
        _ => Err(unexpected(expr, NodeKind::Variable)),
    }
}

pub fn sum_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Sum(children) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Sum));
    };
    let terms = children
        .iter()
        .map(|c| ctx.monotonicity(c))
        .collect::<Result<Vec<_>>>()?;
    Ok(combine(terms))
}

pub fn linear_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
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
        .map(|(&coef, c)| Ok(scaled(coef, ctx.monotonicity(c)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(combine(terms))
}

pub fn negation_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    match expr.kind() {
        ExprKind::Negation(a) => Ok(negate(ctx.monotonicity(a)?)),
        _ => Err(unexpected(expr, NodeKind::Negation)),
    }
}

// ============================================================================
// Products and quotients
// ============================================================================

pub fn product_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    match expr.kind() {
        ExprKind::Product(a, b) => children_product(a, b, ctx),
        _ => Err(unexpected(expr, NodeKind::Product)),
    }
}

pub fn monomial_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    match expr.kind() {
        ExprKind::Monomial(a, b) => children_product(a, b, ctx),
        _ => Err(unexpected(expr, NodeKind::Monomial)),
    }
}

/// `f / g` from the sign of `f' * g - f * g'`; unknown if `g` can be zero.
pub fn division_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Division(f, g) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Division));
    };
    let (mf, bf) = (ctx.monotonicity(f)?, ctx.bound(f)?);
    let (mg, bg) = (ctx.monotonicity(g)?, ctx.bound(g)?);
    if bg.contains(0.0) {
        return Ok(Monotonicity::Unknown);
    }
    if mf.is_constant() && mg.is_constant() {
        return Ok(Monotonicity::Constant(None));
    }
    let (a_nonneg, a_nonpos) = derivative_sign(mf, &bg);
    let (b_nonneg, b_nonpos) = derivative_sign(mg, &bf);
    Ok(from_signs(a_nonneg && b_nonpos, a_nonpos && b_nonneg, false))
}

pub fn reciprocal_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Reciprocal(g) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Reciprocal));
    };
    if ctx.bound(g)?.contains(0.0) {
        return Ok(Monotonicity::Unknown);
    }
    Ok(negate(ctx.monotonicity(g)?))
}

pub fn quadratic_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Quadratic(terms) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Quadratic));
    };
    let terms = terms
        .iter()
        .map(|t| {
            Ok(scaled(
                t.coefficient,
                children_product(&t.var1, &t.var2, ctx)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(combine(terms))
}

// ============================================================================
// Powers and absolute value
// ============================================================================

/// Monotonicity of `|g|` (and of even powers) from the sign of `g * g'`.
fn even_like(mg: Monotonicity, bg: &Interval) -> Monotonicity {
    if mg.is_constant() {
        return Monotonicity::Constant(None);
    }
    let (nonneg, nonpos) = derivative_sign(mg, bg);
    from_signs(nonneg, nonpos, false)
}

pub fn abs_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    match expr.kind() {
        ExprKind::Abs(g) => Ok(even_like(ctx.monotonicity(g)?, &ctx.bound(g)?)),
        _ => Err(unexpected(expr, NodeKind::Abs)),
    }
}

/// Monotonicity of `g ^ p` for a constant exponent `p`.
fn constant_exponent(p: f64, mg: Monotonicity, bg: &Interval) -> Monotonicity {
    if almost_eq(p, 0.0) || mg.is_constant() {
        return Monotonicity::Constant(None);
    }
    if almost_eq(p, 1.0) {
        return mg;
    }
    if is_almost_integer(p) {
        let even = is_almost_even(p);
        if p > 0.0 {
            return if even { even_like(mg, bg) } else { mg };
        }
        if !(bg.is_nonnegative() || bg.is_nonpositive()) {
            return Monotonicity::Unknown;
        }
        return if even {
            negate(even_like(mg, bg))
        } else {
            negate(mg)
        };
    }
    if !bg.is_nonnegative() {
        return Monotonicity::Unknown;
    }
    if p > 0.0 {
        mg
    } else {
        negate(mg)
    }
}

pub fn power_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Power(base, exponent) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Power));
    };
    if let Some(p) = constant_value(ctx, exponent)? {
        return Ok(constant_exponent(
            p,
            ctx.monotonicity(base)?,
            &ctx.bound(base)?,
        ));
    }
    if let Some(a) = constant_value(ctx, base)? {
        let me = ctx.monotonicity(exponent)?;
        return Ok(if almost_eq(a, 1.0) {
            Monotonicity::Constant(Some(1.0))
        } else if a > 1.0 {
            me
        } else if a > 0.0 {
            negate(me)
        } else {
            Monotonicity::Unknown
        });
    }
    Ok(Monotonicity::Unknown)
}

// ============================================================================
// Named functions
// ============================================================================

/// Shared combinator for named unary functions.
pub fn unary_function_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::UnaryFunction(func, arg) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::UnaryFunction));
    };
    let mg = ctx.monotonicity(arg)?;
    let bg = ctx.bound(arg)?;
    if mg.is_constant() {
        return Ok(Monotonicity::Constant(None));
    }
    Ok(match func {
        UnaryFunction::Sqrt
        | UnaryFunction::Exp
        | UnaryFunction::Log
        | UnaryFunction::Log10
        | UnaryFunction::Asin
        | UnaryFunction::Atan => mg,
        UnaryFunction::Acos => negate(mg),
        UnaryFunction::Tan => {
            let branch = bg.tan();
            if branch.is_unbounded() || branch.is_empty() {
                Monotonicity::Unknown
            } else {
                mg
            }
        }
        UnaryFunction::Sin => by_derivative_bound(mg, &bg.cos()),
        UnaryFunction::Cos => by_derivative_bound(mg, &-bg.sin()),
        UnaryFunction::Abs => even_like(mg, &bg),
    })
}

/// Monotonicity of `f(g)` given the bound of `f'(g)`.
fn by_derivative_bound(mg: Monotonicity, derivative: &Interval) -> Monotonicity {
    if derivative.is_nonnegative() {
        mg
    } else if derivative.is_nonpositive() {
        negate(mg)
    } else {
        Monotonicity::Unknown
    }
}

// ============================================================================
// Roots
// ============================================================================

/// A two-sided constraint has a direction only when its body is constant.
pub fn constraint_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Constraint(c) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Constraint));
    };
    let body = ctx.monotonicity(&c.body)?;
    Ok(match (c.bounded_below(), c.bounded_above()) {
        (true, true) if body.is_constant() => body,
        (true, true) => Monotonicity::Unknown,
        (true, false) => negate(body),
        _ => body,
    })
}

pub fn objective_monotonicity(expr: &Expr, ctx: &Context) -> Result<Monotonicity> {
    let ExprKind::Objective(o) = expr.kind() else {
        return Err(unexpected(expr, NodeKind::Objective));
    };
    let body = ctx.monotonicity(&o.body)?;
    Ok(match o.sense {
        Sense::Minimize => body,
        Sense::Maximize => negate(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{abs, cos, division, powf, product, reciprocal, sin, tan};
    use crate::constraints::ConstraintExt;
    use crate::expr::bounded_variable;

    fn iv(lower: f64, upper: f64) -> Interval {
        Interval::new(lower, upper).unwrap()
    }

    fn set(ctx: &mut Context, expr: &Expr, bound: Interval, mono: Monotonicity) {
        ctx.set_bound(expr, bound);
        ctx.set_monotonicity(expr, mono);
    }

    #[test]
    fn test_negate() {
        assert_eq!(negate(Monotonicity::Nondecreasing), Monotonicity::Nonincreasing);
        assert_eq!(negate(Monotonicity::Unknown), Monotonicity::Unknown);
        assert!(negate(Monotonicity::Constant(Some(2.0))).is_constant());
    }

    #[test]
    fn test_combine() {
        use Monotonicity::*;
        assert_eq!(combine([Nondecreasing, Constant(None)]), Nondecreasing);
        assert_eq!(combine([Nonincreasing, Nonincreasing]), Nonincreasing);
        assert_eq!(combine([Nondecreasing, Nonincreasing]), Unknown);
        assert!(combine([Constant(None), Constant(Some(1.0))]).is_constant());
    }

    #[test]
    fn test_fixed_variable_is_constant() {
        let x = bounded_variable(2.0, 2.0);
        let m = variable_monotonicity(&x, &Context::new()).unwrap();
        assert_eq!(m, Monotonicity::Constant(Some(2.0)));

        // bounds equal within tolerance
        let z = bounded_variable(3.0, 3.0 + 1e-12);
        let m = variable_monotonicity(&z, &Context::new()).unwrap();
        assert!(m.is_constant());
        assert!((m.value().unwrap() - 3.0).abs() < 1e-9);

        let y = bounded_variable(0.0, 1.0);
        let m = variable_monotonicity(&y, &Context::new()).unwrap();
        assert_eq!(m, Monotonicity::Nondecreasing);
    }

    #[test]
    fn test_product_signs() {
        let x = bounded_variable(1.0, 2.0);
        let y = bounded_variable(-3.0, -1.0);
        let mut ctx = Context::new();
        set(&mut ctx, &x, iv(1.0, 2.0), Monotonicity::Nondecreasing);
        set(&mut ctx, &y, iv(-3.0, -1.0), Monotonicity::Nondecreasing);

        // d(xy) = y dx + x dy: mixed signs
        let p = product(&x, &y);
        assert_eq!(product_monotonicity(&p, &ctx).unwrap(), Monotonicity::Unknown);

        // x * x with x positive
        let sq = product(&x, &x);
        assert_eq!(
            product_monotonicity(&sq, &ctx).unwrap(),
            Monotonicity::Nondecreasing
        );

        // y * y with y negative
        let sq = product(&y, &y);
        assert_eq!(
            product_monotonicity(&sq, &ctx).unwrap(),
            Monotonicity::Nonincreasing
        );
    }

    #[test]
    fn test_division_and_reciprocal() {
        let x = bounded_variable(1.0, 2.0);
        let z = bounded_variable(-1.0, 1.0);
        let mut ctx = Context::new();
        set(&mut ctx, &x, iv(1.0, 2.0), Monotonicity::Nondecreasing);
        set(&mut ctx, &z, iv(-1.0, 1.0), Monotonicity::Nondecreasing);

        let r = reciprocal(&x);
        assert_eq!(
            reciprocal_monotonicity(&r, &ctx).unwrap(),
            Monotonicity::Nonincreasing
        );
        let r = reciprocal(&z);
        assert_eq!(reciprocal_monotonicity(&r, &ctx).unwrap(), Monotonicity::Unknown);

        let d = division(&z, &x);
        assert_eq!(division_monotonicity(&d, &ctx).unwrap(), Monotonicity::Unknown);
        let d = division(&x, &z);
        assert_eq!(division_monotonicity(&d, &ctx).unwrap(), Monotonicity::Unknown);
    }

    #[test]
    fn test_constant_exponent() {
        use Monotonicity::*;
        let pos = iv(1.0, 2.0);
        let neg = iv(-2.0, -1.0);
        let mixed = iv(-1.0, 1.0);
        assert_eq!(constant_exponent(2.0, Nondecreasing, &pos), Nondecreasing);
        assert_eq!(constant_exponent(2.0, Nondecreasing, &neg), Nonincreasing);
        assert_eq!(constant_exponent(2.0, Nondecreasing, &mixed), Unknown);
        assert_eq!(constant_exponent(3.0, Nondecreasing, &mixed), Nondecreasing);
        assert_eq!(constant_exponent(-1.0, Nondecreasing, &pos), Nonincreasing);
        assert_eq!(constant_exponent(-1.0, Nondecreasing, &mixed), Unknown);
        assert_eq!(constant_exponent(-2.0, Nondecreasing, &neg), Nondecreasing);
        assert_eq!(constant_exponent(0.5, Nondecreasing, &pos), Nondecreasing);
        assert_eq!(constant_exponent(0.5, Nondecreasing, &mixed), Unknown);
        assert!(constant_exponent(0.0, Unknown, &mixed).is_constant());
    }

    #[test]
    fn test_power_rule_reads_exponent_value() {
        let x = bounded_variable(-2.0, -1.0);
        let mut ctx = Context::new();
        set(&mut ctx, &x, iv(-2.0, -1.0), Monotonicity::Nondecreasing);
        let p = powf(&x, 2.0);
        if let ExprKind::Power(_, e) = p.kind() {
            set(&mut ctx, e, iv(2.0, 2.0), Monotonicity::Constant(Some(2.0)));
        }
        assert_eq!(
            power_monotonicity(&p, &ctx).unwrap(),
            Monotonicity::Nonincreasing
        );
    }

    #[test]
    fn test_trig() {
        let x = bounded_variable(0.0, 1.0);
        let mut ctx = Context::new();
        set(&mut ctx, &x, iv(0.0, 1.0), Monotonicity::Nondecreasing);

        let s = sin(&x);
        assert_eq!(
            unary_function_monotonicity(&s, &ctx).unwrap(),
            Monotonicity::Nondecreasing
        );
        let c = cos(&x);
        assert_eq!(
            unary_function_monotonicity(&c, &ctx).unwrap(),
            Monotonicity::Nonincreasing
        );
        let t = tan(&x);
        ctx.set_bound(&t, iv(0.0, 1.0).tan());
        assert_eq!(
            unary_function_monotonicity(&t, &ctx).unwrap(),
            Monotonicity::Nondecreasing
        );
    }

    #[test]
    fn test_tan_reads_argument_branch() {
        // a finite node bound does not hide a pole in the argument
        let y = bounded_variable(1.0, 2.0);
        let mut ctx = Context::new();
        set(&mut ctx, &y, iv(1.0, 2.0), Monotonicity::Nondecreasing);
        let t = tan(&y);
        ctx.set_bound(&t, iv(-1.0, 1.0));
        assert_eq!(
            unary_function_monotonicity(&t, &ctx).unwrap(),
            Monotonicity::Unknown
        );
    }

    #[test]
    fn test_abs() {
        let x = bounded_variable(-2.0, -1.0);
        let mut ctx = Context::new();
        set(&mut ctx, &x, iv(-2.0, -1.0), Monotonicity::Nondecreasing);
        let a = abs(&x);
        assert_eq!(abs_monotonicity(&a, &ctx).unwrap(), Monotonicity::Nonincreasing);
    }

    #[test]
    fn test_constraint_sides() {
        let x = bounded_variable(0.0, 1.0);
        let mut ctx = Context::new();
        set(&mut ctx, &x, iv(0.0, 1.0), Monotonicity::Nondecreasing);

        let c = x.leq(1.0);
        assert_eq!(
            constraint_monotonicity(&c, &ctx).unwrap(),
            Monotonicity::Nondecreasing
        );
        let c = x.geq(0.0);
        assert_eq!(
            constraint_monotonicity(&c, &ctx).unwrap(),
            Monotonicity::Nonincreasing
        );
        let c = x.between(0.0, 1.0);
        assert_eq!(constraint_monotonicity(&c, &ctx).unwrap(), Monotonicity::Unknown);
    }
}
