//! Tolerance-aware comparisons and outward rounding.
//!
//! Rust exposes no control over the IEEE rounding mode, so directed rounding is
//! emulated by stepping each computed bound outward by a number of ULPs:
//! - one ULP after `+`, `-`, `*`, `/` and `sqrt`, which IEEE 754 rounds correctly
//!   (the exact result lies within one ULP of the returned value);
//! - [`TRANSCENDENTAL_ULPS`] after library functions such as `exp` or `sin`,
//!   which are only faithfully rounded.
//!
//! The resulting bounds are sound but may be a few ULPs wider than bounds
//! computed under a true round-down / round-up mode.

/// Absolute tolerance used by every approximate comparison.
pub const ABS_TOL: f64 = 1e-9;

/// Relative tolerance used by every approximate comparison.
pub const REL_TOL: f64 = 1e-9;

/// ULPs a transcendental result is widened by.
pub const TRANSCENDENTAL_ULPS: u32 = 4;

/// Check whether `a` and `b` are equal within tolerance.
///
/// Infinities compare equal only to themselves.
pub fn almost_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() || a.is_nan() || b.is_nan() {
        return false;
    }
    let diff = (a - b).abs();
    diff <= ABS_TOL || diff <= REL_TOL * a.abs().max(b.abs())
}

/// `a <= b` within tolerance.
pub fn almost_lte(a: f64, b: f64) -> bool {
    a <= b || almost_eq(a, b)
}

/// `a >= b` within tolerance.
pub fn almost_gte(a: f64, b: f64) -> bool {
    a >= b || almost_eq(a, b)
}

/// Check whether `x` is an integer within tolerance.
pub fn is_almost_integer(x: f64) -> bool {
    x.is_finite() && almost_eq(x, x.round())
}

/// Check whether `x` is an even integer within tolerance.
pub fn is_almost_even(x: f64) -> bool {
    is_almost_integer(x) && almost_eq(x.rem_euclid(2.0).min(2.0 - x.rem_euclid(2.0)), 0.0)
}

/// Next representable value toward +inf.
fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Next representable value toward -inf.
fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

/// Round a lower bound outward by `ulps`.
///
/// `-inf` is kept. A lower bound of `+inf` can only come from overflow, so it
/// becomes `f64::MAX`. NaN means the bound is unknown and becomes -inf.
pub fn down_by(x: f64, ulps: u32) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if x == f64::INFINITY {
        return f64::MAX;
    }
    (0..ulps).fold(x, |acc, _| next_down(acc))
}

/// Round an upper bound outward by `ulps`.
///
/// `+inf` is kept. An upper bound of `-inf` can only come from overflow, so it
/// becomes `-f64::MAX`. NaN means the bound is unknown and becomes +inf.
pub fn up_by(x: f64, ulps: u32) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return f64::INFINITY;
    }
    if x == f64::NEG_INFINITY {
        return -f64::MAX;
    }
    (0..ulps).fold(x, |acc, _| next_up(acc))
}

/// Round a correctly rounded lower bound toward -inf.
pub fn down(x: f64) -> f64 {
    down_by(x, 1)
}

/// Round a correctly rounded upper bound toward +inf.
pub fn up(x: f64) -> f64 {
    up_by(x, 1)
}

/// Product of two bounds where `0 * inf` is taken as 0.
pub fn mul_bound(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_almost_eq() {
        assert!(almost_eq(1.0, 1.0 + 1e-12));
        assert!(almost_eq(0.0, 1e-10));
        assert!(!almost_eq(1.0, 1.001));
        assert!(almost_eq(f64::INFINITY, f64::INFINITY));
        assert!(!almost_eq(f64::INFINITY, f64::MAX));
        assert!(almost_eq(1e12, 1e12 + 1.0));
    }

    #[test]
    fn test_almost_ordering() {
        assert!(almost_lte(1.0, 2.0));
        assert!(almost_lte(1.0 + 1e-12, 1.0));
        assert!(!almost_lte(1.1, 1.0));
        assert!(almost_gte(0.0, -1e-12));
        assert!(!almost_gte(-0.5, 0.0));
    }

    #[test]
    fn test_integrality() {
        assert!(is_almost_integer(3.0));
        assert!(is_almost_integer(-2.0 + 1e-12));
        assert!(!is_almost_integer(2.5));
        assert!(!is_almost_integer(f64::INFINITY));

        assert!(is_almost_even(2.0));
        assert!(is_almost_even(-4.0));
        assert!(is_almost_even(0.0));
        assert!(is_almost_even(2.0 - 1e-12));
        assert!(!is_almost_even(3.0));
        assert!(!is_almost_even(-1.0));
    }

    #[test]
    fn test_outward_rounding() {
        assert!(down(1.0) < 1.0);
        assert!(up(1.0) > 1.0);
        assert!(down(0.0) < 0.0);
        assert!(up(0.0) > 0.0);
        assert!(up(-1.0) > -1.0);
        assert_eq!(down(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert_eq!(up(f64::INFINITY), f64::INFINITY);
        assert_eq!(down(f64::NAN), f64::NEG_INFINITY);
        assert_eq!(up(f64::NAN), f64::INFINITY);
        assert!(down_by(1.0, 4) < down(1.0));
    }

    #[test]
    fn test_overflowed_bounds_stay_finite() {
        assert_eq!(down(f64::INFINITY), f64::MAX);
        assert_eq!(up(f64::NEG_INFINITY), -f64::MAX);
        assert_eq!(down_by(f64::MAX * 2.0, 4), f64::MAX);
    }

    #[test]
    fn test_mul_bound_zero_times_infinity() {
        assert_eq!(mul_bound(0.0, f64::INFINITY), 0.0);
        assert_eq!(mul_bound(f64::NEG_INFINITY, 0.0), 0.0);
        assert_eq!(mul_bound(-2.0, f64::INFINITY), f64::NEG_INFINITY);
    }
}
