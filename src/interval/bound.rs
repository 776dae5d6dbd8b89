//! The extended-real interval type and its arithmetic.
//!
//! Every operation is sound: the returned interval contains the exact result
//! of the operation for every pair of values drawn from the operands. Lower
//! bounds are rounded toward -inf and upper bounds toward +inf (see
//! [`round`](super::round)).

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::round::{almost_eq, almost_gte, almost_lte, down, mul_bound, up};
use crate::error::{CvxError, Result};

/// A closed interval `[lower, upper]` over the extended reals.
///
/// Intervals are immutable; every operation returns a new interval. The
/// interval `(-inf, +inf)` is the designed result for "no bound derivable"
/// and is not an error. The empty interval, produced by a failed
/// intersection, is a separate sentinel.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    lower: f64,
    upper: f64,
    empty: bool,
}

impl Interval {
    /// Create an interval, failing if `lower > upper` beyond tolerance.
    ///
    /// A NaN bound is treated as missing (the corresponding infinity). If the
    /// bounds cross within tolerance they are swapped into order.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let lower = if lower.is_nan() { f64::NEG_INFINITY } else { lower };
        let upper = if upper.is_nan() { f64::INFINITY } else { upper };
        if lower <= upper {
            Ok(Self::raw(lower, upper))
        } else if almost_eq(lower, upper) {
            Ok(Self::raw(upper, lower))
        } else {
            Err(CvxError::InvalidInterval { lower, upper })
        }
    }

    /// Create an interval from optional bounds; a missing bound is infinite.
    pub fn from_bounds(lower: Option<f64>, upper: Option<f64>) -> Result<Self> {
        Self::new(
            lower.unwrap_or(f64::NEG_INFINITY),
            upper.unwrap_or(f64::INFINITY),
        )
    }

    /// The degenerate interval `[value, value]`.
    pub fn point(value: f64) -> Self {
        if value.is_nan() {
            Self::unbounded()
        } else {
            Self::raw(value, value)
        }
    }

    /// The interval `[0, 0]`.
    pub fn zero() -> Self {
        Self::raw(0.0, 0.0)
    }

    /// The interval `(-inf, +inf)`: no bound derivable.
    pub fn unbounded() -> Self {
        Self::raw(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// The empty interval sentinel.
    pub fn empty() -> Self {
        Interval {
            lower: 0.0,
            upper: 0.0,
            empty: true,
        }
    }

    /// Build an interval from bounds already known to be ordered.
    ///
    /// Rounding can leave the computed bounds crossed by a few ULPs when the
    /// exact result is a point; such bounds are reordered. NaN bounds widen to
    /// the corresponding infinity.
    pub(crate) fn raw(lower: f64, upper: f64) -> Self {
        let lower = if lower.is_nan() { f64::NEG_INFINITY } else { lower };
        let upper = if upper.is_nan() { f64::INFINITY } else { upper };
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Interval {
            lower,
            upper,
            empty: false,
        }
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Width of the interval; infinite if either side is unbounded.
    pub fn size(&self) -> f64 {
        if self.lower.is_infinite() || self.upper.is_infinite() {
            f64::INFINITY
        } else {
            up(self.upper - self.lower)
        }
    }

    /// Check if this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Check if both sides are unbounded.
    pub fn is_unbounded(&self) -> bool {
        !self.empty && self.lower == f64::NEG_INFINITY && self.upper == f64::INFINITY
    }

    /// Check if both sides are finite.
    pub fn is_finite(&self) -> bool {
        !self.empty && self.lower.is_finite() && self.upper.is_finite()
    }

    /// Check if the interval is `[0, 0]` within tolerance.
    pub fn is_zero(&self) -> bool {
        !self.empty && almost_eq(self.lower, 0.0) && almost_eq(self.upper, 0.0)
    }

    fn is_exact_zero(&self) -> bool {
        self.lower == 0.0 && self.upper == 0.0
    }

    /// Check if the interval is a single finite value within tolerance.
    pub fn is_point(&self) -> bool {
        self.is_finite() && almost_eq(self.lower, self.upper)
    }

    /// Check `lower > 0`.
    pub fn is_positive(&self) -> bool {
        !self.empty && self.lower > 0.0 && !almost_eq(self.lower, 0.0)
    }

    /// Check `upper < 0`.
    pub fn is_negative(&self) -> bool {
        !self.empty && self.upper < 0.0 && !almost_eq(self.upper, 0.0)
    }

    /// Check `lower >= 0` within tolerance.
    pub fn is_nonnegative(&self) -> bool {
        !self.empty && almost_gte(self.lower, 0.0)
    }

    /// Check `upper <= 0` within tolerance.
    pub fn is_nonpositive(&self) -> bool {
        !self.empty && almost_lte(self.upper, 0.0)
    }

    /// Check whether `value` lies in the interval within tolerance.
    pub fn contains(&self, value: f64) -> bool {
        !self.empty && almost_lte(self.lower, value) && almost_lte(value, self.upper)
    }

    /// Check whether `other` lies inside this interval within tolerance.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        if other.empty {
            return true;
        }
        !self.empty && almost_lte(self.lower, other.lower) && almost_lte(other.upper, self.upper)
    }

    /// Intersect with another interval, returning the empty sentinel if disjoint.
    pub fn intersect(&self, other: &Interval) -> Interval {
        if self.empty || other.empty {
            return Interval::empty();
        }
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if upper < lower {
            Interval::empty()
        } else {
            Interval::raw(lower, upper)
        }
    }

    /// Reciprocal `1 / self`.
    ///
    /// Finite only when zero lies outside the interval; otherwise unbounded.
    pub fn inverse(&self) -> Interval {
        if self.empty {
            return Interval::empty();
        }
        if self.contains(0.0) {
            return Interval::unbounded();
        }
        Interval::raw(down(1.0 / self.upper), up(1.0 / self.lower))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::unbounded()
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        if self.empty || other.empty {
            return self.empty == other.empty;
        }
        almost_eq(self.lower, other.lower) && almost_eq(self.upper, other.upper)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            write!(f, "[empty]")
        } else {
            write!(f, "[{}, {}]", self.lower, self.upper)
        }
    }
}

impl From<f64> for Interval {
    fn from(value: f64) -> Self {
        Interval::point(value)
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        if self.empty {
            return self;
        }
        Interval::raw(-self.upper, -self.lower)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        if self.empty || rhs.empty {
            return Interval::empty();
        }
        Interval::raw(down(self.lower + rhs.lower), up(self.upper + rhs.upper))
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        if self.empty || rhs.empty {
            return Interval::empty();
        }
        if self.is_exact_zero() || rhs.is_exact_zero() {
            return Interval::zero();
        }
        let corners = [
            mul_bound(self.lower, rhs.lower),
            mul_bound(self.lower, rhs.upper),
            mul_bound(self.upper, rhs.lower),
            mul_bound(self.upper, rhs.upper),
        ];
        let lower = corners.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval::raw(down(lower), up(upper))
    }
}

impl Div for Interval {
    type Output = Interval;

    fn div(self, rhs: Interval) -> Interval {
        if self.empty || rhs.empty {
            return Interval::empty();
        }
        if rhs.contains(0.0) {
            return Interval::unbounded();
        }
        self * rhs.inverse()
    }
}

impl Add<f64> for Interval {
    type Output = Interval;

    fn add(self, rhs: f64) -> Interval {
        self + Interval::point(rhs)
    }
}

impl Sub<f64> for Interval {
    type Output = Interval;

    fn sub(self, rhs: f64) -> Interval {
        self - Interval::point(rhs)
    }
}

impl Mul<f64> for Interval {
    type Output = Interval;

    fn mul(self, rhs: f64) -> Interval {
        self * Interval::point(rhs)
    }
}

impl Div<f64> for Interval {
    type Output = Interval;

    fn div(self, rhs: f64) -> Interval {
        self / Interval::point(rhs)
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        Interval::point(self) * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lower: f64, upper: f64) -> Interval {
        Interval::new(lower, upper).unwrap()
    }

    #[test]
    fn test_construction() {
        assert!(Interval::new(1.0, 2.0).is_ok());
        assert!(Interval::new(2.0, 2.0).is_ok());
        assert!(matches!(
            Interval::new(2.0, 1.0),
            Err(CvxError::InvalidInterval { .. })
        ));
        // Crossed within tolerance is accepted.
        let i = iv(1.0 + 1e-12, 1.0);
        assert!(i.lower() <= i.upper());
    }

    #[test]
    fn test_missing_bounds_are_infinite() {
        let i = Interval::from_bounds(None, Some(3.0)).unwrap();
        assert_eq!(i.lower(), f64::NEG_INFINITY);
        assert_eq!(i.upper(), 3.0);
        assert!(Interval::from_bounds(None, None).unwrap().is_unbounded());
    }

    #[test]
    fn test_sign_predicates() {
        assert!(iv(0.0, 1.0).is_nonnegative());
        assert!(!iv(0.0, 1.0).is_positive());
        assert!(iv(0.5, 1.0).is_positive());
        assert!(iv(-1.0, 0.0).is_nonpositive());
        assert!(iv(-1.0, -0.5).is_negative());
        assert!(!iv(-1.0, 1.0).is_nonnegative());
        assert!(!iv(-1.0, 1.0).is_nonpositive());
        assert!(!Interval::unbounded().is_nonnegative());
        assert!(iv(-1e-12, 1e-12).is_zero());
    }

    #[test]
    fn test_size() {
        assert!(almost_eq(iv(1.0, 4.0).size(), 3.0));
        assert_eq!(Interval::from_bounds(Some(0.0), None).unwrap().size(), f64::INFINITY);
    }

    #[test]
    fn test_add_sub() {
        let a = iv(1.0, 2.0);
        let b = iv(-3.0, 5.0);
        let s = a + b;
        assert!(s.lower() <= -2.0 && s.upper() >= 7.0);
        assert_eq!(s, iv(-2.0, 7.0));

        let d = a - b;
        assert!(d.lower() <= -4.0 && d.upper() >= 5.0);
        assert_eq!(d, iv(-4.0, 5.0));
    }

    #[test]
    fn test_mul() {
        let p = iv(-2.0, 3.0) * iv(-1.0, 4.0);
        assert_eq!(p, iv(-8.0, 12.0));
        assert!(p.lower() <= -8.0 && p.upper() >= 12.0);

        assert_eq!(iv(2.0, 3.0) * iv(-4.0, -1.0), iv(-12.0, -2.0));
        assert_eq!(iv(-3.0, -2.0) * iv(-4.0, -1.0), iv(2.0, 12.0));
    }

    #[test]
    fn test_mul_by_zero_interval() {
        let p = Interval::zero() * Interval::unbounded();
        assert!(p.is_zero());
        assert_eq!(p.lower(), 0.0);
        assert_eq!(p.upper(), 0.0);
    }

    #[test]
    fn test_mul_half_line() {
        let p = iv(0.0, 2.0) * Interval::from_bounds(Some(1.0), None).unwrap();
        assert!(p.lower() <= 0.0);
        assert_eq!(p.upper(), f64::INFINITY);
    }

    #[test]
    fn test_div() {
        let q = iv(1.0, 2.0) / iv(2.0, 4.0);
        assert_eq!(q, iv(0.25, 1.0));
        assert!(q.lower() <= 0.25 && q.upper() >= 1.0);

        assert!((iv(1.0, 2.0) / iv(-1.0, 1.0)).is_unbounded());
        assert!((iv(1.0, 2.0) / iv(0.0, 1.0)).is_unbounded());
    }

    #[test]
    fn test_inverse() {
        assert_eq!(iv(2.0, 4.0).inverse(), iv(0.25, 0.5));
        assert_eq!(iv(-4.0, -2.0).inverse(), iv(-0.5, -0.25));
        assert!(iv(-1.0, 1.0).inverse().is_unbounded());
    }

    #[test]
    fn test_containment() {
        let a = iv(0.0, 10.0);
        assert!(a.contains(5.0));
        assert!(a.contains(10.0 + 1e-12));
        assert!(!a.contains(11.0));
        assert!(a.contains_interval(&iv(1.0, 2.0)));
        assert!(!a.contains_interval(&iv(-1.0, 2.0)));
        assert!(Interval::unbounded().contains_interval(&a));
    }

    #[test]
    fn test_intersect() {
        assert_eq!(iv(0.0, 5.0).intersect(&iv(3.0, 8.0)), iv(3.0, 5.0));
        let e = iv(0.0, 1.0).intersect(&iv(2.0, 3.0));
        assert!(e.is_empty());
        assert_ne!(e, Interval::zero());
        assert_eq!(e, Interval::empty());
    }

    #[test]
    fn test_empty_absorbs_arithmetic() {
        let e = Interval::empty();
        assert!((e + iv(1.0, 2.0)).is_empty());
        assert!((iv(1.0, 2.0) * e).is_empty());
        assert!(!e.is_nonnegative());
    }
}
