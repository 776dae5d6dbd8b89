//! Elementary and periodic functions over intervals.
//!
//! Monotone functions are applied endpoint-wise through [`monotone`], which is
//! told explicitly whether the function is increasing or decreasing. Each
//! function knows its inverse through [`INVERSE_PAIRS`], so the bound of an
//! inverse is obtained by applying the paired function rather than by a
//! separate formula.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::bound::Interval;
use super::round::{
    almost_eq, almost_gte, almost_lte, down_by, is_almost_integer, up_by, TRANSCENDENTAL_ULPS,
};

/// Direction of a monotone function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `x <= y` implies `f(x) <= f(y)`.
    Increasing,
    /// `x <= y` implies `f(x) >= f(y)`.
    Decreasing,
}

/// Functions with an interval extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementaryFunction {
    Sqrt,
    Sqr,
    Exp,
    Log,
    Sin,
    Asin,
    Cos,
    Acos,
    Tan,
    Atan,
}

/// Function / inverse pairs. Lookup is symmetric.
pub const INVERSE_PAIRS: [(ElementaryFunction, ElementaryFunction); 5] = [
    (ElementaryFunction::Sqrt, ElementaryFunction::Sqr),
    (ElementaryFunction::Exp, ElementaryFunction::Log),
    (ElementaryFunction::Sin, ElementaryFunction::Asin),
    (ElementaryFunction::Cos, ElementaryFunction::Acos),
    (ElementaryFunction::Tan, ElementaryFunction::Atan),
];

impl ElementaryFunction {
    /// The mathematical inverse of this function.
    pub fn inverse(self) -> ElementaryFunction {
        INVERSE_PAIRS
            .iter()
            .find_map(|&(f, g)| {
                if f == self {
                    Some(g)
                } else if g == self {
                    Some(f)
                } else {
                    None
                }
            })
            .unwrap_or(self)
    }

    /// Bound of this function over `x`.
    pub fn apply(self, x: &Interval) -> Interval {
        match self {
            ElementaryFunction::Sqrt => x.sqrt(),
            ElementaryFunction::Sqr => x.sqr(),
            ElementaryFunction::Exp => x.exp(),
            ElementaryFunction::Log => x.log(),
            ElementaryFunction::Sin => x.sin(),
            ElementaryFunction::Asin => x.asin(),
            ElementaryFunction::Cos => x.cos(),
            ElementaryFunction::Acos => x.acos(),
            ElementaryFunction::Tan => x.tan(),
            ElementaryFunction::Atan => x.atan(),
        }
    }

    /// Bound of the inverse of this function over `x`.
    pub fn apply_inverse(self, x: &Interval) -> Interval {
        self.inverse().apply(x)
    }
}

/// Apply a monotone function endpoint-wise with outward rounding.
///
/// `ulps` is the widening applied to each result; use 1 for correctly rounded
/// operations and [`TRANSCENDENTAL_ULPS`] for library functions.
pub fn monotone<F>(x: &Interval, f: F, direction: Direction, ulps: u32) -> Interval
where
    F: Fn(f64) -> f64,
{
    if x.is_empty() {
        return Interval::empty();
    }
    let (a, b) = match direction {
        Direction::Increasing => (x.lower(), x.upper()),
        Direction::Decreasing => (x.upper(), x.lower()),
    };
    Interval::raw(down_by(f(a), ulps), up_by(f(b), ulps))
}

/// Restrict `x` to a function's domain; `None` when nothing is left.
fn restrict(x: &Interval, domain: Interval) -> Option<Interval> {
    let r = x.intersect(&domain);
    if r.is_empty() {
        None
    } else {
        Some(r)
    }
}

impl Interval {
    /// Apply an elementary function.
    pub fn apply(&self, f: ElementaryFunction) -> Interval {
        f.apply(self)
    }

    /// Bound of `sqrt(x)` over the nonnegative part of `x`.
    pub fn sqrt(&self) -> Interval {
        match restrict(self, Interval::raw(0.0, f64::INFINITY)) {
            Some(x) => {
                let r = monotone(&x, f64::sqrt, Direction::Increasing, 1);
                Interval::raw(r.lower().max(0.0), r.upper())
            }
            None => Interval::unbounded(),
        }
    }

    /// Bound of `x^2`.
    pub fn sqr(&self) -> Interval {
        self.powi(2)
    }

    /// Bound of `exp(x)`.
    pub fn exp(&self) -> Interval {
        let r = monotone(self, f64::exp, Direction::Increasing, TRANSCENDENTAL_ULPS);
        Interval::raw(r.lower().max(0.0), r.upper())
    }

    /// Bound of `ln(x)` over the nonnegative part of `x`.
    pub fn log(&self) -> Interval {
        match restrict(self, Interval::raw(0.0, f64::INFINITY)) {
            Some(x) => monotone(&x, f64::ln, Direction::Increasing, TRANSCENDENTAL_ULPS),
            None => Interval::unbounded(),
        }
    }

    /// Bound of `log10(x)` over the nonnegative part of `x`.
    pub fn log10(&self) -> Interval {
        match restrict(self, Interval::raw(0.0, f64::INFINITY)) {
            Some(x) => monotone(&x, f64::log10, Direction::Increasing, TRANSCENDENTAL_ULPS),
            None => Interval::unbounded(),
        }
    }

    /// Bound of `asin(x)` over `x ∩ [-1, 1]`.
    pub fn asin(&self) -> Interval {
        match restrict(self, Interval::raw(-1.0, 1.0)) {
            Some(x) => monotone(&x, f64::asin, Direction::Increasing, TRANSCENDENTAL_ULPS),
            None => Interval::unbounded(),
        }
    }

    /// Bound of `acos(x)` over `x ∩ [-1, 1]`.
    pub fn acos(&self) -> Interval {
        match restrict(self, Interval::raw(-1.0, 1.0)) {
            Some(x) => {
                let r = monotone(&x, f64::acos, Direction::Decreasing, TRANSCENDENTAL_ULPS);
                Interval::raw(r.lower().max(0.0), r.upper())
            }
            None => Interval::unbounded(),
        }
    }

    /// Bound of `atan(x)`.
    pub fn atan(&self) -> Interval {
        monotone(self, f64::atan, Direction::Increasing, TRANSCENDENTAL_ULPS)
    }

    /// Bound of `|x|`.
    pub fn abs(&self) -> Interval {
        if self.is_empty() {
            return *self;
        }
        if self.lower() >= 0.0 {
            *self
        } else if self.upper() <= 0.0 {
            -*self
        } else {
            Interval::raw(0.0, self.upper().max(-self.lower()))
        }
    }

    /// Bound of `sin(x)`.
    ///
    /// Unbounded when the width reaches one period. Otherwise the argument is
    /// reduced to start in `[0, 2pi)` and clamped to `1` / `-1` when it covers
    /// a maximum (`pi/2 + 2k pi`) or a minimum (`3pi/2 + 2k pi`).
    pub fn sin(&self) -> Interval {
        self.periodic_extremes(f64::sin, FRAC_PI_2, 3.0 * FRAC_PI_2)
    }

    /// Bound of `cos(x)`.
    ///
    /// Same reduction as [`Interval::sin`], with the maximum at `0` and the
    /// minimum at `pi`.
    pub fn cos(&self) -> Interval {
        self.periodic_extremes(f64::cos, 0.0, PI)
    }

    fn periodic_extremes(&self, f: fn(f64) -> f64, max_at: f64, min_at: f64) -> Interval {
        if self.is_empty() {
            return *self;
        }
        if almost_gte(self.size(), TAU) {
            return Interval::unbounded();
        }
        let width = self.upper() - self.lower();
        let start = self.lower().rem_euclid(TAU);
        let end = start + width;

        let fl = f(self.lower());
        let fu = f(self.upper());
        let mut lower = down_by(fl.min(fu), TRANSCENDENTAL_ULPS);
        let mut upper = up_by(fl.max(fu), TRANSCENDENTAL_ULPS);

        let covers = |point: f64| {
            [point, point + TAU]
                .iter()
                .any(|&p| almost_lte(start, p) && almost_lte(p, end))
        };
        if covers(max_at) {
            upper = 1.0;
        }
        if covers(min_at) {
            lower = -1.0;
        }
        Interval::raw(lower.max(-1.0), upper.min(1.0))
    }

    /// Bound of `tan(x)`.
    ///
    /// Unbounded when the width reaches one period (`pi`) or when a
    /// singularity (`pi/2 + k pi`) lies inside the interval or within
    /// tolerance of either endpoint. An endpoint that close to a pole may sit
    /// on either side of it, so no finite side can be kept.
    pub fn tan(&self) -> Interval {
        if self.is_empty() {
            return *self;
        }
        if almost_gte(self.size(), PI) {
            return Interval::unbounded();
        }
        let start = self.lower().rem_euclid(PI);
        let end = start + (self.upper() - self.lower());

        let singularities = [FRAC_PI_2, FRAC_PI_2 + PI];
        let touches = |s: f64| almost_lte(start, s) && almost_gte(end, s);
        if singularities.iter().any(|&s| touches(s)) {
            return Interval::unbounded();
        }
        Interval::raw(
            down_by(self.lower().tan(), TRANSCENDENTAL_ULPS),
            up_by(self.upper().tan(), TRANSCENDENTAL_ULPS),
        )
    }

    /// Bound of `x^n` for an integer exponent.
    ///
    /// Negative exponents are the reciprocal of the positive power, unbounded
    /// when `x` contains zero.
    pub fn powi(&self, n: i32) -> Interval {
        if self.is_empty() {
            return *self;
        }
        if n == 0 {
            return Interval::point(1.0);
        }
        if n < 0 {
            return match n.checked_neg() {
                Some(m) => self.powi(m).inverse(),
                None => Interval::unbounded(),
            };
        }
        if n == 1 {
            return *self;
        }
        // powi multiplies by repeated squaring; each step may round.
        let ulps = if n == 2 {
            1
        } else {
            TRANSCENDENTAL_ULPS.max(2 * (u32::BITS - n.leading_zeros()))
        };
        let pow = |v: f64| v.powi(n);
        if n % 2 == 1 {
            return monotone(self, pow, Direction::Increasing, ulps);
        }
        if self.lower() >= 0.0 {
            monotone(self, pow, Direction::Increasing, ulps)
        } else if self.upper() <= 0.0 {
            monotone(self, pow, Direction::Decreasing, ulps)
        } else {
            let high = pow(self.lower()).max(pow(self.upper()));
            Interval::raw(0.0, up_by(high, ulps))
        }
    }

    /// Bound of `x^p` for a real exponent.
    ///
    /// Integral exponents go through [`Interval::powi`]. Non-integral
    /// exponents are only defined for `x >= 0`; the negative part of `x` is
    /// discarded and an empty remainder is unbounded.
    pub fn powf(&self, p: f64) -> Interval {
        if self.is_empty() {
            return *self;
        }
        if !p.is_finite() {
            return Interval::unbounded();
        }
        if is_almost_integer(p) && p.abs() <= i32::MAX as f64 {
            return self.powi(p.round() as i32);
        }
        let Some(x) = restrict(self, Interval::raw(0.0, f64::INFINITY)) else {
            return Interval::unbounded();
        };
        let f = |v: f64| v.powf(p);
        let r = if p > 0.0 {
            monotone(&x, f, Direction::Increasing, TRANSCENDENTAL_ULPS)
        } else if x.lower() > 0.0 {
            monotone(&x, f, Direction::Decreasing, TRANSCENDENTAL_ULPS)
        } else if x.upper() > 0.0 {
            Interval::raw(down_by(f(x.upper()), TRANSCENDENTAL_ULPS), f64::INFINITY)
        } else {
            return Interval::unbounded();
        };
        Interval::raw(r.lower().max(0.0), r.upper())
    }

    /// Bound of `base^x` for a positive constant base.
    pub fn exp_base(&self, base: f64) -> Interval {
        if base.is_nan() || base <= 0.0 {
            return Interval::unbounded();
        }
        if almost_eq(base, 1.0) {
            return Interval::point(1.0);
        }
        let ln = base.ln();
        let ln = Interval::raw(
            down_by(ln, TRANSCENDENTAL_ULPS),
            up_by(ln, TRANSCENDENTAL_ULPS),
        );
        (*self * ln).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lower: f64, upper: f64) -> Interval {
        Interval::new(lower, upper).unwrap()
    }

    fn encloses(outer: &Interval, lower: f64, upper: f64) -> bool {
        outer.lower() <= lower && upper <= outer.upper()
    }

    #[test]
    fn test_inverse_pairs_are_symmetric() {
        use ElementaryFunction::*;
        for &(f, g) in INVERSE_PAIRS.iter() {
            assert_eq!(f.inverse(), g);
            assert_eq!(g.inverse(), f);
        }
        assert_eq!(Sqrt.inverse(), Sqr);
        assert_eq!(Acos.inverse(), Cos);
    }

    #[test]
    fn test_apply_inverse() {
        let x = iv(1.0, std::f64::consts::E);
        let r = ElementaryFunction::Exp.apply_inverse(&x);
        assert_eq!(r, iv(0.0, 1.0));

        let y = iv(0.0, 4.0);
        assert_eq!(ElementaryFunction::Sqr.apply_inverse(&y), iv(0.0, 2.0));
        assert_eq!(y.apply(ElementaryFunction::Sqrt), iv(0.0, 2.0));
    }

    #[test]
    fn test_monotone_direction() {
        let x = iv(1.0, 2.0);
        let inc = monotone(&x, |v| 3.0 * v, Direction::Increasing, 1);
        assert!(encloses(&inc, 3.0, 6.0));
        let dec = monotone(&x, |v| -v, Direction::Decreasing, 1);
        assert!(encloses(&dec, -2.0, -1.0));
        assert_eq!(dec, iv(-2.0, -1.0));
    }

    #[test]
    fn test_sqrt_log_exp() {
        assert_eq!(iv(-1.0, 4.0).sqrt(), iv(0.0, 2.0));
        assert!(iv(-2.0, -1.0).sqrt().is_unbounded());
        assert_eq!(iv(1.0, std::f64::consts::E).log(), iv(0.0, 1.0));
        assert_eq!(iv(0.0, 1.0).log().lower(), f64::NEG_INFINITY);
        assert_eq!(iv(1.0, 100.0).log10(), iv(0.0, 2.0));
        let e = iv(0.0, 1.0).exp();
        assert!(encloses(&e, 1.0, std::f64::consts::E));
    }

    #[test]
    fn test_inverse_trig() {
        let a = iv(-1.0, 1.0).acos();
        assert!(encloses(&a, 0.0, PI));
        let s = iv(-2.0, 0.0).asin();
        assert!(encloses(&s, -FRAC_PI_2, 0.0));
        assert_eq!(iv(0.0, 1.0).atan(), iv(0.0, 1.0_f64.atan()));
    }

    #[test]
    fn test_sin_full_period_is_unbounded() {
        assert!(iv(0.0, TAU).sin().is_unbounded());
        assert!(iv(-10.0, 10.0).sin().is_unbounded());
        assert!(iv(0.0, TAU).cos().is_unbounded());
    }

    #[test]
    fn test_sin_critical_points() {
        let s = iv(0.0, PI).sin();
        assert_eq!(s.upper(), 1.0);
        assert!(almost_eq(s.lower(), 0.0));
        assert!(s.lower() <= 0.0);

        let s = iv(PI, TAU - 0.1).sin();
        assert_eq!(s.lower(), -1.0);

        // Shifted by several periods.
        let s = iv(1.0 + 6.0 * PI, 2.0 + 6.0 * PI).sin();
        assert_eq!(s.upper(), 1.0);

        // Monotone piece without critical points.
        let s = iv(0.1, 0.2).sin();
        assert!(encloses(&s, 0.1_f64.sin(), 0.2_f64.sin()));
        assert!(s.upper() < 1.0);
    }

    #[test]
    fn test_sin_wraps_past_two_pi() {
        // [5.5, 8.5] reduces to an interval crossing 2pi and 5pi/2.
        let s = iv(5.5, 8.5).sin();
        assert_eq!(s.upper(), 1.0);
        assert!(s.lower() <= 5.5_f64.sin());
    }

    #[test]
    fn test_cos() {
        let c = iv(0.0, PI / 4.0).cos();
        assert_eq!(c.upper(), 1.0);
        assert!(encloses(&c, (PI / 4.0).cos(), 1.0));
        assert!(c.is_positive());

        let c = iv(3.0, 4.0).cos();
        assert_eq!(c.lower(), -1.0);

        let c = iv(-0.5, 0.5).cos();
        assert_eq!(c.upper(), 1.0);
    }

    #[test]
    fn test_tan() {
        assert!(iv(0.0, PI).tan().is_unbounded());
        assert!(iv(1.0, 2.0).tan().is_unbounded());

        let t = iv(0.0, 1.0).tan();
        assert!(encloses(&t, 0.0, 1.0_f64.tan()));
        assert!(t.is_finite());

        // endpoints on or next to a pole
        assert!(iv(FRAC_PI_2, 2.0).tan().is_unbounded());
        assert!(iv(1.0, FRAC_PI_2).tan().is_unbounded());
        assert!(iv(FRAC_PI_2 - 1e-10, 2.0).tan().is_unbounded());
        assert!(iv(1.0, FRAC_PI_2 + 1e-10).tan().is_unbounded());
        assert!(iv(FRAC_PI_2 + PI - 1e-10, 5.0).tan().is_unbounded());

        let t = iv(FRAC_PI_2 + 1e-3, 2.0).tan();
        assert!(t.is_finite());
        assert!(encloses(&t, (FRAC_PI_2 + 1e-3).tan(), 2.0_f64.tan()));
    }

    #[test]
    fn test_powi() {
        assert_eq!(iv(-2.0, 3.0).powi(2), iv(0.0, 9.0));
        assert_eq!(iv(-3.0, -2.0).sqr(), iv(4.0, 9.0));
        assert_eq!(iv(-2.0, -1.0).powi(3), iv(-8.0, -1.0));
        assert_eq!(iv(2.0, 4.0).powi(-1), iv(0.25, 0.5));
        assert!(iv(-1.0, 1.0).powi(-2).is_unbounded());
        assert_eq!(iv(-5.0, 5.0).powi(0), iv(1.0, 1.0));
    }

    #[test]
    fn test_powf() {
        assert_eq!(iv(0.0, 4.0).powf(0.5), iv(0.0, 2.0));
        assert_eq!(iv(1.0, 4.0).powf(-0.5), iv(0.5, 1.0));
        let r = iv(0.0, 4.0).powf(-0.5);
        assert!(almost_eq(r.lower(), 0.5));
        assert_eq!(r.upper(), f64::INFINITY);
        assert!(iv(-4.0, -1.0).powf(0.5).is_unbounded());
        assert_eq!(iv(-2.0, 3.0).powf(2.0), iv(0.0, 9.0));
    }

    #[test]
    fn test_exp_base() {
        assert_eq!(iv(0.0, 1.0).exp_base(2.0), iv(1.0, 2.0));
        assert_eq!(iv(0.0, 1.0).exp_base(0.5), iv(0.5, 1.0));
        assert!(iv(0.0, 1.0).exp_base(-2.0).is_unbounded());
        // base one within tolerance
        assert_eq!(iv(0.0, 5.0).exp_base(1.0 + 1e-12), iv(1.0, 1.0));
    }
}
