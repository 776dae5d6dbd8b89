//! Randomized soundness checks for interval arithmetic.
//!
//! For random intervals and random points inside them, the exact result of
//! each operation evaluated on the points must lie inside the interval
//! computed from the operands.

use std::f64::consts::{FRAC_PI_2, PI};

use cvxbound::Interval;
use proptest::prelude::*;

/// Interval with endpoints in `[-limit, limit]`.
fn interval(limit: f64) -> impl Strategy<Value = (f64, f64)> {
    (-limit..limit, -limit..limit).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

/// Interval strictly away from zero.
fn nonzero_interval() -> impl Strategy<Value = (f64, f64)> {
    (0.01f64..100.0, 0.0f64..100.0, any::<bool>()).prop_map(|(lo, w, negative)| {
        if negative {
            (-(lo + w), -lo)
        } else {
            (lo, lo + w)
        }
    })
}

/// Point at fraction `t` of `[lower, upper]`.
fn sample(lower: f64, upper: f64, t: f64) -> f64 {
    (lower + t * (upper - lower)).clamp(lower, upper)
}

fn strictly_contains(i: &Interval, v: f64) -> bool {
    i.lower() <= v && v <= i.upper()
}

fn iv((lower, upper): (f64, f64)) -> Interval {
    Interval::new(lower, upper).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn add_is_sound(a in interval(1e6), b in interval(1e6), s in 0.0f64..=1.0, t in 0.0f64..=1.0) {
        let (x, y) = (sample(a.0, a.1, s), sample(b.0, b.1, t));
        let r = iv(a) + iv(b);
        prop_assert!(strictly_contains(&r, x + y), "{} + {} not in {}", x, y, r);
    }

    #[test]
    fn sub_is_sound(a in interval(1e6), b in interval(1e6), s in 0.0f64..=1.0, t in 0.0f64..=1.0) {
        let (x, y) = (sample(a.0, a.1, s), sample(b.0, b.1, t));
        let r = iv(a) - iv(b);
        prop_assert!(strictly_contains(&r, x - y), "{} - {} not in {}", x, y, r);
    }

    #[test]
    fn mul_is_sound(a in interval(1e3), b in interval(1e3), s in 0.0f64..=1.0, t in 0.0f64..=1.0) {
        let (x, y) = (sample(a.0, a.1, s), sample(b.0, b.1, t));
        let r = iv(a) * iv(b);
        prop_assert!(strictly_contains(&r, x * y), "{} * {} not in {}", x, y, r);
    }

    #[test]
    fn div_is_sound(a in interval(1e3), b in nonzero_interval(), s in 0.0f64..=1.0, t in 0.0f64..=1.0) {
        let (x, y) = (sample(a.0, a.1, s), sample(b.0, b.1, t));
        let r = iv(a) / iv(b);
        prop_assert!(strictly_contains(&r, x / y), "{} / {} not in {}", x, y, r);
    }

    #[test]
    fn div_by_zero_containing_is_unbounded(a in interval(1e3), b in interval(1e3)) {
        let divisor = iv(b);
        prop_assume!(divisor.lower() <= 0.0 && divisor.upper() >= 0.0);
        prop_assert!((iv(a) / divisor).is_unbounded());
    }

    #[test]
    fn sin_cos_are_sound(lo in -20.0f64..20.0, w in 0.0f64..7.0, t in 0.0f64..=1.0) {
        let i = iv((lo, lo + w));
        let x = sample(lo, lo + w, t);
        let (s, c) = (i.sin(), i.cos());
        prop_assert!(strictly_contains(&s, x.sin()), "sin({}) not in {}", x, s);
        prop_assert!(strictly_contains(&c, x.cos()), "cos({}) not in {}", x, c);
    }

    #[test]
    fn tan_is_sound_on_one_branch(
        k in -5i32..5,
        a in -FRAC_PI_2 + 0.01..FRAC_PI_2 - 0.01,
        b in -FRAC_PI_2 + 0.01..FRAC_PI_2 - 0.01,
        t in 0.0f64..=1.0,
    ) {
        let shift = k as f64 * PI;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let i = iv((lo + shift, hi + shift));
        let x = sample(i.lower(), i.upper(), t);
        let r = i.tan();
        prop_assert!(r.is_finite());
        prop_assert!(strictly_contains(&r, x.tan()), "tan({}) not in {}", x, r);
    }

    #[test]
    fn tan_with_endpoint_next_to_a_pole_is_unbounded(
        k in -5i32..5,
        offset in -5e-10f64..5e-10,
        w in 0.0f64..3.0,
        left_of_pole in any::<bool>(),
        t in 0.0f64..=1.0,
    ) {
        let pole = FRAC_PI_2 + k as f64 * PI;
        let edge = pole + offset;
        let i = if left_of_pole { iv((edge - w, edge)) } else { iv((edge, edge + w)) };
        let x = sample(i.lower(), i.upper(), t);
        let r = i.tan();
        prop_assert!(r.is_unbounded(), "tan over {} gave {}", i, r);
        prop_assert!(strictly_contains(&r, x.tan()));
    }

    #[test]
    fn exp_log_are_sound(a in interval(50.0), t in 0.0f64..=1.0) {
        let i = iv(a);
        let x = sample(a.0, a.1, t);
        let e = i.exp();
        prop_assert!(strictly_contains(&e, x.exp()), "exp({}) not in {}", x, e);

        let p = e.log();
        prop_assert!(strictly_contains(&p, x.exp().ln()), "log(exp({})) not in {}", x, p);
    }

    #[test]
    fn sqrt_and_inverses_are_sound(lo in 0.0f64..1e4, w in 0.0f64..1e4, t in 0.0f64..=1.0) {
        let i = iv((lo, lo + w));
        let x = sample(lo, lo + w, t);
        let r = i.sqrt();
        prop_assert!(strictly_contains(&r, x.sqrt()), "sqrt({}) not in {}", x, r);
        let r = i.atan();
        prop_assert!(strictly_contains(&r, x.atan()), "atan({}) not in {}", x, r);
    }

    #[test]
    fn asin_acos_are_sound(a in interval(1.0), t in 0.0f64..=1.0) {
        let i = iv(a);
        let x = sample(a.0, a.1, t);
        let r = i.asin();
        prop_assert!(strictly_contains(&r, x.asin()), "asin({}) not in {}", x, r);
        let r = i.acos();
        prop_assert!(strictly_contains(&r, x.acos()), "acos({}) not in {}", x, r);
    }

    #[test]
    fn integer_powers_are_sound(a in interval(10.0), n in -3i32..=5, t in 0.0f64..=1.0) {
        let i = iv(a);
        let x = sample(a.0, a.1, t);
        let r = i.powi(n);
        prop_assume!(x != 0.0 || n >= 0);
        prop_assert!(strictly_contains(&r, x.powi(n)), "{}^{} not in {}", x, n, r);
    }

    #[test]
    fn real_powers_are_sound(lo in 0.0f64..100.0, w in 0.0f64..100.0, p in -3.0f64..3.0, t in 0.0f64..=1.0) {
        let i = iv((lo, lo + w));
        let x = sample(lo, lo + w, t);
        prop_assume!(x > 0.0);
        // exponents within tolerance of an integer are treated as integral
        prop_assume!((p - p.round()).abs() > 1e-6);
        let r = i.powf(p);
        prop_assert!(strictly_contains(&r, x.powf(p)), "{}^{} not in {}", x, p, r);
    }

    #[test]
    fn intersection_is_contained(a in interval(100.0), b in interval(100.0)) {
        let (i, j) = (iv(a), iv(b));
        let k = i.intersect(&j);
        if !k.is_empty() {
            prop_assert!(i.contains_interval(&k));
            prop_assert!(j.contains_interval(&k));
        } else {
            prop_assert!(a.1 < b.0 || b.1 < a.0);
        }
    }
}

#[test]
fn test_product_example() {
    let r = iv((-2.0, 3.0)) * iv((-1.0, 4.0));
    assert_eq!(r, iv((-8.0, 12.0)));
}

#[test]
fn test_periodic_functions_over_a_full_period() {
    assert!(iv((0.0, 2.0 * PI)).sin().is_unbounded());
    assert!(iv((1.0, 1.0 + PI)).tan().is_unbounded());
}

#[test]
fn test_overflow_keeps_finite_results_inside() {
    let max = iv((f64::MAX, f64::MAX));
    let r = max + max;
    assert_eq!(r.lower(), f64::MAX);
    assert_eq!(r.upper(), f64::INFINITY);

    let r = -max - max;
    assert_eq!(r.lower(), f64::NEG_INFINITY);
    assert_eq!(r.upper(), -f64::MAX);

    let r = max * iv((2.0, 3.0));
    assert!(r.lower().is_finite());
    assert!(iv((1000.0, 1000.0)).exp().lower().is_finite());
}
