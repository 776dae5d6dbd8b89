//! Monotonicity classes.

use std::fmt;

/// Monotonicity of an expression over its argument's bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Monotonicity {
    /// Constant, with its value when known.
    Constant(Option<f64>),
    /// Nondecreasing.
    Nondecreasing,
    /// Nonincreasing.
    Nonincreasing,
    /// Nothing could be proven.
    Unknown,
}

impl Monotonicity {
    /// Check if the expression is constant.
    pub fn is_constant(self) -> bool {
        matches!(self, Monotonicity::Constant(_))
    }

    /// Check if the expression is nondecreasing (or constant).
    pub fn is_nondecreasing(self) -> bool {
        matches!(self, Monotonicity::Constant(_) | Monotonicity::Nondecreasing)
    }

    /// Check if the expression is nonincreasing (or constant).
    pub fn is_nonincreasing(self) -> bool {
        matches!(self, Monotonicity::Constant(_) | Monotonicity::Nonincreasing)
    }

    /// Check if nothing is known.
    pub fn is_unknown(self) -> bool {
        matches!(self, Monotonicity::Unknown)
    }

    /// The constant value, if this is a constant with a known value.
    pub fn value(self) -> Option<f64> {
        match self {
            Monotonicity::Constant(v) => v,
            _ => None,
        }
    }
}

impl fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Monotonicity::Constant(Some(v)) => write!(f, "constant({})", v),
            Monotonicity::Constant(None) => f.write_str("constant"),
            Monotonicity::Nondecreasing => f.write_str("nondecreasing"),
            Monotonicity::Nonincreasing => f.write_str("nonincreasing"),
            Monotonicity::Unknown => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonicity_predicates() {
        let c = Monotonicity::Constant(Some(2.0));
        assert!(c.is_constant());
        assert!(c.is_nondecreasing());
        assert!(c.is_nonincreasing());
        assert_eq!(c.value(), Some(2.0));
        assert_eq!(Monotonicity::Constant(None).value(), None);

        assert!(Monotonicity::Nondecreasing.is_nondecreasing());
        assert!(!Monotonicity::Nondecreasing.is_nonincreasing());
        assert!(Monotonicity::Nonincreasing.is_nonincreasing());
        assert!(!Monotonicity::Nonincreasing.is_constant());

        assert!(Monotonicity::Unknown.is_unknown());
        assert!(!Monotonicity::Unknown.is_nondecreasing());
        assert_eq!(Monotonicity::Nondecreasing.value(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Monotonicity::Constant(Some(1.5)).to_string(), "constant(1.5)");
        assert_eq!(Monotonicity::Nonincreasing.to_string(), "nonincreasing");
    }
}
