//! Curvature classes.
//!
//! `Convexity` only answers predicate queries. How curvatures combine depends
//! on the operator, so composition lives in [`rules::convexity`](crate::rules::convexity).

use std::fmt;

/// Curvature of an expression over its argument's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convexity {
    /// Affine: both convex and concave.
    Linear,
    /// Convex function.
    Convex,
    /// Concave function.
    Concave,
    /// Nothing could be proven.
    Unknown,
}

impl Convexity {
    /// Check if the curvature is linear.
    pub fn is_linear(self) -> bool {
        matches!(self, Convexity::Linear)
    }

    /// Check if the curvature is convex (linear or convex).
    pub fn is_convex(self) -> bool {
        matches!(self, Convexity::Linear | Convexity::Convex)
    }

    /// Check if the curvature is concave (linear or concave).
    pub fn is_concave(self) -> bool {
        matches!(self, Convexity::Linear | Convexity::Concave)
    }

    /// Check if nothing is known.
    pub fn is_unknown(self) -> bool {
        matches!(self, Convexity::Unknown)
    }
}

impl fmt::Display for Convexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Convexity::Linear => "linear",
            Convexity::Convex => "convex",
            Convexity::Concave => "concave",
            Convexity::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convexity_predicates() {
        assert!(Convexity::Linear.is_linear());
        assert!(Convexity::Linear.is_convex());
        assert!(Convexity::Linear.is_concave());

        assert!(Convexity::Convex.is_convex());
        assert!(!Convexity::Convex.is_concave());
        assert!(!Convexity::Convex.is_linear());

        assert!(!Convexity::Concave.is_convex());
        assert!(Convexity::Concave.is_concave());

        assert!(!Convexity::Unknown.is_convex());
        assert!(!Convexity::Unknown.is_concave());
        assert!(Convexity::Unknown.is_unknown());
    }
}
