//! Constant expression creation.

use super::expression::{Expr, ExprKind};

/// Create a constant expression from a scalar.
pub fn constant(value: f64) -> Expr {
    Expr::new(ExprKind::Constant(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_value() {
        let c = constant(5.0);
        assert!(c.is_constant());
        assert_eq!(c.value(), Some(5.0));
    }

    #[test]
    fn test_constants_are_distinct_nodes() {
        assert_ne!(constant(0.0).id(), constant(0.0).id());
    }
}
