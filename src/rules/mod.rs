//! Per-node-kind propagation rules.
//!
//! Every rule has the shape `(node, context) -> property` and reads only the
//! entries of the node's children (and, for monotonicity and convexity, the
//! node's own bound). Rules are plain functions so that a [`RuleTable`]
//! can store them by node kind.
//!
//! [`RuleTable`]: crate::dispatch::RuleTable

pub mod bounds;
pub mod convexity;
pub mod monotonicity;

use crate::context::Context;
use crate::error::{CvxError, Result};
use crate::expr::{Expr, NodeKind};

/// Error for a rule applied to a node of the wrong kind.
pub(crate) fn unexpected(expr: &Expr, expected: NodeKind) -> CvxError {
    CvxError::InvalidExpression(format!(
        "{:?} rule applied to {:?} node {}",
        expected,
        expr.node_kind(),
        expr.id()
    ))
}

/// The value of `expr` if it is known to be a constant.
pub(crate) fn constant_value(ctx: &Context, expr: &Expr) -> Result<Option<f64>> {
    Ok(ctx.monotonicity(expr)?.value())
}
