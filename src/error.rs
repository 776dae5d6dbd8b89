//! Error types for cvxbound.

use thiserror::Error;

use crate::expr::{ExprId, NodeKind};

/// Error type for cvxbound operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CvxError {
    /// Interval constructed with `lower > upper`.
    #[error("Invalid interval: lower bound {lower} exceeds upper bound {upper}")]
    InvalidInterval { lower: f64, upper: f64 },

    /// No rules are registered for a node kind.
    #[error("No rules registered for node kind {0:?}")]
    UnregisteredKind(NodeKind),

    /// A rule table is missing rules for some node kinds.
    #[error("Rule table is missing node kinds: {0:?}")]
    IncompleteRuleTable(Vec<NodeKind>),

    /// A rule read a context entry that was never set.
    #[error("Unresolved {property} for expression {id}")]
    Unresolved { id: ExprId, property: &'static str },

    /// Malformed expression (wrong arity, bad constant).
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
}

/// Result type for cvxbound operations.
pub type Result<T> = std::result::Result<T, CvxError>;
