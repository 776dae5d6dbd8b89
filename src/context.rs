//! Per-analysis state.
//!
//! A `Context` holds three mappings from node identity to bound, convexity
//! and monotonicity. Each entry is written once during a traversal and read
//! any number of times afterwards; writing an entry twice is a bug in the
//! caller and panics.

use std::collections::HashMap;

use crate::error::{CvxError, Result};
use crate::expr::{Expr, ExprId};
use crate::interval::Interval;
use crate::properties::{Convexity, Monotonicity};

/// Bounds, convexity and monotonicity computed for each visited node.
#[derive(Debug, Clone, Default)]
pub struct Context {
    bounds: HashMap<ExprId, Interval>,
    convexity: HashMap<ExprId, Convexity>,
    monotonicity: HashMap<ExprId, Monotonicity>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound of `expr`.
    pub fn bound(&self, expr: &Expr) -> Result<Interval> {
        self.bound_by_id(expr.id())
    }

    /// Convexity of `expr`.
    pub fn convexity(&self, expr: &Expr) -> Result<Convexity> {
        self.convexity_by_id(expr.id())
    }

    /// Monotonicity of `expr`.
    pub fn monotonicity(&self, expr: &Expr) -> Result<Monotonicity> {
        self.monotonicity_by_id(expr.id())
    }

    /// Bound of the node with identity `id`.
    pub fn bound_by_id(&self, id: ExprId) -> Result<Interval> {
        self.bounds.get(&id).copied().ok_or(CvxError::Unresolved {
            id,
            property: "bound",
        })
    }

    /// Convexity of the node with identity `id`.
    pub fn convexity_by_id(&self, id: ExprId) -> Result<Convexity> {
        self.convexity.get(&id).copied().ok_or(CvxError::Unresolved {
            id,
            property: "convexity",
        })
    }

    /// Monotonicity of the node with identity `id`.
    pub fn monotonicity_by_id(&self, id: ExprId) -> Result<Monotonicity> {
        self.monotonicity.get(&id).copied().ok_or(CvxError::Unresolved {
            id,
            property: "monotonicity",
        })
    }

    /// Set the bound of `expr`.
    ///
    /// # Panics
    ///
    /// Panics if the bound was already set.
    pub fn set_bound(&mut self, expr: &Expr, bound: Interval) {
        let previous = self.bounds.insert(expr.id(), bound);
        assert!(previous.is_none(), "bound of {} set twice", expr.id());
    }

    /// Set the convexity of `expr`.
    ///
    /// # Panics
    ///
    /// Panics if the convexity was already set.
    pub fn set_convexity(&mut self, expr: &Expr, convexity: Convexity) {
        let previous = self.convexity.insert(expr.id(), convexity);
        assert!(previous.is_none(), "convexity of {} set twice", expr.id());
    }

    /// Set the monotonicity of `expr`.
    ///
    /// # Panics
    ///
    /// Panics if the monotonicity was already set.
    pub fn set_monotonicity(&mut self, expr: &Expr, monotonicity: Monotonicity) {
        let previous = self.monotonicity.insert(expr.id(), monotonicity);
        assert!(previous.is_none(), "monotonicity of {} set twice", expr.id());
    }

    /// Drop every entry of the node with identity `id`.
    pub(crate) fn discard(&mut self, id: ExprId) {
        self.bounds.remove(&id);
        self.convexity.remove(&id);
        self.monotonicity.remove(&id);
    }

    /// Check whether all three properties of `expr` are resolved.
    pub fn is_resolved(&self, expr: &Expr) -> bool {
        let id = expr.id();
        self.bounds.contains_key(&id)
            && self.convexity.contains_key(&id)
            && self.monotonicity.contains_key(&id)
    }

    /// Number of nodes with a resolved bound.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Check if nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}
