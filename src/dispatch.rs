//! Node kind to rule dispatch.
//!
//! A [`RuleTable`] maps every [`NodeKind`] to a [`RuleSet`] holding one bound,
//! one monotonicity and one convexity rule. The standard table is built from
//! an exhaustive match, so adding a node kind without rules does not compile.
//! Custom tables may register, replace or remove entries; looking up a kind
//! with no entry is an error, never a silent `Unknown`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::context::Context;
use crate::error::{CvxError, Result};
use crate::expr::{Expr, NodeKind};
use crate::interval::Interval;
use crate::properties::{Convexity, Monotonicity};
use crate::rules::{bounds, convexity, monotonicity};

/// Rule computing a node's bound.
pub type BoundRule = fn(&Expr, &Context) -> Result<Interval>;

/// Rule computing a node's convexity.
pub type ConvexityRule = fn(&Expr, &Context) -> Result<Convexity>;

/// Rule computing a node's monotonicity.
pub type MonotonicityRule = fn(&Expr, &Context) -> Result<Monotonicity>;

/// The three rules for one node kind.
#[derive(Clone, Copy)]
pub struct RuleSet {
    pub bound: BoundRule,
    pub monotonicity: MonotonicityRule,
    pub convexity: ConvexityRule,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").finish_non_exhaustive()
    }
}

impl RuleSet {
    /// Built-in rules for `kind`.
    pub fn standard(kind: NodeKind) -> Self {
        macro_rules! rules {
            ($b:path, $m:path, $c:path) => {
                RuleSet {
                    bound: $b,
                    monotonicity: $m,
                    convexity: $c,
                }
            };
        }
        match kind {
            NodeKind::Constant => rules!(
                bounds::constant_bound,
                monotonicity::constant_monotonicity,
                convexity::constant_convexity
            ),
            NodeKind::Variable => rules!(
                bounds::variable_bound,
                monotonicity::variable_monotonicity,
                convexity::variable_convexity
            ),
            NodeKind::Sum => rules!(
                bounds::sum_bound,
                monotonicity::sum_monotonicity,
                convexity::sum_convexity
            ),
            NodeKind::Linear => rules!(
                bounds::linear_bound,
                monotonicity::linear_monotonicity,
                convexity::linear_convexity
            ),
            NodeKind::Product => rules!(
                bounds::product_bound,
                monotonicity::product_monotonicity,
                convexity::product_convexity
            ),
            NodeKind::Monomial => rules!(
                bounds::monomial_bound,
                monotonicity::monomial_monotonicity,
                convexity::monomial_convexity
            ),
            NodeKind::Division => rules!(
                bounds::division_bound,
                monotonicity::division_monotonicity,
                convexity::division_convexity
            ),
            NodeKind::Reciprocal => rules!(
                bounds::reciprocal_bound,
                monotonicity::reciprocal_monotonicity,
                convexity::reciprocal_convexity
            ),
            NodeKind::Power => rules!(
                bounds::power_bound,
                monotonicity::power_monotonicity,
                convexity::power_convexity
            ),
            NodeKind::Negation => rules!(
                bounds::negation_bound,
                monotonicity::negation_monotonicity,
                convexity::negation_convexity
            ),
            NodeKind::Abs => rules!(
                bounds::abs_bound,
                monotonicity::abs_monotonicity,
                convexity::abs_convexity
            ),
            NodeKind::Quadratic => rules!(
                bounds::quadratic_bound,
                monotonicity::quadratic_monotonicity,
                convexity::quadratic_convexity
            ),
            NodeKind::UnaryFunction => rules!(
                bounds::unary_function_bound,
                monotonicity::unary_function_monotonicity,
                convexity::unary_function_convexity
            ),
            NodeKind::Constraint => rules!(
                bounds::constraint_bound,
                monotonicity::constraint_monotonicity,
                convexity::constraint_convexity
            ),
            NodeKind::Objective => rules!(
                bounds::objective_bound,
                monotonicity::objective_monotonicity,
                convexity::objective_convexity
            ),
        }
    }
}

/// Mapping from node kind to its rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<NodeKind, RuleSet>,
}

impl RuleTable {
    /// A table with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh table with the built-in rules for every node kind.
    pub fn standard() -> Self {
        let rules = NodeKind::ALL
            .iter()
            .map(|&kind| (kind, RuleSet::standard(kind)))
            .collect();
        RuleTable { rules }
    }

    /// The shared built-in table, built once on first use.
    pub fn shared() -> Arc<RuleTable> {
        static STANDARD: OnceLock<Arc<RuleTable>> = OnceLock::new();
        STANDARD
            .get_or_init(|| Arc::new(RuleTable::standard()))
            .clone()
    }

    /// Register rules for `kind`, returning the rules they replace.
    pub fn register(&mut self, kind: NodeKind, rules: RuleSet) -> Option<RuleSet> {
        debug!("registering rules for {:?}", kind);
        self.rules.insert(kind, rules)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, kind: NodeKind, rules: RuleSet) -> Self {
        self.register(kind, rules);
        self
    }

    /// Remove the rules for `kind`.
    pub fn remove(&mut self, kind: NodeKind) -> Option<RuleSet> {
        self.rules.remove(&kind)
    }

    /// Rules for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CvxError::UnregisteredKind`] if no rules are registered.
    pub fn get(&self, kind: NodeKind) -> Result<&RuleSet> {
        self.rules.get(&kind).ok_or(CvxError::UnregisteredKind(kind))
    }

    /// Node kinds with no registered rules.
    pub fn missing(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.rules.contains_key(kind))
            .collect()
    }

    /// Check that every node kind has rules.
    pub fn verify_complete(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CvxError::IncompleteRuleTable(missing))
        }
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
