//! Bottom-up analysis of expression trees.
//!
//! The [`Analyzer`] walks an expression in post-order with an explicit stack,
//! so deep trees do not exhaust the call stack. For every node it runs the
//! bound, monotonicity and convexity rules of the node's kind, in that order,
//! and records the results in a [`Context`]. Nodes shared by several parents
//! are resolved once.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::context::Context;
use crate::dispatch::{RuleSet, RuleTable};
use crate::error::Result;
use crate::expr::{Expr, ExprId, NodeKind};
use crate::interval::Interval;
use crate::properties::{Convexity, Monotonicity};

/// Analysis settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Trace every rule result.
    pub verbose: bool,
    /// Bounds known from elsewhere, intersected with the computed bounds.
    pub bounds: HashMap<ExprId, Interval>,
}

impl Settings {
    /// Enable or disable per-rule tracing.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Supply a known bound for `expr`.
    pub fn with_bound(mut self, expr: &Expr, bound: Interval) -> Self {
        self.bounds.insert(expr.id(), bound);
        self
    }
}

/// Computes bounds, monotonicity and convexity for expression trees.
#[derive(Debug, Clone)]
pub struct Analyzer {
    rules: Arc<RuleTable>,
    settings: Settings,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create an analyzer with the built-in rules and default settings.
    pub fn new() -> Self {
        Analyzer {
            rules: RuleTable::shared(),
            settings: Settings::default(),
        }
    }

    /// Create an analyzer with a custom rule table.
    ///
    /// The table need not be complete; encountering a node kind without
    /// rules fails the analysis.
    pub fn with_rules(rules: RuleTable) -> Self {
        Analyzer {
            rules: Arc::new(rules),
            settings: Settings::default(),
        }
    }

    /// Set the analysis settings.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// The rule table in use.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Analyze `root` and every node below it.
    ///
    /// # Errors
    ///
    /// Returns an error if a node kind has no rules, a variable has crossed
    /// bounds, or a rule reads an unresolved entry.
    pub fn analyze(&self, root: &Expr) -> Result<Context> {
        let mut ctx = Context::new();
        self.analyze_into(root, &mut ctx)?;
        Ok(ctx)
    }

    /// Analyze several roots (e.g. an objective and its constraints) into one
    /// context, sharing the results for common subexpressions.
    pub fn analyze_all<'a>(&self, roots: impl IntoIterator<Item = &'a Expr>) -> Result<Context> {
        let mut ctx = Context::new();
        for root in roots {
            self.analyze_into(root, &mut ctx)?;
        }
        Ok(ctx)
    }

    /// Analyze `root` into an existing context, skipping resolved nodes.
    pub fn analyze_into(&self, root: &Expr, ctx: &mut Context) -> Result<()> {
        debug!("analyzing {} ({:?})", root.id(), root.node_kind());
        let before = ctx.len();

        // (node, children pushed)
        let mut stack: Vec<(&Expr, bool)> = vec![(root, false)];
        while let Some((node, expanded)) = stack.pop() {
            if ctx.is_resolved(node) {
                continue;
            }
            if expanded {
                self.visit(node, ctx)?;
                continue;
            }
            stack.push((node, true));
            for child in node.children().into_iter().rev() {
                if !ctx.is_resolved(child) {
                    stack.push((child, false));
                }
            }
        }

        debug!("resolved {} new nodes", ctx.len() - before);
        Ok(())
    }

    /// Run the rules of one node whose children are all resolved.
    fn visit(&self, node: &Expr, ctx: &mut Context) -> Result<()> {
        let kind = node.node_kind();
        let rules = self.rules.get(kind).inspect_err(|_| {
            debug!("no rules registered for {:?} ({})", kind, node.id());
        })?;

        let mut bound = (rules.bound)(node, ctx)?;
        if let Some(known) = self.settings.bounds.get(&node.id()) {
            bound = bound.intersect(known);
        }
        if bound.is_empty() {
            debug!("{} ({:?}) has an empty bound", node.id(), kind);
        } else if bound.is_unbounded() && kind != NodeKind::Variable {
            debug!("no bound derived for {} ({:?})", node.id(), kind);
        }
        ctx.set_bound(node, bound);

        // Rules read the node's own bound, so it is written first and
        // withdrawn again if a later rule fails.
        let properties = self.properties(node, rules, bound, ctx);
        let (monotonicity, convexity) = match properties {
            Ok(resolved) => resolved,
            Err(err) => {
                ctx.discard(node.id());
                return Err(err);
            }
        };

        if self.settings.verbose {
            trace!(
                "{} {:?}: bound={} monotonicity={} convexity={}",
                node.id(),
                kind,
                bound,
                monotonicity,
                convexity
            );
        }
        Ok(())
    }

    /// Monotonicity then convexity of a node whose bound is set.
    fn properties(
        &self,
        node: &Expr,
        rules: &RuleSet,
        bound: Interval,
        ctx: &mut Context,
    ) -> Result<(Monotonicity, Convexity)> {
        let mut monotonicity = (rules.monotonicity)(node, ctx)?;
        // A constraint's bound is the feasible range of its body, not a value.
        if node.node_kind() != NodeKind::Constraint
            && monotonicity.value().is_none()
            && bound.is_point()
        {
            let value = bound.lower() / 2.0 + bound.upper() / 2.0;
            monotonicity = Monotonicity::Constant(Some(value));
        }
        ctx.set_monotonicity(node, monotonicity);

        let convexity = (rules.convexity)(node, ctx)?;
        ctx.set_convexity(node, convexity);
        Ok((monotonicity, convexity))
    }
}

/// Analyze `root` with the built-in rules and default settings.
pub fn analyze(root: &Expr) -> Result<Context> {
    Analyzer::new().analyze(root)
}
