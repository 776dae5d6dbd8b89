//! Core expression types for cvxbound.
//!
//! `Expr` is the read-only view the analysis has of a model's expression
//! trees: a kind tag, ordered children, literal values for leaves and a stable
//! identity. Children are shared through `Arc`, so a sub-expression can be
//! referenced by several parents; cloning an `Expr` keeps its identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

impl ExprId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        ExprId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag identifying the kind of an expression node.
///
/// The set is closed: every analysis rule table must cover all of
/// [`NodeKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Constant,
    Variable,
    Sum,
    Linear,
    Product,
    Monomial,
    Division,
    Reciprocal,
    Power,
    Negation,
    Abs,
    Quadratic,
    UnaryFunction,
    Constraint,
    Objective,
}

impl NodeKind {
    /// Every node kind.
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Constant,
        NodeKind::Variable,
        NodeKind::Sum,
        NodeKind::Linear,
        NodeKind::Product,
        NodeKind::Monomial,
        NodeKind::Division,
        NodeKind::Reciprocal,
        NodeKind::Power,
        NodeKind::Negation,
        NodeKind::Abs,
        NodeKind::Quadratic,
        NodeKind::UnaryFunction,
        NodeKind::Constraint,
        NodeKind::Objective,
    ];
}

/// Named unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFunction {
    Sqrt,
    Exp,
    Log,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Abs,
}

impl UnaryFunction {
    /// Every supported function.
    pub const ALL: [UnaryFunction; 11] = [
        UnaryFunction::Sqrt,
        UnaryFunction::Exp,
        UnaryFunction::Log,
        UnaryFunction::Log10,
        UnaryFunction::Sin,
        UnaryFunction::Cos,
        UnaryFunction::Tan,
        UnaryFunction::Asin,
        UnaryFunction::Acos,
        UnaryFunction::Atan,
        UnaryFunction::Abs,
    ];

    /// The function's name as written in models.
    pub fn name(self) -> &'static str {
        match self {
            UnaryFunction::Sqrt => "sqrt",
            UnaryFunction::Exp => "exp",
            UnaryFunction::Log => "log",
            UnaryFunction::Log10 => "log10",
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Asin => "asin",
            UnaryFunction::Acos => "acos",
            UnaryFunction::Atan => "atan",
            UnaryFunction::Abs => "abs",
        }
    }

    /// Look a function up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Data for a variable expression.
#[derive(Debug, Clone, Default)]
pub struct VariableData {
    /// Optional name for display.
    pub name: Option<String>,
    /// Declared lower bound; `None` is unbounded.
    pub lower: Option<f64>,
    /// Declared upper bound; `None` is unbounded.
    pub upper: Option<f64>,
    /// Current value, if the model assigned one.
    pub value: Option<f64>,
}

/// One `coefficient * var1 * var2` term of a quadratic expression.
#[derive(Debug, Clone)]
pub struct QuadraticTerm {
    pub var1: Arc<Expr>,
    pub var2: Arc<Expr>,
    pub coefficient: f64,
}

impl QuadraticTerm {
    /// Check if the term is a square (`var1` and `var2` are the same node).
    pub fn is_square(&self) -> bool {
        self.var1.id() == self.var2.id()
    }
}

/// Optimization sense of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Data for a constraint `lower <= body <= upper`.
#[derive(Debug, Clone)]
pub struct ConstraintData {
    pub body: Arc<Expr>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ConstraintData {
    /// Check if the constraint has a finite lower side.
    pub fn bounded_below(&self) -> bool {
        self.lower.is_some_and(f64::is_finite)
    }

    /// Check if the constraint has a finite upper side.
    pub fn bounded_above(&self) -> bool {
        self.upper.is_some_and(f64::is_finite)
    }
}

/// Data for an objective.
#[derive(Debug, Clone)]
pub struct ObjectiveData {
    pub body: Arc<Expr>,
    pub sense: Sense,
}

/// The payload of an expression node.
#[derive(Debug, Clone)]
pub enum ExprKind {
    // ========== Leaf nodes ==========
    /// A numeric constant.
    Constant(f64),
    /// A decision variable.
    Variable(VariableData),

    // ========== Linear nodes ==========
    /// Sum of children.
    Sum(Vec<Arc<Expr>>),
    /// `constant + sum(coefficients[i] * children[i])`.
    Linear {
        coefficients: Vec<f64>,
        children: Vec<Arc<Expr>>,
        constant: f64,
    },
    /// Negation: -a
    Negation(Arc<Expr>),

    // ========== Nonlinear nodes ==========
    /// Product: a * b
    Product(Arc<Expr>, Arc<Expr>),
    /// Monomial term: coefficient * variable.
    Monomial(Arc<Expr>, Arc<Expr>),
    /// Division: a / b
    Division(Arc<Expr>, Arc<Expr>),
    /// Reciprocal: 1 / a
    Reciprocal(Arc<Expr>),
    /// Power: base ^ exponent
    Power(Arc<Expr>, Arc<Expr>),
    /// Absolute value.
    Abs(Arc<Expr>),
    /// Sum of quadratic terms.
    Quadratic(Vec<QuadraticTerm>),
    /// Named unary function.
    UnaryFunction(UnaryFunction, Arc<Expr>),

    // ========== Roots ==========
    /// Constraint `lower <= body <= upper`.
    Constraint(ConstraintData),
    /// Objective over `body`.
    Objective(ObjectiveData),
}

/// An expression node.
#[derive(Debug, Clone)]
pub struct Expr {
    id: ExprId,
    kind: ExprKind,
}

impl Expr {
    /// Create a node with a fresh identity.
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            id: ExprId::new(),
            kind,
        }
    }

    /// The node's identity.
    pub fn id(&self) -> ExprId {
        self.id
    }

    /// The node's payload.
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// The node's kind tag.
    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            ExprKind::Constant(_) => NodeKind::Constant,
            ExprKind::Variable(_) => NodeKind::Variable,
            ExprKind::Sum(_) => NodeKind::Sum,
            ExprKind::Linear { .. } => NodeKind::Linear,
            ExprKind::Negation(_) => NodeKind::Negation,
            ExprKind::Product(_, _) => NodeKind::Product,
            ExprKind::Monomial(_, _) => NodeKind::Monomial,
            ExprKind::Division(_, _) => NodeKind::Division,
            ExprKind::Reciprocal(_) => NodeKind::Reciprocal,
            ExprKind::Power(_, _) => NodeKind::Power,
            ExprKind::Abs(_) => NodeKind::Abs,
            ExprKind::Quadratic(_) => NodeKind::Quadratic,
            ExprKind::UnaryFunction(_, _) => NodeKind::UnaryFunction,
            ExprKind::Constraint(_) => NodeKind::Constraint,
            ExprKind::Objective(_) => NodeKind::Objective,
        }
    }

    /// Ordered children of this node.
    ///
    /// Quadratic terms contribute `var1, var2` for each term in order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Constant(_) | ExprKind::Variable(_) => Vec::new(),
            ExprKind::Sum(children) | ExprKind::Linear { children, .. } => {
                children.iter().map(|c| c.as_ref()).collect()
            }
            ExprKind::Negation(a)
            | ExprKind::Reciprocal(a)
            | ExprKind::Abs(a)
            | ExprKind::UnaryFunction(_, a) => vec![a.as_ref()],
            ExprKind::Product(a, b)
            | ExprKind::Monomial(a, b)
            | ExprKind::Division(a, b)
            | ExprKind::Power(a, b) => vec![a.as_ref(), b.as_ref()],
            ExprKind::Quadratic(terms) => terms
                .iter()
                .flat_map(|t| [t.var1.as_ref(), t.var2.as_ref()])
                .collect(),
            ExprKind::Constraint(c) => vec![c.body.as_ref()],
            ExprKind::Objective(o) => vec![o.body.as_ref()],
        }
    }

    /// Literal value of a constant, or the current value of a variable.
    pub fn value(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Constant(v) => Some(*v),
            ExprKind::Variable(v) => v.value,
            _ => None,
        }
    }

    /// Check if this expression is a constant leaf.
    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(_))
    }

    /// Check if this expression is a variable leaf.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, ExprKind::Variable(_))
    }

    /// Get the variable data if this is a variable.
    pub fn variable_data(&self) -> Option<&VariableData> {
        match &self.kind {
            ExprKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Number of distinct nodes reachable from this one (itself included).
    pub fn node_count(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![self];
        while let Some(e) = stack.pop() {
            if seen.insert(e.id) {
                stack.extend(e.children());
            }
        }
        seen.len()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Constant(v) => write!(f, "{}", v),
            ExprKind::Variable(v) => match &v.name {
                Some(name) => f.write_str(name),
                None => write!(f, "x{}", self.id.raw()),
            },
            ExprKind::UnaryFunction(func, _) => write!(f, "{}{}", func, self.id),
            _ => write!(f, "{:?}{}", self.node_kind(), self.id),
        }
    }
}

// Convenient From implementations for automatic conversion
impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        crate::expr::constant(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        crate::expr::constant(value as f64)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}
