//! Operator patterns and the registry that holds them

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{EvalError, Result};
use crate::ops::{
    AccessArgument, Arithmetic, ArithmeticOp, Call, CompareOp, Comparison, FileRead, Lambda, Len,
    MakeList, Sum, Variable,
};
use crate::primitive::Operation;
use crate::site::Site;

/// Constructor for an operator's operation object
pub type CreateFn = fn() -> Arc<dyn Operation>;

/// An operator name, the surface syntaxes that compile to it, and how to
/// build it.
#[derive(Clone, Copy)]
pub struct MatchPattern {
    /// Operator name
    pub name: &'static str,

    /// Accepted surface forms, `_N` for single operands and `__N` for
    /// variadic ones
    pub syntaxes: &'static [&'static str],

    /// One-line description
    pub help: &'static str,

    create: CreateFn,
}

impl MatchPattern {
    /// Describe an operator.
    pub const fn new(
        name: &'static str,
        syntaxes: &'static [&'static str],
        help: &'static str,
        create: CreateFn,
    ) -> Self {
        Self {
            name,
            syntaxes,
            help,
            create,
        }
    }

    /// Build the operation object.
    pub fn create(&self) -> Arc<dyn Operation> {
        (self.create)()
    }
}

impl fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchPattern")
            .field("name", &self.name)
            .field("syntaxes", &self.syntaxes)
            .finish()
    }
}

/// Read-only table of operator patterns, in registration order.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: IndexMap<&'static str, MatchPattern>,
}

impl PatternRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in operator.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.load_builtins();
        registry
    }

    /// Add a pattern, replacing any with the same name.
    pub fn register(&mut self, pattern: MatchPattern) {
        self.patterns.insert(pattern.name, pattern);
    }

    /// Find a pattern by operator name.
    pub fn lookup(&self, name: &str) -> Result<&MatchPattern> {
        self.patterns
            .get(name)
            .ok_or_else(|| EvalError::unbound(&Site::new(name, ""), name))
    }

    /// Whether an operator is registered
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// All patterns, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &MatchPattern> {
        self.patterns.values()
    }

    /// Number of registered operators
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn load_builtins(&mut self) {
        // Arithmetic
        self.register(MatchPattern::new(
            "__add",
            &["_1 + __2", "__add(_1, __2)"],
            "elementwise sum, or list concatenation",
            || Arc::new(Arithmetic::new(ArithmeticOp::Add)),
        ));
        self.register(MatchPattern::new(
            "__sub",
            &["_1 - __2", "__sub(_1, __2)"],
            "elementwise difference",
            || Arc::new(Arithmetic::new(ArithmeticOp::Sub)),
        ));
        self.register(MatchPattern::new(
            "__mul",
            &["_1 * __2", "__mul(_1, __2)"],
            "elementwise product",
            || Arc::new(Arithmetic::new(ArithmeticOp::Mul)),
        ));
        self.register(MatchPattern::new(
            "__div",
            &["_1 / __2", "__div(_1, __2)"],
            "elementwise quotient",
            || Arc::new(Arithmetic::new(ArithmeticOp::Div)),
        ));

        // Comparisons
        self.register(MatchPattern::new(
            "__gt",
            &["_1 > _2", "__gt(_1, _2)", "__gt(_1, _2, _3)"],
            "elementwise greater-than",
            || Arc::new(Comparison::new(CompareOp::Gt)),
        ));
        self.register(MatchPattern::new(
            "__ge",
            &["_1 >= _2", "__ge(_1, _2)", "__ge(_1, _2, _3)"],
            "elementwise greater-or-equal",
            || Arc::new(Comparison::new(CompareOp::Ge)),
        ));
        self.register(MatchPattern::new(
            "__lt",
            &["_1 < _2", "__lt(_1, _2)", "__lt(_1, _2, _3)"],
            "elementwise less-than",
            || Arc::new(Comparison::new(CompareOp::Lt)),
        ));
        self.register(MatchPattern::new(
            "__le",
            &["_1 <= _2", "__le(_1, _2)", "__le(_1, _2, _3)"],
            "elementwise less-or-equal",
            || Arc::new(Comparison::new(CompareOp::Le)),
        ));
        self.register(MatchPattern::new(
            "__eq",
            &["_1 == _2", "__eq(_1, _2)", "__eq(_1, _2, _3)"],
            "elementwise equality",
            || Arc::new(Comparison::new(CompareOp::Eq)),
        ));
        self.register(MatchPattern::new(
            "__ne",
            &["_1 != _2", "__ne(_1, _2)", "__ne(_1, _2, _3)"],
            "elementwise inequality",
            || Arc::new(Comparison::new(CompareOp::Ne)),
        ));

        // Lists and reductions
        self.register(MatchPattern::new(
            "make_list",
            &["make_list(__1)", "'(__1)"],
            "collect operands into a list",
            || Arc::new(MakeList),
        ));
        self.register(MatchPattern::new(
            "len",
            &["len(_1)"],
            "length of a list, string or array",
            || Arc::new(Len),
        ));
        self.register(MatchPattern::new(
            "sum",
            &["sum(_1)", "sum(_1, _2)", "sum(_1, _2, _3)"],
            "sum of elements, optionally along an axis",
            || Arc::new(Sum),
        ));

        // Variables, arguments and callables
        self.register(MatchPattern::new(
            "variable",
            &["variable(_1)"],
            "a stored value",
            || Arc::new(Variable),
        ));
        self.register(MatchPattern::new(
            "access-argument",
            &["arg(_1)"],
            "a call argument by position",
            || Arc::new(AccessArgument),
        ));
        self.register(MatchPattern::new(
            "lambda",
            &["lambda(_1, _2)"],
            "a callable body with a fixed arity",
            || Arc::new(Lambda),
        ));
        self.register(MatchPattern::new(
            "call",
            &["_1(__2)"],
            "invoke a callable with arguments",
            || Arc::new(Call),
        ));

        // I/O
        self.register(MatchPattern::new(
            "file_read",
            &["file_read(_1)"],
            "read a UTF-8 file",
            || Arc::new(FileRead),
        ));
    }
}
