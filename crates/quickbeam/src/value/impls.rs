//! Value constructors, predicates, extractors, From traits, PartialEq

use std::sync::Arc;

use super::*;
use crate::error::{type_name, EvalError, Result};
use crate::site::Site;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a scalar integer
    pub fn int(n: i64) -> Self {
        Value::Int(NodeData::scalar(n))
    }

    /// Create a scalar float
    pub fn float(x: f64) -> Self {
        Value::Float(NodeData::scalar(x))
    }

    /// Create a float vector
    pub fn vector(values: Vec<f64>) -> Self {
        Value::Float(NodeData::vector(values))
    }

    /// Create a row-major float matrix.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != rows * cols`.
    pub fn matrix(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        Value::Float(NodeData::matrix(rows, cols, values))
    }

    /// Create an integer vector
    pub fn int_vector(values: Vec<i64>) -> Self {
        Value::Int(NodeData::vector(values))
    }

    /// Create a boolean array from flags
    pub fn mask(values: Vec<bool>) -> Self {
        Value::Mask(NodeData::vector(values.into_iter().map(u8::from).collect()))
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create an owned list
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(List::new(items))
    }

    /// Create an unevaluated expression
    pub fn expression(source: impl Into<String>) -> Self {
        Value::Expression(Arc::new(source.into()))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is `Nil`
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Whether this operand can be used where a value is required
    pub fn is_valid(&self) -> bool {
        !self.is_nil()
    }

    /// Check if value is one of the array variants
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Mask(_))
    }

    /// Check if value refers to another primitive
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Primitive(_))
    }

    /// Whether the value's storage is a reference view.
    ///
    /// Only arrays and lists carry owned/shared storage; every other variant
    /// reports `false`.
    pub fn is_ref(&self) -> bool {
        match self {
            Value::Int(d) => d.is_ref(),
            Value::Float(d) => d.is_ref(),
            Value::Mask(d) => d.is_ref(),
            Value::List(l) => l.is_ref(),
            _ => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Ownership
    // ═══════════════════════════════════════════════════════════════════

    /// A reference view of this value, suitable for handing to a consumer
    /// that must not mutate it.
    pub fn share(&self) -> Value {
        match self {
            Value::Int(d) => Value::Int(d.share()),
            Value::Float(d) => Value::Float(d.share()),
            Value::Mask(d) => Value::Mask(d.share()),
            Value::List(l) => Value::List(l.share()),
            other => other.clone(),
        }
    }

    /// Convert owned storage into shared storage without copying.
    pub fn into_shared(self) -> Value {
        match self {
            Value::Int(d) => Value::Int(d.into_shared()),
            Value::Float(d) => Value::Float(d.into_shared()),
            Value::Mask(d) => Value::Mask(d.into_shared()),
            Value::List(l) => Value::List(l.into_shared()),
            other => other,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════

    /// The referenced primitive, if this is a node
    pub fn as_primitive(&self) -> Option<&PrimitiveHandle> {
        match self {
            Value::Primitive(h) => Some(h),
            _ => None,
        }
    }

    /// The text, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The list, if this is one
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// The float array, if this is one
    pub fn as_float(&self) -> Option<&NodeData<f64>> {
        match self {
            Value::Float(d) => Some(d),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Extractors
// ═══════════════════════════════════════════════════════════════════

/// Coerce a numeric operand to a float array.
///
/// `Float` is passed through untouched (keeping its storage), `Int` and
/// `Mask` are widened into a fresh owned array, `Bool` becomes a scalar
/// `1.0`/`0.0`.
pub fn extract_numeric(value: Value, site: &Site) -> Result<NodeData<f64>> {
    match value {
        Value::Float(d) => Ok(d),
        Value::Int(d) => Ok(d.to_f64()),
        Value::Mask(d) => Ok(d.to_f64()),
        Value::Bool(b) => Ok(NodeData::scalar(if b { 1.0 } else { 0.0 })),
        other => Err(EvalError::type_mismatch(
            site,
            format!("expected a numeric operand, found `{}`", type_name(&other)),
        )),
    }
}

/// Extract a scalar integer (an integral float is accepted).
pub fn extract_integer(value: &Value, site: &Site) -> Result<i64> {
    let scalar = match value {
        Value::Int(d) => d.scalar_value(),
        Value::Float(d) => d
            .scalar_value()
            .filter(|x| x.fract() == 0.0)
            .map(|x| x as i64),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    scalar.ok_or_else(|| {
        EvalError::type_mismatch(
            site,
            format!("expected a scalar integer, found `{}`", type_name(value)),
        )
    })
}

/// Extract a truth value from a boolean or numeric scalar; `Nil` is false.
pub fn extract_bool(value: &Value, site: &Site) -> Result<bool> {
    let flag = match value {
        Value::Nil => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Int(d) => d.scalar_value().map(|x| x != 0),
        Value::Float(d) => d.scalar_value().map(|x| x != 0.0),
        Value::Mask(d) => d.scalar_value().map(|x| x != 0),
        _ => None,
    };
    flag.ok_or_else(|| {
        EvalError::type_mismatch(
            site,
            format!("expected a boolean scalar, found `{}`", type_name(value)),
        )
    })
}

/// Extract the text of a string operand.
pub fn extract_string(value: &Value, site: &Site) -> Result<Arc<String>> {
    match value {
        Value::String(s) => Ok(Arc::clone(s)),
        other => Err(EvalError::type_mismatch(
            site,
            format!("expected a string, found `{}`", type_name(other)),
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::vector(values)
    }
}

impl From<NodeData<f64>> for Value {
    fn from(d: NodeData<f64>) -> Self {
        Value::Float(d)
    }
}

impl From<NodeData<i64>> for Value {
    fn from(d: NodeData<i64>) -> Self {
        Value::Int(d)
    }
}

impl From<NodeData<u8>> for Value {
    fn from(d: NodeData<u8>) -> Self {
        Value::Mask(d)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Value::List(l)
    }
}

impl From<PrimitiveHandle> for Value {
    fn from(h: PrimitiveHandle) -> Self {
        Value::Primitive(h)
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Mask(a), Value::Mask(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Expression(a), Value::Expression(b)) => a == b,
            // Nodes compare by identity
            (Value::Primitive(a), Value::Primitive(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
