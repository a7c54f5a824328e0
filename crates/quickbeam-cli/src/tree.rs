//! JSON primitive trees
//!
//! A tree is plain JSON:
//!
//! - `null`, booleans, numbers and strings are literals;
//! - arrays of numbers are vectors, arrays of equal-length number arrays are
//!   matrices (integers stay integers unless any element is fractional);
//! - `{"list": [...]}` is a literal list, `{"expr": "..."}` an expression;
//! - `{"arg": i}` reads call argument `i`;
//! - `{"op": name, "codename": label, "operands": [...], "locality": n}`
//!   creates a primitive. `locality` 0 (the default) is the engine's own;
//!   any other number names a message-passing locality, started on first use.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use quickbeam::{Engine, NodeData, RemoteLocality, Value};
use serde_json::{Map, Value as Json};

/// Builds primitives from JSON on one engine.
pub struct Loader<'e> {
    engine: &'e Engine,
    localities: HashMap<u64, RemoteLocality>,
}

impl<'e> Loader<'e> {
    /// Create a loader for `engine`.
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            localities: HashMap::new(),
        }
    }

    /// Convert one JSON node.
    pub fn load(&mut self, json: &Json) -> Result<Value> {
        match json {
            Json::Null => Ok(Value::Nil),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(_) => number(json).map(|n| match n {
                Number::Int(i) => Value::int(i),
                Number::Float(x) => Value::float(x),
            }),
            Json::String(s) => Ok(Value::string(s.as_str())),
            Json::Array(items) => array(items),
            Json::Object(fields) => self.object(fields),
        }
    }

    fn object(&mut self, fields: &Map<String, Json>) -> Result<Value> {
        if let Some(items) = fields.get("list") {
            let items = items
                .as_array()
                .ok_or_else(|| anyhow!("`list` must be an array"))?;
            let values = items
                .iter()
                .map(|item| self.load(item))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::list(values));
        }

        if let Some(source) = fields.get("expr") {
            let source = source
                .as_str()
                .ok_or_else(|| anyhow!("`expr` must be a string"))?;
            return Ok(Value::expression(source));
        }

        if let Some(index) = fields.get("arg") {
            let index = index
                .as_i64()
                .ok_or_else(|| anyhow!("`arg` must be an integer"))?;
            return Ok(self
                .engine
                .create("access-argument", vec![Value::int(index)], "")?);
        }

        let name = fields
            .get("op")
            .and_then(Json::as_str)
            .ok_or_else(|| anyhow!("object nodes need an `op`, `arg`, `list` or `expr` field"))?;
        let codename = fields.get("codename").and_then(Json::as_str).unwrap_or("");
        let operands = match fields.get("operands") {
            Some(Json::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    self.load(item)
                        .with_context(|| format!("operand {} of `{}`", i, name))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => bail!("`operands` of `{}` must be an array", name),
            None => Vec::new(),
        };

        match fields.get("locality").and_then(Json::as_u64).unwrap_or(0) {
            0 => Ok(self.engine.create(name, operands, codename)?),
            n => {
                let engine = self.engine;
                let locality = self
                    .localities
                    .entry(n)
                    .or_insert_with(|| engine.spawn_locality());
                Ok(engine.create_on(locality, name, operands, codename)?)
            }
        }
    }
}

enum Number {
    Int(i64),
    Float(f64),
}

fn number(json: &Json) -> Result<Number> {
    if let Some(i) = json.as_i64() {
        Ok(Number::Int(i))
    } else if let Some(x) = json.as_f64() {
        Ok(Number::Float(x))
    } else {
        bail!("expected a number, found {}", json)
    }
}

/// Numeric arrays become vectors or matrices.
fn array(items: &[Json]) -> Result<Value> {
    let rows: Option<Vec<&Vec<Json>>> = items.iter().map(Json::as_array).collect();
    match rows {
        Some(rows) if !rows.is_empty() => {
            let cols = rows[0].len();
            if rows.iter().any(|row| row.len() != cols) {
                bail!("matrix rows must all have {} elements", cols);
            }
            let flat: Vec<Json> = rows.into_iter().flatten().cloned().collect();
            Ok(numeric(&flat, |values| match values {
                Numbers::Int(v) => Value::Int(NodeData::matrix(items.len(), cols, v)),
                Numbers::Float(v) => Value::Float(NodeData::matrix(items.len(), cols, v)),
            })?)
        }
        _ => numeric(items, |values| match values {
            Numbers::Int(v) => Value::int_vector(v),
            Numbers::Float(v) => Value::vector(v),
        })
        .context("arrays hold numbers; use {\"list\": [...]} for other values"),
    }
}

enum Numbers {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

fn numeric(items: &[Json], build: impl FnOnce(Numbers) -> Value) -> Result<Value> {
    let numbers = items.iter().map(number).collect::<Result<Vec<_>>>()?;
    let ints: Option<Vec<i64>> = numbers
        .iter()
        .map(|n| match n {
            Number::Int(i) => Some(*i),
            Number::Float(_) => None,
        })
        .collect();
    Ok(match ints {
        Some(ints) if !ints.is_empty() => build(Numbers::Int(ints)),
        _ => build(Numbers::Float(
            numbers
                .iter()
                .map(|n| match n {
                    Number::Int(i) => *i as f64,
                    Number::Float(x) => *x,
                })
                .collect(),
        )),
    })
}
