//! Rendering results as JSON

use quickbeam::{Element, NodeData, Shape, Value};
use serde_json::{json, Value as Json};

fn array<T: Element>(data: &NodeData<T>, element: impl Fn(T) -> Json) -> Json {
    match data.shape() {
        Shape::Scalar => element(data.as_slice()[0]),
        Shape::Vector(_) => Json::Array(data.as_slice().iter().map(|&x| element(x)).collect()),
        Shape::Matrix { rows, .. } => Json::Array(
            (0..rows)
                .map(|i| Json::Array(data.row(i).iter().map(|&x| element(x)).collect()))
                .collect(),
        ),
    }
}

/// Convert a value to JSON. Non-finite floats become `null`.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(d) => array(d, |x| json!(x)),
        Value::Float(d) => array(d, Json::from),
        Value::Mask(d) => array(d, |x| Json::Bool(x != 0)),
        Value::String(s) => Json::String(s.to_string()),
        Value::List(l) => Json::Array(l.iter().map(to_json).collect()),
        Value::Expression(e) => json!({ "expr": e.as_str() }),
        Value::Primitive(h) => json!({ "primitive": h.site().to_string() }),
    }
}
