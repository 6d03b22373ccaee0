//! Runtime value representation
//!
//! Shared dynamically-typed value domain for the evaluator and the tool
//! boundary:
//! - Numbers, Bools, Null: immediate values
//! - Strings: heap-allocated, reference-counted (`Arc<String>`), immutable
//! - Lists: copy-on-write (`ValueList` wrapping `Arc<Vec<Value>>`)
//! - Objects: copy-on-write string-keyed maps (`ValueMap`)
//!
//! Equality is structural and implemented once over all variants: lists
//! compare by length then pairwise, maps by key set (order-independent) then
//! per-key value, primitives by value. Rendering is likewise implemented once
//! (`Display`) and is deterministic: object keys are sorted, booleans render
//! lowercase, `null` renders as `null`, whole numbers drop the fraction.

use crate::span::Span;
use crate::tools::ToolError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Copy-on-write list. Cheap to clone (refcount bump).
/// Mutations on a shared list clone the inner Vec first (Arc::make_mut).
#[derive(Clone, Debug, Default)]
pub struct ValueList(Arc<Vec<Value>>);

impl ValueList {
    pub fn new() -> Self {
        ValueList(Arc::new(Vec::new()))
    }

    pub fn from_vec(v: Vec<Value>) -> Self {
        ValueList(Arc::new(v))
    }

    /// Read access, no clone needed
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get element by index, as a reference into the inner Vec
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Mutating access; triggers CoW if the Arc is shared
    pub fn push(&mut self, value: Value) {
        Arc::make_mut(&mut self.0).push(value);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Convert to owned Vec; clones only if shared
    pub fn into_vec(self) -> Vec<Value> {
        Arc::try_unwrap(self.0).unwrap_or_else(|arc| (*arc).clone())
    }
}

impl PartialEq for ValueList {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl From<Vec<Value>> for ValueList {
    fn from(v: Vec<Value>) -> Self {
        ValueList::from_vec(v)
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        ValueList(Arc::new(iter.into_iter().collect()))
    }
}

/// Copy-on-write string-keyed map. Cheap to clone (refcount bump).
#[derive(Clone, Debug, Default)]
pub struct ValueMap(Arc<HashMap<String, Value>>);

impl ValueMap {
    pub fn new() -> Self {
        ValueMap(Arc::new(HashMap::new()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: String, value: Value) {
        Arc::make_mut(&mut self.0).insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        Arc::make_mut(&mut self.0).remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> std::collections::hash_map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Keys in lexicographic order, for deterministic rendering
    pub fn sorted_keys(&self) -> Vec<&String> {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        keys
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        // HashMap equality: same key set, equal value per key, order-free
        self.0.as_ref() == other.0.as_ref()
    }
}

impl From<HashMap<String, Value>> for ValueMap {
    fn from(m: HashMap<String, Value>) -> Self {
        ValueMap(Arc::new(m))
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ValueMap(Arc::new(iter.into_iter().collect()))
    }
}

/// Runtime value
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// String value (reference-counted, immutable)
    String(Arc<String>),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Ordered list (copy-on-write)
    List(ValueList),
    /// String-keyed object (copy-on-write)
    Object(ValueMap),
}

impl Value {
    /// Construct a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Construct a list value
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(ValueList::from_vec(elements))
    }

    /// Construct an object value
    pub fn object(entries: HashMap<String, Value>) -> Self {
        Value::Object(ValueMap::from(entries))
    }

    /// Name of this value's variant, as used in error messages and in tool
    /// schema type checks
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    /// Render for embedding inside a list or object: strings are quoted and
    /// escaped, everything else renders as at top level.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s.as_str()),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // No trailing .0 for whole numbers
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s.as_ref()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, element) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    element.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, key) in map.sorted_keys().into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: ", key)?;
                    // Key came from the map, so the entry exists
                    match map.get(key) {
                        Some(value) => value.fmt_nested(f)?,
                        None => write!(f, "null")?,
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Null => write!(f, "Null"),
            Value::List(list) => write!(f, "List({:?})", list.as_slice()),
            Value::Object(map) => {
                write!(f, "Object({{")?;
                for (i, key) in map.sorted_keys().into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let entry = map.get(key).unwrap_or(&Value::Null);
                    write!(f, "{:?}: {:?}", key, entry)?;
                }
                write!(f, "}})")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

// === JSON interop at the host boundary ===

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.as_ref().clone()),
            Value::List(list) => {
                serde_json::Value::Array(list.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Runtime fault raised during script execution
///
/// Fail-fast: any of these aborts the remainder of the script. Each variant
/// carries the span of the offending node plus the names needed for an
/// actionable message.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Variable reference with no binding in scope
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },
    /// Operator/operand variant mismatch
    #[error("type error: {msg}")]
    TypeError { msg: String, span: Span },
    /// IF condition did not evaluate to a boolean
    #[error("invalid condition: IF expects a boolean, got {actual}")]
    InvalidCondition { actual: &'static str, span: Span },
    /// FOR iterable did not evaluate to a list
    #[error("invalid iterable: FOR expects a list, got {actual}")]
    InvalidIterable { actual: &'static str, span: Span },
    /// Division with a divisor of exactly zero
    #[error("division by zero")]
    DivisionByZero { span: Span },
    /// Member access on a value that is not an object
    #[error("cannot access property '{property}' on {actual}")]
    MemberOnNonObject {
        property: String,
        actual: &'static str,
        span: Span,
    },
    /// Member access for a property the object does not have
    #[error("object has no property '{property}'")]
    MissingProperty { property: String, span: Span },
    /// Index access on a value that is not a list
    #[error("cannot index into {actual}, expected a list")]
    IndexOnNonList { actual: &'static str, span: Span },
    /// Index that is negative or not a whole number
    #[error("list index must be a non-negative integer, got {index}")]
    InvalidIndex { index: f64, span: Span },
    /// Index past the end of the list
    #[error("list index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize, span: Span },
    /// Fault from the tool-invocation protocol
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl RuntimeError {
    /// Span of the offending node, when one is attached
    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::TypeError { span, .. }
            | RuntimeError::InvalidCondition { span, .. }
            | RuntimeError::InvalidIterable { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::MemberOnNonObject { span, .. }
            | RuntimeError::MissingProperty { span, .. }
            | RuntimeError::IndexOnNonList { span, .. }
            | RuntimeError::InvalidIndex { span, .. }
            | RuntimeError::IndexOutOfBounds { span, .. } => Some(*span),
            RuntimeError::Tool(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obj(entries: &[(&str, Value)]) -> Value {
        Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_primitive_equality() {
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::Number(2.0));
        assert_eq!(Value::string("a"), Value::string("a"));
        assert_eq!(Value::Null, Value::Null);
        // Different variants are never equal
        assert_ne!(Value::Number(0.0), Value::Null);
        assert_ne!(Value::Bool(false), Value::Number(0.0));
        assert_ne!(Value::string("1"), Value::Number(1.0));
    }

    #[test]
    fn test_list_equality_is_order_sensitive() {
        let a = Value::list(vec![Value::Number(1.0), Value::Number(2.0)]);
        let b = Value::list(vec![Value::Number(1.0), Value::Number(2.0)]);
        let c = Value::list(vec![Value::Number(2.0), Value::Number(1.0)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_map_equality_is_order_independent() {
        let a = obj(&[("a", Value::Number(1.0)), ("b", Value::Number(2.0))]);
        let b = obj(&[("b", Value::Number(2.0)), ("a", Value::Number(1.0))]);
        assert_eq!(a, b);

        let c = obj(&[("a", Value::Number(1.0))]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_deep_equality_nested() {
        let a = obj(&[("items", Value::list(vec![Value::string("x"), Value::Null]))]);
        let b = obj(&[("items", Value::list(vec![Value::string("x"), Value::Null]))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(3.14).to_string(), "3.14");
        assert_eq!(Value::Number(-2.0).to_string(), "-2");
    }

    #[test]
    fn test_render_primitives() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::string("hi").to_string(), "hi");
    }

    #[test]
    fn test_render_list_quotes_nested_strings() {
        let list = Value::list(vec![
            Value::Number(1.0),
            Value::string("a"),
            Value::Bool(true),
        ]);
        assert_eq!(list.to_string(), r#"[1, "a", true]"#);
    }

    #[test]
    fn test_render_object_sorted_keys() {
        let value = obj(&[
            ("b", Value::string("x")),
            ("a", Value::Number(1.0)),
        ]);
        assert_eq!(value.to_string(), r#"{a: 1, b: "x"}"#);
    }

    #[test]
    fn test_render_nested_structures() {
        let value = obj(&[(
            "rows",
            Value::list(vec![obj(&[("id", Value::string("n1"))])]),
        )]);
        assert_eq!(value.to_string(), r#"{rows: [{id: "n1"}]}"#);
    }

    #[test]
    fn test_cow_list_clone_is_independent() {
        let mut a = ValueList::from_vec(vec![Value::Number(1.0)]);
        let b = a.clone();
        a.push(Value::Number(2.0));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"name": "BTC", "price": 65000.5, "tags": ["spot", "swap"], "active": true, "note": null}"#,
        )
        .unwrap();
        let value = Value::from(json.clone());
        assert_eq!(value.type_name(), "object");
        let back = serde_json::Value::from(&value);
        assert_eq!(back, json);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::string("s").type_name(), "string");
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::Bool(true).type_name(), "boolean");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::list(vec![]).type_name(), "list");
        assert_eq!(Value::object(HashMap::new()).type_name(), "object");
    }
}
