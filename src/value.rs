/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * Github:   https://github.com/samwilcox/pawx
 *
 * License:
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fmt;
use std::rc::Rc;

use crate::error::{ClowderError, ClowderResult};
use crate::runtime::instance::Object;

/// Host callable stored in a slot or handed out by `Object::get` for a method.
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    body: Rc<dyn Fn(Vec<Value>) -> ClowderResult<Value>>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> ClowderResult<Value> + 'static,
    {
        Self {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: Vec<Value>) -> ClowderResult<Value> {
        (self.body)(args)
    }

    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

/// Clowder runtime value representation.
///
/// Everything stored in a data slot, passed as an argument or returned from a
/// method is one of these. Lists have value semantics (a clone is a copy);
/// objects are handles, so every clone of an `Object` aliases the same instance.
#[derive(Clone)]
pub enum Value {
    // Primitive scalars
    Number(f64),
    String(String),
    Bool(bool),
    Null,

    List(Vec<Value>),

    // Handle to a live instance
    Object(Object),

    Function(NativeFunction),

    // Error wrapper used by user code that prefers returning errors as values
    Error { message: String },
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Null => write!(f, "Null"),
            Value::List(values) => write!(f, "List({:?})", values),
            Value::Object(object) => write!(f, "[Instance {}]", object.class_name()),
            Value::Function(func) => write!(f, "[Function {}]", func.name()),
            Value::Error { message } => write!(f, "Error({})", message),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        Value::equals_strict(self, other)
    }
}

impl Value {
    /// Returns a stable type name string (useful for errors).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_)   => "Number",
            Value::String(_)   => "String",
            Value::Bool(_)     => "Bool",
            Value::Null        => "Null",
            Value::List(_)     => "List",
            Value::Object(_)   => "Instance",
            Value::Function(_) => "Function",
            Value::Error { .. } => "Error",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(values) => !values.is_empty(),
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-ish string form for debug/errors (NOT meant to be exact serialization).
    pub fn stringify(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),

            Value::List(values) => {
                let inner = values
                    .iter()
                    .map(|x| x.stringify())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", inner)
            }

            Value::Object(object) => format!("[instance {}]", object.class_name()),
            Value::Function(func) => format!("[function {}]", func.name()),
            Value::Error { message } => format!("Error({})", message),
        }
    }

    /// Loose equality: primitives by value, lists element-wise, nothing else.
    pub fn equals_loose(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => x == y,
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Null, Value::Null) => true,
            (Value::List(x), Value::List(y)) => {
                x.len() == y.len()
                    && x.iter().zip(y.iter()).all(|(a, b)| Value::equals_loose(a, b))
            }
            _ => false,
        }
    }

    /// Strict equality:
    /// - primitives compare by value
    /// - lists deep-compare
    /// - objects and functions compare by handle identity
    pub fn equals_strict(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
            (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
            (Value::Error { message: x }, Value::Error { message: y }) => x == y,
            (Value::List(x), Value::List(y)) => {
                x.len() == y.len()
                    && x.iter().zip(y.iter()).all(|(a, b)| Value::equals_strict(a, b))
            }
            _ => Value::equals_loose(a, b),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Calls a method on the instance this value refers to.
    ///
    /// Lets callers chain `obj.call("add", ..)?.call("add", ..)?` when a
    /// method returns `self`.
    pub fn call(&self, name: &str, args: Vec<Value>) -> ClowderResult<Value> {
        match self {
            Value::Object(object) => object.call(name, args),
            other => Err(ClowderError::NotCallable {
                class: other.type_name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Reads a member from the instance this value refers to.
    pub fn get(&self, name: &str) -> ClowderResult<Value> {
        match self {
            Value::Object(object) => object.get(name),
            other => Err(ClowderError::NoSuchMember {
                class: other.type_name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Converts to JSON for diagnostics. Handles become descriptive strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(values) => {
                serde_json::Value::Array(values.iter().map(Value::to_json).collect())
            }
            other => serde_json::Value::String(other.stringify()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            // Objects have no clowder counterpart; keep them readable.
            serde_json::Value::Object(map) => {
                Value::String(serde_json::Value::Object(map).to_string())
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<NativeFunction> for Value {
    fn from(func: NativeFunction) -> Self {
        Value::Function(func)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lists_compare_by_contents() {
        let a = Value::List(vec![1.into(), "foo".into()]);
        let b = Value::List(vec![1.into(), "foo".into()]);
        assert_eq!(a, b);
        assert!(!Value::equals_loose(&a, &Value::List(vec![])));
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = NativeFunction::new("id", |args| Ok(args.into_iter().next().unwrap_or(Value::Null)));
        let g = NativeFunction::new("id", |args| Ok(args.into_iter().next().unwrap_or(Value::Null)));
        assert_eq!(Value::Function(f.clone()), Value::Function(f.clone()));
        assert_ne!(Value::Function(f), Value::Function(g));
    }

    #[test]
    fn json_conversion_keeps_scalars_and_arrays() {
        let value = Value::from(json!([1, "two", true, null]));
        assert_eq!(
            value,
            Value::List(vec![1.into(), "two".into(), true.into(), Value::Null])
        );
        assert_eq!(value.to_json(), json!([1.0, "two", true, null]));
    }

    #[test]
    fn truthiness_follows_pawx_rules() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
    }

    #[test]
    fn calling_a_non_object_is_rejected() {
        let err = Value::from(5).call("add", vec![]).unwrap_err();
        assert_eq!(err.code(), "E_NOT_CALLABLE");
    }
}
