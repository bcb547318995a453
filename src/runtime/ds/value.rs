use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::call;
use crate::runtime::ds::object::ObjectRef;
use crate::runtime::ds::object_property::PropertyKey;
use crate::runtime::ds::operations::object::{get, invoke, set};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";

/// A dynamically typed value. Members of a property bag are values, and so
/// is everything a method receives or returns.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(ObjectRef),
}

impl Value {
    /// `Undefined` and `Null` both stand for "no receiver" in a call.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Value::Object(o) => o.borrow().is_callable(),
            _ => false,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => TYPE_STR_UNDEFINED,
            Value::Null => TYPE_STR_NULL,
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(o) => {
                if o.borrow().is_callable() {
                    "function"
                } else {
                    "object"
                }
            }
        }
    }

    fn expect_object(&self, property: &str) -> Result<&ObjectRef, ProtoError> {
        self.as_object().ok_or_else(|| {
            ProtoError::type_error(format!(
                "Cannot access property '{}' of {}",
                property,
                self.type_of()
            ))
        })
    }

    /// Reads `name` through the delegation chain.
    pub fn get(&self, name: &str) -> Result<Value, ProtoError> {
        let o = self.expect_object(name)?;
        Ok(get(o, &PropertyKey::from(name)))
    }

    /// Writes `name` as an own property of this value.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ProtoError> {
        let o = self.expect_object(name)?;
        if set(o, PropertyKey::from(name), value.into(), self) {
            Ok(())
        } else {
            Err(ProtoError::type_error(format!(
                "Cannot assign to read only property '{}'",
                name
            )))
        }
    }

    /// Method call syntax: looks `name` up and calls it with this value as receiver.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, ProtoError> {
        invoke(self, name, args)
    }

    /// Calls this value as a function with an explicit receiver.
    pub fn call(&self, this: Value, args: Vec<Value>) -> Result<Value, ProtoError> {
        call(self, this, args)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            Value::Null => write!(f, "{}", TYPE_STR_NULL),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(o) => write!(f, "{}", o.borrow().as_proto_object().to_string()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Value::Undefined"),
            Value::Null => write!(f, "Value::Null"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Number(n) => write!(f, "Value::Number({:?})", n),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Object(o) => write!(f, "Value::Object({})", o.borrow().as_proto_object().to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}
