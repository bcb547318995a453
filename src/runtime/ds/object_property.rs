use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runtime::ds::object::{ObjectRef, WeakObjectRef};
use crate::runtime::ds::symbol::SymbolData;
use crate::runtime::ds::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Str(String),
    Sym(SymbolData),
}

impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Str(s) => write!(f, "{}", s),
            PropertyKey::Sym(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::Str(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::Str(s)
    }
}

impl From<&SymbolData> for PropertyKey {
    fn from(s: &SymbolData) -> Self {
        PropertyKey::Sym(s.clone())
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    /// An object the property does not own. Reads as `Undefined` once the
    /// object is gone.
    Weak(WeakObjectRef),
}

/// A data property. The substrate has no accessor properties.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    slot: Slot,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// What a plain assignment creates.
    pub fn new_data(value: Value) -> Self {
        PropertyDescriptor {
            slot: Slot::Value(value),
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Like `new_data`, but refers to `target` without keeping it alive.
    pub fn new_weak_data(target: &ObjectRef) -> Self {
        PropertyDescriptor {
            slot: Slot::Weak(Rc::downgrade(target)),
            ..Self::new_data(Value::Undefined)
        }
    }

    /// Writable and configurable, but skipped by enumeration.
    pub fn new_hidden(value: Value) -> Self {
        PropertyDescriptor {
            enumerable: false,
            ..Self::new_data(value)
        }
    }

    /// An `undefined` own property that masks an inherited member.
    pub fn new_shadow() -> Self {
        PropertyDescriptor {
            writable: false,
            enumerable: false,
            ..Self::new_data(Value::Undefined)
        }
    }

    pub fn value(&self) -> Value {
        match &self.slot {
            Slot::Value(value) => value.clone(),
            Slot::Weak(target) => target.upgrade().map(Value::Object).unwrap_or_default(),
        }
    }

    /// Same attributes, new (owned) value.
    pub fn with_value(&self, value: Value) -> Self {
        PropertyDescriptor {
            slot: Slot::Value(value),
            ..self.clone()
        }
    }
}

impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
            && self.writable == other.writable
            && self.enumerable == other.enumerable
            && self.configurable == other.configurable
    }
}
