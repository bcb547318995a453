//! Builder for property bags.

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::native_function;
use crate::runtime::ds::object::object_create;
use crate::runtime::ds::object_property::PropertyDescriptor;
use crate::runtime::ds::operations::object::define_property;
use crate::runtime::ds::value::Value;
use crate::runtime::proto::{PRIVATE_KEY, STATICS_KEY};

/// A property bag under construction.
///
/// ```
/// use protomatter::{create, PropertyBag, ProtoOptions, Value};
///
/// let counter = create(
///     PropertyBag::new()
///         .add_method("init", |this, _args| {
///             this.set("count", 0)?;
///             Ok(Value::Undefined)
///         })
///         .add_method("getCount", |this, _args| this.get("count"))
///         .into_value(),
///     ProtoOptions::default(),
/// )
/// .unwrap();
/// let c = counter.instantiate(vec![]).unwrap();
/// assert_eq!(c.call("getCount", vec![]).unwrap(), Value::from(0));
/// ```
#[derive(Default)]
pub struct PropertyBag {
    members: Vec<(String, Value)>,
    private: Option<Box<PropertyBag>>,
    statics: Option<Box<PropertyBag>>,
}

impl PropertyBag {
    pub fn new() -> Self {
        PropertyBag::default()
    }

    /// Add a method backed by a Rust closure.
    pub fn add_method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Result<Value, ProtoError> + 'static,
    {
        let name = name.into();
        let f = native_function(name.clone(), func);
        self.members.push((name, f));
        self
    }

    /// Add a data member (or an already built function value).
    pub fn add_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }

    /// Set the private-method mapping.
    pub fn with_private(mut self, private: PropertyBag) -> Self {
        self.private = Some(Box::new(private));
        self
    }

    /// Set the blueprint-only members.
    pub fn with_statics(mut self, statics: PropertyBag) -> Self {
        self.statics = Some(Box::new(statics));
        self
    }

    pub fn into_value(self) -> Value {
        let o = object_create(None);
        for (name, value) in self.members {
            define_property(&o, name.into(), PropertyDescriptor::new_data(value));
        }
        if let Some(private) = self.private {
            define_property(
                &o,
                PRIVATE_KEY.into(),
                PropertyDescriptor::new_data(private.into_value()),
            );
        }
        if let Some(statics) = self.statics {
            define_property(
                &o,
                STATICS_KEY.into(),
                PropertyDescriptor::new_data(statics.into_value()),
            );
        }
        Value::Object(o)
    }
}

impl From<PropertyBag> for Value {
    fn from(bag: PropertyBag) -> Self {
        bag.into_value()
    }
}
