//! Blueprints, instances and their private contexts.
//!
//! A [`Blueprint`] is an ordinary object of the substrate that instances
//! delegate to. Each instance gets a hidden private context that becomes the
//! receiver of every method call made through the instance, so state written
//! by methods never shows up on the instance itself.

pub mod bag;
pub mod composer;
pub mod context;
pub mod converter;
pub mod factory;
pub mod options;
pub mod super_resolver;

use std::fmt;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::object::ObjectRef;
use crate::runtime::ds::operations::object::{get_prototype_of, is_prototype_of};
use crate::runtime::ds::value::Value;

pub use bag::PropertyBag;
pub use composer::compose;
pub use converter::convert;
pub use factory::create;
pub use options::ProtoOptions;

/// Bag key holding the private-method mapping.
pub const PRIVATE_KEY: &str = "private";
/// Bag key holding blueprint-only members.
pub const STATICS_KEY: &str = "statics";
pub const INIT_KEY: &str = "init";
/// Initializer name used before `init`.
pub const LEGACY_INIT_KEY: &str = "initialize";
pub const INSTANTIATE_KEY: &str = "instantiate";
pub const EXTEND_KEY: &str = "extend";
pub const CALL_SUPER_KEY: &str = "callSuper";
pub const MIX_IN_KEY: &str = "mixIn";
/// Context key through which private code reaches its instance.
pub const PUBLIC_KEY: &str = "public";

/// Members that belong to the blueprint itself and are never wrapped onto
/// instances.
pub(crate) const STRUCTURAL_MEMBERS: [&str; 3] = [INSTANTIATE_KEY, EXTEND_KEY, MIX_IN_KEY];

#[derive(Clone)]
pub struct Blueprint {
    object: ObjectRef,
}

impl Blueprint {
    pub(crate) fn new(object: ObjectRef) -> Self {
        Blueprint { object }
    }

    pub fn from_value(value: Value) -> Result<Self, ProtoError> {
        match value {
            Value::Object(object) => Ok(Blueprint { object }),
            other => Err(ProtoError::type_error(format!(
                "Expected a prototype object, got {}",
                other.type_of()
            ))),
        }
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.object.clone())
    }

    /// Runs the blueprint's current `instantiate` member.
    pub fn instantiate(&self, args: Vec<Value>) -> Result<Instance, ProtoError> {
        Instance::from_value(self.as_value().invoke(INSTANTIATE_KEY, args)?)
    }

    /// Runs the blueprint's current `extend` member.
    pub fn extend(&self, bag: impl Into<Value>, options: ProtoOptions) -> Result<Blueprint, ProtoError> {
        Blueprint::from_value(
            self.as_value()
                .invoke(EXTEND_KEY, vec![bag.into(), options.to_value()])?,
        )
    }

    pub fn get(&self, name: &str) -> Result<Value, ProtoError> {
        self.as_value().get(name)
    }

    /// Assigns a member. Replacing a method here is observed by existing instances.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ProtoError> {
        self.as_value().set(name, value)
    }

    pub fn parent(&self) -> Option<Blueprint> {
        get_prototype_of(&self.object).map(Blueprint::new)
    }

    /// The replacement for `instanceof`: true when this blueprint is on the
    /// delegation chain of `value`.
    pub fn is_prototype_of(&self, value: &Value) -> bool {
        is_prototype_of(&self.object, value)
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blueprint({:p})", self.object.as_ptr())
    }
}

#[derive(Clone)]
pub struct Instance {
    object: ObjectRef,
}

impl Instance {
    pub fn from_value(value: Value) -> Result<Self, ProtoError> {
        match value {
            Value::Object(object) => Ok(Instance { object }),
            other => Err(ProtoError::type_error(format!(
                "Expected an instance object, got {}",
                other.type_of()
            ))),
        }
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.object.clone())
    }

    /// `instance.name(...args)`.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, ProtoError> {
        self.as_value().invoke(name, args)
    }

    /// External read, as any holder of the instance would see it.
    pub fn get(&self, name: &str) -> Result<Value, ProtoError> {
        self.as_value().get(name)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ProtoError> {
        self.as_value().set(name, value)
    }

    pub fn mix_in(&self, bag: impl Into<Value>) -> Result<(), ProtoError> {
        self.call(MIX_IN_KEY, vec![bag.into()]).map(|_| ())
    }

    pub fn call_super(&self, name: &str, mut args: Vec<Value>) -> Result<Value, ProtoError> {
        args.insert(0, Value::from(name));
        self.call(CALL_SUPER_KEY, args)
    }

    pub fn get_prototype(&self) -> Option<Blueprint> {
        get_prototype_of(&self.object).map(Blueprint::new)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({:p})", self.object.as_ptr())
    }
}
