//! Blueprint construction options.

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::object::object_create;
use crate::runtime::ds::object_property::PropertyDescriptor;
use crate::runtime::ds::operations::object::define_property;
use crate::runtime::ds::value::Value;

/// Option key for the parent blueprint in the dynamic options object.
pub const OPTION_SUPER_PROTO: &str = "superProto";
/// Option key for the mixin switch in the dynamic options object.
pub const OPTION_ALLOW_MIXINS: &str = "allowMixins";

/// Options accepted by `create`, `extend` and `convert`.
#[derive(Debug, Clone)]
pub struct ProtoOptions {
    /// Parent to delegate to. Must be an object; validated by `create`.
    pub super_proto: Option<Value>,
    /// Whether instances accept `mixIn`.
    pub allow_mixins: bool,
}

impl ProtoOptions {
    pub fn new() -> Self {
        ProtoOptions {
            super_proto: None,
            allow_mixins: true,
        }
    }

    pub fn with_super_proto(mut self, super_proto: impl Into<Value>) -> Self {
        self.super_proto = Some(super_proto.into());
        self
    }

    pub fn with_allow_mixins(mut self, allow_mixins: bool) -> Self {
        self.allow_mixins = allow_mixins;
        self
    }

    /// Reads `{ superProto, allowMixins }`. `Undefined` and `Null` yield the
    /// defaults; any other non-object is a configuration error.
    pub fn from_value(value: &Value) -> Result<Self, ProtoError> {
        if value.is_nullish() {
            return Ok(Self::new());
        }
        if !value.is_object() {
            return Err(ProtoError::configuration("Given options is not an object."));
        }
        let super_proto = match value.get(OPTION_SUPER_PROTO)? {
            Value::Undefined => None,
            other => Some(other),
        };
        let allow_mixins = match value.get(OPTION_ALLOW_MIXINS)? {
            Value::Undefined => true,
            Value::Boolean(b) => b,
            other => {
                return Err(ProtoError::configuration(format!(
                    "Option {} must be a boolean, got {}.",
                    OPTION_ALLOW_MIXINS,
                    other.type_of()
                )))
            }
        };
        Ok(ProtoOptions {
            super_proto,
            allow_mixins,
        })
    }

    pub fn to_value(&self) -> Value {
        let o = object_create(None);
        if let Some(super_proto) = &self.super_proto {
            define_property(
                &o,
                OPTION_SUPER_PROTO.into(),
                PropertyDescriptor::new_data(super_proto.clone()),
            );
        }
        define_property(
            &o,
            OPTION_ALLOW_MIXINS.into(),
            PropertyDescriptor::new_data(Value::Boolean(self.allow_mixins)),
        );
        Value::Object(o)
    }
}

impl Default for ProtoOptions {
    fn default() -> Self {
        Self::new()
    }
}
