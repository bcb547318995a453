//! Turning a constructor function into a blueprint.

use tracing::debug;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::PROTOTYPE_PROPERTY;
use crate::runtime::ds::object::object_create;
use crate::runtime::ds::object_property::PropertyDescriptor;
use crate::runtime::ds::operations::object::{define_property, get_prototype_of, own_enumerable_entries};
use crate::runtime::ds::value::Value;
use crate::runtime::proto::factory::create;
use crate::runtime::proto::options::ProtoOptions;
use crate::runtime::proto::{Blueprint, INIT_KEY};

const CONSTRUCTOR_KEY: &str = "constructor";

/// Builds a blueprint whose `init` is `constructor_like` and whose members are
/// the own enumerable members of its `prototype` object. When that object
/// delegates somewhere, the delegate becomes the parent and overrides
/// `options.super_proto`.
pub fn convert(constructor_like: &Value, options: ProtoOptions) -> Result<Blueprint, ProtoError> {
    if !constructor_like.is_callable() {
        return Err(ProtoError::configuration(format!(
            "Given constructor is not a function (got {}).",
            constructor_like.type_of()
        )));
    }
    let surface = match constructor_like.get(PROTOTYPE_PROPERTY)? {
        Value::Object(surface) => surface,
        _ => {
            return Err(ProtoError::configuration(
                "Given constructor has no prototype object.",
            ))
        }
    };

    let bag = object_create(None);
    for (name, value) in own_enumerable_entries(&surface) {
        if name == CONSTRUCTOR_KEY {
            continue;
        }
        define_property(&bag, name.into(), PropertyDescriptor::new_data(value));
    }
    define_property(
        &bag,
        INIT_KEY.into(),
        PropertyDescriptor::new_data(constructor_like.clone()),
    );

    let mut options = options;
    let inherited = get_prototype_of(&surface);
    if let Some(parent) = &inherited {
        options.super_proto = Some(Value::Object(parent.clone()));
    }
    debug!(inherited = inherited.is_some(), "converted constructor");
    create(Value::Object(bag), options)
}
