//! Blueprint construction and the `instantiate` / `extend` intrinsics.

use tracing::debug;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::{call, new_function, FunctionKind};
use crate::runtime::ds::object::{object_create, ObjectRef};
use crate::runtime::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runtime::ds::operations::object::{define_property, get, lookup, own_enumerable_entries};
use crate::runtime::ds::operations::test_and_comparison::same_object;
use crate::runtime::ds::symbol::{SYMBOL_ALLOW_MIXINS, SYMBOL_PRIVATE_METHODS, SYMBOL_STATICS};
use crate::runtime::ds::value::Value;
use crate::runtime::proto::context::build_private_context;
use crate::runtime::proto::options::ProtoOptions;
use crate::runtime::proto::super_resolver::{dispatch, new_super_dispatch, with_super_level};
use crate::runtime::proto::{
    Blueprint, CALL_SUPER_KEY, EXTEND_KEY, INIT_KEY, INSTANTIATE_KEY, LEGACY_INIT_KEY, PRIVATE_KEY,
    STATICS_KEY,
};

/// Builds a blueprint from `bag`.
///
/// `bag` may be `Undefined` (empty), an object, or a function returning the
/// object; the function is called right away. The `private` and `statics`
/// keys are split off the public surface. All validation happens here, so a
/// malformed bag never yields a blueprint.
pub fn create(bag: Value, options: ProtoOptions) -> Result<Blueprint, ProtoError> {
    let bag = resolve_bag(bag)?;
    let super_proto = match options.super_proto {
        None => None,
        Some(v) if v.is_nullish() => None,
        Some(Value::Object(o)) => Some(o),
        Some(_) => {
            return Err(ProtoError::configuration(
                "Given superProto is not an object.",
            ))
        }
    };

    let mut public = vec![];
    let mut private = None;
    let mut statics = None;
    let mut legacy_init = None;
    if let Some(bag) = &bag {
        for (name, value) in own_enumerable_entries(bag) {
            match name.as_str() {
                PRIVATE_KEY => private = expect_mapping(&value, PRIVATE_KEY)?,
                STATICS_KEY => statics = expect_mapping(&value, STATICS_KEY)?,
                LEGACY_INIT_KEY => legacy_init = Some(value),
                _ => public.push((name, value)),
            }
        }
    }
    if let Some(initialize) = legacy_init {
        let name = if public.iter().any(|(name, _)| name == INIT_KEY) {
            LEGACY_INIT_KEY
        } else {
            INIT_KEY
        };
        public.push((name.to_string(), initialize));
    }

    let blueprint = object_create(super_proto.clone());
    let public_count = public.len();
    for (name, value) in public {
        define_property(&blueprint, name.into(), PropertyDescriptor::new_data(value));
    }

    let mut static_count = 0;
    if let Some(statics) = &statics {
        let members = own_enumerable_entries(statics);
        static_count = members.len();
        for (name, value) in members {
            define_property(&blueprint, name.into(), PropertyDescriptor::new_data(value));
        }
        define_property(
            &blueprint,
            PropertyKey::from(&*SYMBOL_STATICS),
            PropertyDescriptor::new_hidden(Value::Object(copy_mapping(statics))),
        );
    }

    let mut private_count = 0;
    if let Some(private) = &private {
        let copy = copy_mapping(private);
        private_count = own_enumerable_entries(&copy).len();
        define_property(
            &blueprint,
            PropertyKey::from(&*SYMBOL_PRIVATE_METHODS),
            PropertyDescriptor::new_hidden(Value::Object(copy)),
        );
    }

    define_property(
        &blueprint,
        PropertyKey::from(&*SYMBOL_ALLOW_MIXINS),
        PropertyDescriptor::new_hidden(Value::Boolean(options.allow_mixins)),
    );
    define_property(
        &blueprint,
        INSTANTIATE_KEY.into(),
        PropertyDescriptor::new_data(new_function(
            INSTANTIATE_KEY,
            FunctionKind::Intrinsic,
            instantiate,
        )),
    );
    define_property(
        &blueprint,
        EXTEND_KEY.into(),
        PropertyDescriptor::new_data(new_function(EXTEND_KEY, FunctionKind::Intrinsic, extend)),
    );
    if super_proto.is_some() {
        define_property(
            &blueprint,
            CALL_SUPER_KEY.into(),
            PropertyDescriptor::new_data(new_super_dispatch(&blueprint)),
        );
    }

    debug!(
        public = public_count,
        private = private_count,
        statics = static_count,
        has_parent = super_proto.is_some(),
        allow_mixins = options.allow_mixins,
        "created prototype"
    );
    Ok(Blueprint::new(blueprint))
}

fn resolve_bag(bag: Value) -> Result<Option<ObjectRef>, ProtoError> {
    if bag.is_nullish() {
        return Ok(None);
    }
    let bag = if bag.is_callable() {
        call(&bag, Value::Undefined, vec![])?
    } else {
        bag
    };
    match bag {
        v if v.is_nullish() => Ok(None),
        Value::Object(o) if !o.borrow().is_callable() => Ok(Some(o)),
        other => Err(ProtoError::configuration(format!(
            "Given properties is not an object (got {}).",
            other.type_of()
        ))),
    }
}

/// A mapping member (`private`, `statics`) must be a plain object when present.
pub(crate) fn expect_mapping(value: &Value, key: &str) -> Result<Option<ObjectRef>, ProtoError> {
    match value {
        v if v.is_nullish() => Ok(None),
        Value::Object(o) if !value.is_callable() => Ok(Some(o.clone())),
        _ => Err(ProtoError::configuration(format!(
            "Given {} is not an object.",
            key
        ))),
    }
}

fn copy_mapping(source: &ObjectRef) -> ObjectRef {
    let copy = object_create(None);
    for (name, value) in own_enumerable_entries(source) {
        define_property(&copy, name.into(), PropertyDescriptor::new_data(value));
    }
    copy
}

/// The `allowMixins` setting in effect for `blueprint` (nearest level wins).
pub(crate) fn allow_mixins_of(blueprint: &ObjectRef) -> bool {
    get(blueprint, &PropertyKey::from(&*SYMBOL_ALLOW_MIXINS))
        .as_bool()
        .unwrap_or(true)
}

fn instantiate(this: Value, args: Vec<Value>) -> Result<Value, ProtoError> {
    let blueprint = match &this {
        Value::Object(o) => o.clone(),
        other => {
            return Err(ProtoError::type_error(format!(
                "Cannot instantiate from {}",
                other.type_of()
            )))
        }
    };
    let instance = object_create(Some(blueprint.clone()));
    let context = build_private_context(&instance, &blueprint);
    let allow_mixins = allow_mixins_of(&blueprint);
    define_property(
        &context,
        PropertyKey::from(&*SYMBOL_ALLOW_MIXINS),
        PropertyDescriptor::new_hidden(Value::Boolean(allow_mixins)),
    );
    run_init(&blueprint, &context, args)?;
    debug!(allow_mixins, "instantiated prototype");
    Ok(Value::Object(instance))
}

/// An own `init` runs directly against the context; an inherited one goes
/// through super dispatch so that the defining level is tracked.
fn run_init(blueprint: &ObjectRef, context: &ObjectRef, args: Vec<Value>) -> Result<(), ProtoError> {
    let receiver = Value::Object(context.clone());
    match lookup(blueprint, &INIT_KEY.into()) {
        Some((owner, init)) if init.is_callable() => {
            if same_object(&owner, blueprint) {
                with_super_level(&receiver, blueprint, || call(&init, receiver.clone(), args))?;
            } else {
                dispatch(blueprint, &receiver, INIT_KEY, args)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn extend(this: Value, args: Vec<Value>) -> Result<Value, ProtoError> {
    let mut args = args.into_iter();
    let bag = args.next().unwrap_or_default();
    let options = ProtoOptions::from_value(&args.next().unwrap_or_default())?.with_super_proto(this);
    Ok(create(bag, options)?.as_value())
}
