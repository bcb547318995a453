//! `callSuper`: dispatch to the next level up that defines a method.
//!
//! A dispatcher is bound to one blueprint level. While a method found through
//! it runs, the receiver carries an own `callSuper` bound to the method's
//! defining level, so nested `callSuper` calls keep climbing from there
//! instead of restarting at the instance's nearest level.

use std::rc::Rc;

use tracing::trace;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::{call, new_function, FunctionKind};
use crate::runtime::ds::object::ObjectRef;
use crate::runtime::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runtime::ds::operations::object::{
    define_property, delete, get_own, get_own_descriptor, prototype_chain,
};
use crate::runtime::ds::value::Value;
use crate::runtime::proto::CALL_SUPER_KEY;

/// A `callSuper` function bound to `level`. Its first argument names the
/// method; the rest are forwarded.
pub(crate) fn new_super_dispatch(level: &ObjectRef) -> Value {
    let level = Rc::downgrade(level);
    new_function(CALL_SUPER_KEY, FunctionKind::SuperDispatch, move |this, args| {
        let level = level
            .upgrade()
            .ok_or_else(|| ProtoError::type_error("callSuper outlived its prototype"))?;
        let mut args = args.into_iter();
        let name = match args.next() {
            Some(Value::String(name)) => name,
            other => {
                return Err(ProtoError::type_error(format!(
                    "callSuper expects a method name, got {}",
                    other.unwrap_or_default().type_of()
                )))
            }
        };
        dispatch(&level, &this, &name, args.collect())
    })
}

/// First ancestor of `level` (excluding `level` itself) that defines `name`
/// as an own callable member, together with that member.
pub fn find_super_method(level: &ObjectRef, name: &str) -> Option<(ObjectRef, Value)> {
    let key = PropertyKey::from(name);
    prototype_chain(level)
        .into_iter()
        .skip(1)
        .find_map(|ancestor| match get_own(&ancestor, &key) {
            Some(method) if method.is_callable() => Some((ancestor, method)),
            _ => None,
        })
}

/// Runs the super implementation of `name` with `receiver`.
pub(crate) fn dispatch(
    level: &ObjectRef,
    receiver: &Value,
    name: &str,
    args: Vec<Value>,
) -> Result<Value, ProtoError> {
    let (owner, method) = find_super_method(level, name)
        .ok_or_else(|| ProtoError::MethodNotFoundError(name.to_string()))?;
    trace!(method = name, "super dispatch");
    with_super_level(receiver, &owner, || call(&method, receiver.clone(), args))
}

/// Runs `f` while `receiver` owns a `callSuper` bound to `level`. The previous
/// own `callSuper` (or its absence) is restored afterwards, also on error.
pub(crate) fn with_super_level<F>(receiver: &Value, level: &ObjectRef, f: F) -> Result<Value, ProtoError>
where
    F: FnOnce() -> Result<Value, ProtoError>,
{
    let target = match receiver {
        Value::Object(o) => o.clone(),
        _ => return f(),
    };
    let key = PropertyKey::from(CALL_SUPER_KEY);
    let previous = get_own_descriptor(&target, &key);
    if !define_property(
        &target,
        key.clone(),
        PropertyDescriptor::new_hidden(new_super_dispatch(level)),
    ) {
        return f();
    }
    let result = f();
    match previous {
        Some(descriptor) => {
            define_property(&target, key, descriptor);
        }
        None => {
            delete(&target, &key);
        }
    }
    result
}
