use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::call;
use crate::runtime::ds::object::ObjectRef;
use crate::runtime::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runtime::ds::operations::test_and_comparison::same_object;
use crate::runtime::ds::value::Value;

/// Finds `p` along the chain starting at `o`, returning the level that owns it
/// together with its value.
pub fn lookup(o: &ObjectRef, p: &PropertyKey) -> Option<(ObjectRef, Value)> {
    let mut current = Some(o.clone());
    while let Some(level) = current {
        let (found, next) = {
            let b = level.borrow();
            let obj = b.as_proto_object();
            (
                obj.get_own_property(p).map(|d| d.value()),
                obj.get_prototype_of(),
            )
        };
        if let Some(value) = found {
            return Some((level, value));
        }
        current = next;
    }
    None
}

pub fn get(o: &ObjectRef, p: &PropertyKey) -> Value {
    lookup(o, p).map(|(_, v)| v).unwrap_or(Value::Undefined)
}

pub fn get_own(o: &ObjectRef, p: &PropertyKey) -> Option<Value> {
    o.borrow()
        .as_proto_object()
        .get_own_property(p)
        .map(|d| d.value())
}

pub fn get_own_descriptor(o: &ObjectRef, p: &PropertyKey) -> Option<PropertyDescriptor> {
    o.borrow().as_proto_object().get_own_property(p).cloned()
}

pub fn has_own_property(o: &ObjectRef, p: &PropertyKey) -> bool {
    o.borrow().as_proto_object().has_own_property(p)
}

pub fn get_prototype_of(o: &ObjectRef) -> Option<ObjectRef> {
    o.borrow().as_proto_object().get_prototype_of()
}

/// Assignment. An inherited read-only property blocks the write; otherwise the
/// value always lands as an own property of `receiver`.
pub fn set(o: &ObjectRef, p: PropertyKey, value: Value, receiver: &Value) -> bool {
    if let Some((owner, _)) = lookup(o, &p) {
        let writable = owner
            .borrow()
            .as_proto_object()
            .get_own_property(&p)
            .map(|d| d.writable)
            .unwrap_or(true);
        if !writable {
            return false;
        }
    }
    let target = match receiver {
        Value::Object(r) => r,
        _ => return false,
    };
    let mut b = target.borrow_mut();
    let obj = b.as_proto_object_mut();
    let descriptor = match obj.get_own_property(&p) {
        Some(current) => current.with_value(value),
        None => PropertyDescriptor::new_data(value),
    };
    obj.define_own_property(p, descriptor)
}

pub fn define_property(o: &ObjectRef, p: PropertyKey, descriptor: PropertyDescriptor) -> bool {
    o.borrow_mut().as_proto_object_mut().define_own_property(p, descriptor)
}

pub fn define_property_or_throw(
    o: &ObjectRef,
    p: PropertyKey,
    descriptor: PropertyDescriptor,
) -> Result<(), ProtoError> {
    let name = p.to_string();
    if define_property(o, p, descriptor) {
        Ok(())
    } else {
        Err(ProtoError::type_error(format!(
            "Cannot define property '{}'",
            name
        )))
    }
}

pub fn delete(o: &ObjectRef, p: &PropertyKey) -> bool {
    o.borrow_mut().as_proto_object_mut().delete(p)
}

/// Own, enumerable, string-keyed members in insertion order.
pub fn own_enumerable_entries(o: &ObjectRef) -> Vec<(String, Value)> {
    let b = o.borrow();
    let obj = b.as_proto_object();
    obj.own_property_keys()
        .into_iter()
        .filter_map(|key| {
            let desc = obj.get_own_property(&key)?;
            match key {
                PropertyKey::Str(name) if desc.enumerable => Some((name, desc.value())),
                _ => None,
            }
        })
        .collect()
}

/// `o` followed by each of its delegates, nearest first.
pub fn prototype_chain(o: &ObjectRef) -> Vec<ObjectRef> {
    let mut chain = vec![];
    let mut current = Some(o.clone());
    while let Some(level) = current {
        current = get_prototype_of(&level);
        chain.push(level);
    }
    chain
}

/// Changes the delegate of `o`. Refuses (returns false) when the change would
/// close a cycle.
pub fn set_prototype_of(o: &ObjectRef, prototype: Option<ObjectRef>) -> bool {
    if let Some(new_proto) = &prototype {
        if prototype_chain(new_proto).iter().any(|p| same_object(p, o)) {
            // To prevent circular chain
            return false;
        }
    }
    o.borrow_mut().as_proto_object_mut().replace_prototype(prototype);
    true
}

/// True when `proto` sits anywhere on the delegation chain of `v`.
pub fn is_prototype_of(proto: &ObjectRef, v: &Value) -> bool {
    match v {
        Value::Object(o) => prototype_chain(o)
            .iter()
            .skip(1)
            .any(|level| same_object(level, proto)),
        _ => false,
    }
}

/// `v.name(...args)`.
pub fn invoke(v: &Value, name: &str, args: Vec<Value>) -> Result<Value, ProtoError> {
    let f = v.get(name)?;
    if !f.is_callable() {
        return Err(ProtoError::type_error(format!("'{}' is not a function", name)));
    }
    call(&f, v.clone(), args)
}
