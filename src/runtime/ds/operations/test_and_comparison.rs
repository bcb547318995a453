use std::rc::Rc;

use crate::runtime::ds::object::ObjectRef;
use crate::runtime::ds::value::Value;

pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    Rc::ptr_eq(a, b)
}

/// True when `v` is exactly the object `o`.
pub fn is_same_object_value(v: &Value, o: &ObjectRef) -> bool {
    match v {
        Value::Object(v) => same_object(v, o),
        _ => false,
    }
}
