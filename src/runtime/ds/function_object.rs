use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::object::{object_create, DelegatingObject, ObjectBase, ObjectRef, ObjectType};
use crate::runtime::ds::object_property::PropertyDescriptor;
use crate::runtime::ds::value::Value;

/// Function signature for every callable. Receives the call-time receiver
/// (`Value::Undefined` when called without one) and the arguments.
pub type NativeFn = Rc<dyn Fn(Value, Vec<Value>) -> Result<Value, ProtoError>>;

pub const PROTOTYPE_PROPERTY: &str = "prototype";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// User code.
    Normal,
    /// Per-instance wrapper that late-binds a blueprint member.
    PublicWrapper,
    /// Soft-bound copy of a private method.
    PrivateBinding,
    /// Hard-bound to a fixed receiver.
    Bound,
    /// `callSuper`, bound to one blueprint level.
    SuperDispatch,
    /// Composed `init` running several initializers in order.
    InitializerChain,
    /// `instantiate`, `extend` and `mixIn`.
    Intrinsic,
}

pub struct FunctionObject {
    name: String,
    kind: FunctionKind,
    behaviour: NativeFn,
    object_base: ObjectBase,
}
impl FunctionObject {
    pub fn new(name: impl Into<String>, kind: FunctionKind, behaviour: NativeFn) -> Self {
        FunctionObject {
            name: name.into(),
            kind,
            behaviour,
            object_base: ObjectBase::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn behaviour(&self) -> NativeFn {
        self.behaviour.clone()
    }
}
impl DelegatingObject for FunctionObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.object_base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.object_base
    }

    fn to_string(&self) -> String {
        format!("function {}() {{ [native code] }}", self.name)
    }
}

pub fn new_function<F>(name: impl Into<String>, kind: FunctionKind, f: F) -> Value
where
    F: Fn(Value, Vec<Value>) -> Result<Value, ProtoError> + 'static,
{
    Value::Object(Rc::new(RefCell::new(ObjectType::Function(FunctionObject::new(
        name,
        kind,
        Rc::new(f),
    )))))
}

/// Wraps a Rust closure as a callable value.
pub fn native_function<F>(name: impl Into<String>, f: F) -> Value
where
    F: Fn(Value, Vec<Value>) -> Result<Value, ProtoError> + 'static,
{
    new_function(name, FunctionKind::Normal, f)
}

/// A constructor-style function: a callable carrying its own (non-enumerable)
/// `prototype` object on which instance methods are placed.
pub fn new_constructor<F>(name: impl Into<String>, f: F) -> Value
where
    F: Fn(Value, Vec<Value>) -> Result<Value, ProtoError> + 'static,
{
    let constructor = native_function(name, f);
    if let Value::Object(o) = &constructor {
        o.borrow_mut().as_proto_object_mut().define_own_property(
            PROTOTYPE_PROPERTY.into(),
            PropertyDescriptor::new_hidden(Value::Object(object_create(None))),
        );
    }
    constructor
}

pub fn function_kind(f: &Value) -> Option<FunctionKind> {
    f.as_object()
        .and_then(|o| o.borrow().as_function().map(|f| f.kind()))
}

fn function_name(f: &Value) -> String {
    match f {
        Value::Object(o) => match o.borrow().as_function() {
            Some(func) => func.name().to_string(),
            None => "object".to_string(),
        },
        other => other.to_string(),
    }
}

/// Calls `f` with `this` as receiver. The function's borrow is released before
/// the body runs, so the body may freely read and write the function object.
pub fn call(f: &Value, this: Value, args: Vec<Value>) -> Result<Value, ProtoError> {
    let behaviour = f
        .as_object()
        .and_then(|o| o.borrow().as_function().map(|func| func.behaviour()));
    match behaviour {
        Some(behaviour) => behaviour(this, args),
        None => Err(ProtoError::type_error(format!(
            "'{}' is not a function",
            function_name(f)
        ))),
    }
}

/// Returns a function that always runs `target` against `bound_this`,
/// whatever receiver it is later called with. The binding does not keep
/// `bound_this` alive; calling it after `bound_this` is gone is a `TypeError`.
pub fn bind_function(target: &Value, bound_this: &ObjectRef) -> Result<Value, ProtoError> {
    if !target.is_callable() {
        return Err(ProtoError::type_error(format!(
            "'{}' is not a function",
            function_name(target)
        )));
    }
    let name = format!("bound {}", function_name(target));
    let target = target.clone();
    let bound_this = Rc::downgrade(bound_this);
    Ok(new_function(name.clone(), FunctionKind::Bound, move |_this, args| {
        match bound_this.upgrade() {
            Some(receiver) => call(&target, Value::Object(receiver), args),
            None => Err(ProtoError::type_error(format!(
                "'{}' outlived its receiver",
                name
            ))),
        }
    }))
}
