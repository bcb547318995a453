use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::runtime::ds::function_object::FunctionObject;
use crate::runtime::ds::object_property::{PropertyDescriptor, PropertyKey};

pub type ObjectRef = Rc<RefCell<ObjectType>>;
pub type WeakObjectRef = Weak<RefCell<ObjectType>>;

pub enum ObjectType {
    Ordinary(OrdinaryObject),
    Function(FunctionObject),
}
impl ObjectType {
    pub fn is_callable(&self) -> bool {
        matches!(self, ObjectType::Function(_))
    }

    pub fn as_function(&self) -> Option<&FunctionObject> {
        match self {
            ObjectType::Function(f) => Some(f),
            ObjectType::Ordinary(_) => None,
        }
    }

    pub fn as_proto_object(&self) -> &dyn DelegatingObject {
        match self {
            ObjectType::Ordinary(o) => o,
            ObjectType::Function(o) => o,
        }
    }

    pub fn as_proto_object_mut(&mut self) -> &mut dyn DelegatingObject {
        match self {
            ObjectType::Ordinary(o) => o,
            ObjectType::Function(o) => o,
        }
    }
}

/// How an object holds its delegate. A weak delegate does not keep the
/// delegate alive and reads as absent once it is gone.
enum Delegate {
    Strong(ObjectRef),
    Weak(WeakObjectRef),
}

pub struct ObjectBase {
    properties: IndexMap<PropertyKey, PropertyDescriptor>,
    prototype: Option<Delegate>,
}
impl ObjectBase {
    pub fn new() -> Self {
        ObjectBase {
            properties: IndexMap::new(),
            prototype: None,
        }
    }

    pub fn with_prototype(prototype: Option<ObjectRef>) -> Self {
        ObjectBase {
            properties: IndexMap::new(),
            prototype: prototype.map(Delegate::Strong),
        }
    }

    pub fn with_weak_prototype(prototype: &ObjectRef) -> Self {
        ObjectBase {
            properties: IndexMap::new(),
            prototype: Some(Delegate::Weak(Rc::downgrade(prototype))),
        }
    }
}

impl Default for ObjectBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Own-property storage plus a single delegate. Lookups that walk the chain
/// live in `operations::object` because they need the `Rc` of each level.
pub trait DelegatingObject {
    fn get_object_base(&self) -> &ObjectBase;

    fn get_object_base_mut(&mut self) -> &mut ObjectBase;

    fn get_prototype_of(&self) -> Option<ObjectRef> {
        match &self.get_object_base().prototype {
            Some(Delegate::Strong(prototype)) => Some(prototype.clone()),
            Some(Delegate::Weak(prototype)) => prototype.upgrade(),
            None => None,
        }
    }

    /// Replaces the delegate without any cycle check; see
    /// `operations::object::set_prototype_of`. The new delegate is held strongly.
    fn replace_prototype(&mut self, prototype: Option<ObjectRef>) {
        self.get_object_base_mut().prototype = prototype.map(Delegate::Strong);
    }

    fn get_own_property(&self, property: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.get_object_base().properties.get(property)
    }

    fn has_own_property(&self, property: &PropertyKey) -> bool {
        self.get_object_base().properties.contains_key(property)
    }

    /// Redefining keeps the key's original position.
    fn define_own_property(&mut self, property: PropertyKey, descriptor: PropertyDescriptor) -> bool {
        if let Some(current) = self.get_own_property(&property) {
            if !current.configurable {
                if descriptor.configurable || descriptor.enumerable != current.enumerable {
                    return false;
                }
                if !current.writable && (descriptor.writable || descriptor.value() != current.value()) {
                    return false;
                }
            }
        }
        self.get_object_base_mut().properties.insert(property, descriptor);
        true
    }

    fn delete(&mut self, property: &PropertyKey) -> bool {
        match self.get_own_property(property) {
            None => true,
            Some(pd) => {
                if pd.configurable {
                    self.get_object_base_mut().properties.shift_remove(property);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// String keys in insertion order, then symbol keys in insertion order.
    fn own_property_keys(&self) -> Vec<PropertyKey> {
        let (mut keys, sym_keys): (Vec<PropertyKey>, Vec<PropertyKey>) = self
            .get_object_base()
            .properties
            .keys()
            .cloned()
            .partition(|key| matches!(key, PropertyKey::Str(_)));
        keys.extend(sym_keys);
        keys
    }

    fn to_string(&self) -> String {
        "[object Object]".to_string()
    }
}

pub struct OrdinaryObject {
    base: ObjectBase,
}
impl OrdinaryObject {
    pub fn new(prototype: Option<ObjectRef>) -> Self {
        OrdinaryObject {
            base: ObjectBase::with_prototype(prototype),
        }
    }

    pub fn with_weak_prototype(prototype: &ObjectRef) -> Self {
        OrdinaryObject {
            base: ObjectBase::with_weak_prototype(prototype),
        }
    }
}
impl DelegatingObject for OrdinaryObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}

/// Creates an ordinary object delegating to `prototype`.
pub fn object_create(prototype: Option<ObjectRef>) -> ObjectRef {
    Rc::new(RefCell::new(ObjectType::Ordinary(OrdinaryObject::new(prototype))))
}

/// Creates an ordinary object delegating to `prototype` without owning it.
pub fn object_create_weak(prototype: &ObjectRef) -> ObjectRef {
    Rc::new(RefCell::new(ObjectType::Ordinary(OrdinaryObject::with_weak_prototype(prototype))))
}
