//! Per-instance private contexts.
//!
//! The context delegates to its instance, carries soft-bound copies of every
//! private method on the blueprint chain and is the receiver that public
//! wrappers substitute for the instance.
//!
//! The instance is the only strong owner of its context, through a hidden
//! symbol slot. Every link back from the context to the instance (its
//! delegate and the default `public`) is weak, and so are the wrappers,
//! soft bindings and `mixIn`, so dropping the last handle to an instance
//! frees both.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::{bind_function, call, function_kind, new_function, FunctionKind};
use crate::runtime::ds::object::{object_create_weak, ObjectRef, WeakObjectRef};
use crate::runtime::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runtime::ds::operations::object::{
    define_property, define_property_or_throw, get, get_own, get_prototype_of, has_own_property,
    lookup, own_enumerable_entries, prototype_chain,
};
use crate::runtime::ds::operations::test_and_comparison::is_same_object_value;
use crate::runtime::ds::symbol::{
    SYMBOL_ALLOW_MIXINS, SYMBOL_PRIVATE_CONTEXT, SYMBOL_PRIVATE_METHODS, SYMBOL_STATICS,
};
use crate::runtime::ds::value::Value;
use crate::runtime::proto::super_resolver::with_super_level;
use crate::runtime::proto::{EXTEND_KEY, INSTANTIATE_KEY, MIX_IN_KEY, PUBLIC_KEY, STRUCTURAL_MEMBERS};

/// Builds the private context of `instance` and installs the instance's
/// public surface (wrappers, shadows and `mixIn`).
pub(crate) fn build_private_context(instance: &ObjectRef, blueprint: &ObjectRef) -> ObjectRef {
    let context = object_create_weak(instance);
    define_property(
        instance,
        PropertyKey::from(&*SYMBOL_PRIVATE_CONTEXT),
        PropertyDescriptor::new_hidden(Value::Object(context.clone())),
    );
    let chain = prototype_chain(blueprint);

    let private_count = install_private_methods(&context, instance, &chain);
    let statics = static_member_names(&chain);
    install_shadows(instance, &statics);
    let wrapper_count = install_public_wrappers(&context, instance, blueprint, &chain, &statics);

    define_property(&context, PUBLIC_KEY.into(), PropertyDescriptor::new_weak_data(instance));
    let mix_in_context = Rc::downgrade(&context);
    define_property(
        instance,
        MIX_IN_KEY.into(),
        PropertyDescriptor::new_hidden(new_function(
            MIX_IN_KEY,
            FunctionKind::Intrinsic,
            move |_this, args| {
                let context = upgrade_context(&mix_in_context)?;
                mix_in(&context, args.into_iter().next().unwrap_or_default())?;
                Ok(Value::Undefined)
            },
        )),
    );

    trace!(
        private = private_count,
        wrappers = wrapper_count,
        statics = statics.len(),
        "built private context"
    );
    context
}

/// Nearest level wins, so a private method redefined lower in the chain
/// hides the ancestor's.
fn install_private_methods(context: &ObjectRef, instance: &ObjectRef, chain: &[ObjectRef]) -> usize {
    let mut installed = 0;
    for level in chain {
        let mapping = match get_own(level, &PropertyKey::from(&*SYMBOL_PRIVATE_METHODS)) {
            Some(Value::Object(mapping)) => mapping,
            _ => continue,
        };
        for (name, member) in own_enumerable_entries(&mapping) {
            let key = PropertyKey::from(name.as_str());
            if has_own_property(context, &key) {
                continue;
            }
            let value = if member.is_callable() {
                soft_bind(&name, &member, context, instance)
            } else {
                member
            };
            define_property(context, key, PropertyDescriptor::new_data(value));
            installed += 1;
        }
    }
    installed
}

fn static_member_names(chain: &[ObjectRef]) -> HashSet<String> {
    chain
        .iter()
        .filter_map(|level| match get_own(level, &PropertyKey::from(&*SYMBOL_STATICS)) {
            Some(Value::Object(statics)) => Some(statics),
            _ => None,
        })
        .flat_map(|statics| own_enumerable_entries(&statics))
        .map(|(name, _)| name)
        .collect()
}

/// Blueprint-only members read as `Undefined` on instances.
fn install_shadows(instance: &ObjectRef, statics: &HashSet<String>) {
    let names = [INSTANTIATE_KEY, EXTEND_KEY]
        .iter()
        .map(|name| name.to_string())
        .chain(statics.iter().cloned());
    for name in names {
        define_property(instance, name.into(), PropertyDescriptor::new_shadow());
    }
}

fn install_public_wrappers(
    context: &ObjectRef,
    instance: &ObjectRef,
    blueprint: &ObjectRef,
    chain: &[ObjectRef],
    statics: &HashSet<String>,
) -> usize {
    let mut installed = 0;
    for level in chain {
        for (name, member) in own_enumerable_entries(level) {
            if !member.is_callable()
                || STRUCTURAL_MEMBERS.contains(&name.as_str())
                || statics.contains(&name)
            {
                continue;
            }
            let key = PropertyKey::from(name.as_str());
            if has_own_property(instance, &key) {
                continue;
            }
            let wrapper = public_wrapper(&name, blueprint, instance, context);
            define_property(instance, key, PropertyDescriptor::new_data(wrapper));
            installed += 1;
        }
    }
    installed
}

/// The context of the instance a wrapper was built for.
fn upgrade_context(context: &WeakObjectRef) -> Result<ObjectRef, ProtoError> {
    context
        .upgrade()
        .ok_or_else(|| ProtoError::type_error("Instance no longer exists"))
}

/// The receiver a method should run with: the context when the caller gave
/// none or gave the instance itself, otherwise whatever the caller gave.
fn select_receiver(this: Value, instance: &WeakObjectRef, context: &ObjectRef) -> Value {
    let defaults = this.is_nullish()
        || instance
            .upgrade()
            .is_some_and(|instance| is_same_object_value(&this, &instance));
    if defaults {
        Value::Object(context.clone())
    } else {
        this
    }
}

/// A private method that defaults its receiver to the context but still
/// honours an explicit one.
fn soft_bind(name: &str, method: &Value, context: &ObjectRef, instance: &ObjectRef) -> Value {
    let target = method.clone();
    let context = Rc::downgrade(context);
    let instance = Rc::downgrade(instance);
    new_function(name, FunctionKind::PrivateBinding, move |this, args| {
        let receiver = match context.upgrade() {
            Some(context) => select_receiver(this, &instance, &context),
            None => this,
        };
        call(&target, receiver, args)
    })
}

/// Looks `name` up on the blueprint at call time, so replacing a blueprint
/// method is seen by instances created earlier.
fn public_wrapper(name: &str, blueprint: &ObjectRef, instance: &ObjectRef, context: &ObjectRef) -> Value {
    let key = PropertyKey::from(name);
    let method_name = name.to_string();
    let blueprint = blueprint.clone();
    let instance = Rc::downgrade(instance);
    let context = Rc::downgrade(context);
    new_function(name, FunctionKind::PublicWrapper, move |this, args| {
        let context = upgrade_context(&context)?;
        let receiver = select_receiver(this, &instance, &context);
        let (owner, method) = match lookup(&blueprint, &key) {
            Some((owner, method)) if method.is_callable() => (owner, method),
            _ => {
                return Err(ProtoError::type_error(format!(
                    "'{}' is not a function",
                    method_name
                )))
            }
        };
        trace!(method = %method_name, "public dispatch");
        let in_context = is_same_object_value(&receiver, &context);
        if in_context && function_kind(&method) != Some(FunctionKind::SuperDispatch) {
            with_super_level(&receiver, &owner, || call(&method, receiver.clone(), args))
        } else {
            call(&method, receiver, args)
        }
    })
}

/// Whether the instance owning `context` accepts mixins.
pub fn allow_mixins(context: &ObjectRef) -> bool {
    get_own(context, &PropertyKey::from(&*SYMBOL_ALLOW_MIXINS))
        .and_then(|v| v.as_bool())
        .unwrap_or(true)
}

/// Copies the members of `bag` onto the context's published object. Functions
/// are hard-bound to the context without owning it.
pub(crate) fn mix_in(context: &ObjectRef, bag: Value) -> Result<(), ProtoError> {
    if !allow_mixins(context) {
        return Err(ProtoError::MixinsDisabledError);
    }
    let bag = match &bag {
        Value::Object(o) if !bag.is_callable() => o.clone(),
        other => {
            return Err(ProtoError::configuration(format!(
                "Given mixin is not an object (got {}).",
                other.type_of()
            )))
        }
    };
    let target = match get(context, &PUBLIC_KEY.into()) {
        Value::Object(public) => public,
        _ => get_prototype_of(context)
            .ok_or_else(|| ProtoError::type_error("Private context has no instance"))?,
    };
    let members = own_enumerable_entries(&bag);
    let count = members.len();
    for (name, value) in members {
        let value = if value.is_callable() {
            bind_function(&value, context)?
        } else {
            value
        };
        define_property_or_throw(&target, name.into(), PropertyDescriptor::new_data(value))?;
    }
    debug!(members = count, "applied mixin");
    Ok(())
}
