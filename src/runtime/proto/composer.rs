//! Merging several prototypes or bags into one blueprint.

use std::collections::HashSet;

use tracing::debug;

use crate::runtime::ds::error::ProtoError;
use crate::runtime::ds::function_object::{call, new_function, FunctionKind};
use crate::runtime::ds::object::{object_create, ObjectRef};
use crate::runtime::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runtime::ds::operations::object::{define_property, get_own, own_enumerable_entries};
use crate::runtime::ds::symbol::{SYMBOL_PRIVATE_METHODS, SYMBOL_STATICS};
use crate::runtime::ds::value::Value;
use crate::runtime::proto::factory::{create, expect_mapping};
use crate::runtime::proto::options::ProtoOptions;
use crate::runtime::proto::{
    Blueprint, CALL_SUPER_KEY, EXTEND_KEY, INIT_KEY, INSTANTIATE_KEY, LEGACY_INIT_KEY, PRIVATE_KEY,
    STATICS_KEY,
};

/// Composes `sources` (blueprints or plain bags) into a new root blueprint.
///
/// Members are merged in argument order, later sources overriding earlier
/// ones. Private mappings and statics are merged the same way. Every `init`
/// found is kept and the composed `init` runs them all in argument order
/// against the same receiver and arguments. Delegates of the sources are not
/// consulted.
pub fn compose(sources: Vec<Value>) -> Result<Blueprint, ProtoError> {
    if sources.len() < 2 {
        return Err(ProtoError::configuration(format!(
            "At least two prototypes are needed to compose, got {}.",
            sources.len()
        )));
    }
    let merged = object_create(None);
    let private = object_create(None);
    let statics = object_create(None);
    let mut initializers = vec![];

    for (position, source) in sources.iter().enumerate() {
        let source = match source {
            Value::Object(o) if !source.is_callable() => o,
            other => {
                return Err(ProtoError::configuration(format!(
                    "Prototype at position {} is not an object (got {}).",
                    position,
                    other.type_of()
                )))
            }
        };

        let hidden_statics = hidden_mapping(source, &PropertyKey::from(&*SYMBOL_STATICS));
        let static_names: HashSet<String> = hidden_statics
            .iter()
            .flat_map(own_enumerable_entries)
            .map(|(name, _)| name)
            .collect();
        if let Some(mapping) = hidden_mapping(source, &PropertyKey::from(&*SYMBOL_PRIVATE_METHODS)) {
            merge_into(&private, &mapping);
        }
        if let Some(mapping) = &hidden_statics {
            merge_into(&statics, mapping);
        }

        for (name, value) in own_enumerable_entries(source) {
            if static_names.contains(&name) {
                continue;
            }
            match name.as_str() {
                INIT_KEY => {
                    if value.is_callable() {
                        initializers.push(value);
                    }
                }
                PRIVATE_KEY => {
                    if let Some(mapping) = expect_mapping(&value, PRIVATE_KEY)? {
                        merge_into(&private, &mapping);
                    }
                }
                STATICS_KEY => {
                    if let Some(mapping) = expect_mapping(&value, STATICS_KEY)? {
                        merge_into(&statics, &mapping);
                    }
                }
                LEGACY_INIT_KEY | INSTANTIATE_KEY | EXTEND_KEY | CALL_SUPER_KEY => {}
                _ => {
                    define_property(&merged, name.into(), PropertyDescriptor::new_data(value));
                }
            }
        }
    }

    let initializer_count = initializers.len();
    if !initializers.is_empty() {
        define_property(
            &merged,
            INIT_KEY.into(),
            PropertyDescriptor::new_data(initializer_chain(initializers)),
        );
    }
    define_property(
        &merged,
        PRIVATE_KEY.into(),
        PropertyDescriptor::new_data(Value::Object(private)),
    );
    define_property(
        &merged,
        STATICS_KEY.into(),
        PropertyDescriptor::new_data(Value::Object(statics)),
    );

    debug!(
        sources = sources.len(),
        initializers = initializer_count,
        "composed prototypes"
    );
    create(Value::Object(merged), ProtoOptions::default())
}

fn hidden_mapping(source: &ObjectRef, key: &PropertyKey) -> Option<ObjectRef> {
    match get_own(source, key) {
        Some(Value::Object(mapping)) => Some(mapping),
        _ => None,
    }
}

fn merge_into(target: &ObjectRef, source: &ObjectRef) {
    for (name, value) in own_enumerable_entries(source) {
        define_property(target, name.into(), PropertyDescriptor::new_data(value));
    }
}

fn initializer_chain(initializers: Vec<Value>) -> Value {
    new_function(INIT_KEY, FunctionKind::InitializerChain, move |this, args| {
        for init in &initializers {
            call(init, this.clone(), args.clone())?;
        }
        Ok(Value::Undefined)
    })
}
