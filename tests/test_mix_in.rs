extern crate protomatter;

use protomatter::runtime::ds::operations::object::get_own_descriptor;
use protomatter::{create, PropertyBag, ProtoError, ProtoOptions, Value};

fn mixin() -> PropertyBag {
    PropertyBag::new()
        .add_method("getThing", |this, _args| this.get("thing"))
        .add_method("setThing", |this, args| {
            this.set("thing", args.into_iter().next().unwrap_or_default())?;
            Ok(Value::Undefined)
        })
}

#[test]
fn test_mixed_in_functions_bind_to_private_context() {
    let proto = create(PropertyBag::new().into_value(), ProtoOptions::default()).unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    instance.mix_in(mixin()).unwrap();

    instance.call("setThing", vec![Value::from("foo")]).unwrap();
    assert_eq!(instance.get("thing").unwrap(), Value::Undefined);
    assert_eq!(instance.call("getThing", vec![]).unwrap(), Value::from("foo"));
}

#[test]
fn test_bound_functions_ignore_call_time_receiver() {
    let instance = create(PropertyBag::new().into_value(), ProtoOptions::default())
        .unwrap()
        .instantiate(vec![])
        .unwrap();
    instance.mix_in(mixin()).unwrap();
    instance.call("setThing", vec![Value::from("foo")]).unwrap();

    let other = PropertyBag::new().add_property("thing", "other").into_value();
    let get_thing = instance.get("getThing").unwrap();
    assert_eq!(get_thing.call(other, vec![]).unwrap(), Value::from("foo"));
}

#[test]
fn test_mixed_in_data_lands_on_instance() {
    let instance = create(PropertyBag::new().into_value(), ProtoOptions::default())
        .unwrap()
        .instantiate(vec![])
        .unwrap();
    instance
        .mix_in(PropertyBag::new().add_property("label", "mixed"))
        .unwrap();
    assert_eq!(instance.get("label").unwrap(), Value::from("mixed"));
}

#[test]
fn test_disallowed_mixins_leave_surface_unchanged() {
    let proto = create(
        PropertyBag::new().into_value(),
        ProtoOptions::new().with_allow_mixins(false),
    )
    .unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    assert_eq!(instance.mix_in(mixin()), Err(ProtoError::MixinsDisabledError));
    assert_eq!(instance.get("getThing").unwrap(), Value::Undefined);
    assert_eq!(instance.get("setThing").unwrap(), Value::Undefined);
}

#[test]
fn test_disallowed_flag_checked_before_bag() {
    let proto = create(Value::Undefined, ProtoOptions::new().with_allow_mixins(false)).unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    assert_eq!(instance.mix_in(Value::from(1)), Err(ProtoError::MixinsDisabledError));
}

#[test]
fn test_non_object_mixin_rejected() {
    let instance = create(Value::Undefined, ProtoOptions::default())
        .unwrap()
        .instantiate(vec![])
        .unwrap();
    let result = instance.mix_in("darkside");
    assert!(matches!(result, Err(ProtoError::ConfigurationError(_))));
}

#[test]
fn test_mixin_targets_replaced_public_object() {
    let proto = create(
        PropertyBag::new()
            .add_method("init", |this, _args| {
                this.set("public", PropertyBag::new().into_value())?;
                Ok(Value::Undefined)
            })
            .add_method("published", |this, _args| this.get("public"))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    instance.mix_in(PropertyBag::new().add_property("label", "mixed")).unwrap();
    assert_eq!(instance.get("label").unwrap(), Value::Undefined);
    let published = instance.call("published", vec![]).unwrap();
    assert_eq!(published.get("label").unwrap(), Value::from("mixed"));
}

#[test]
fn test_mix_in_is_not_enumerable() {
    let instance = create(Value::Undefined, ProtoOptions::default())
        .unwrap()
        .instantiate(vec![])
        .unwrap();
    let descriptor = get_own_descriptor(instance.object(), &"mixIn".into()).unwrap();
    assert!(!descriptor.enumerable);
}
