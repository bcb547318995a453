extern crate protomatter;

use protomatter::{create, native_function, Blueprint, PropertyBag, ProtoError, ProtoOptions, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every call made through it and returns a fixed value.
#[derive(Clone, Default)]
struct Spy {
    calls: Rc<RefCell<Vec<Vec<Value>>>>,
}

impl Spy {
    fn returning(&self, name: &str, result: Value) -> Value {
        let calls = self.calls.clone();
        native_function(name, move |_this, args| {
            calls.borrow_mut().push(args);
            Ok(result.clone())
        })
    }

    fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn last_args(&self) -> Vec<Value> {
        self.calls.borrow().last().cloned().unwrap_or_default()
    }
}

fn call_super(this: &Value, name: &str, mut args: Vec<Value>) -> Result<Value, ProtoError> {
    args.insert(0, Value::from(name));
    this.invoke("callSuper", args)
}

struct Fixture {
    spy: Spy,
    instance: protomatter::Instance,
    return_value: Value,
}

fn fixture() -> Fixture {
    let spy = Spy::default();
    let super_proto = create(
        PropertyBag::new()
            .add_property("superMethod", spy.returning("superMethod", Value::from("return value")))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let proto = super_proto
        .extend(
            PropertyBag::new().add_method("protoMethod", |this, _args| {
                call_super(&this, "superMethod", vec![Value::from("an argument")])
            }),
            ProtoOptions::default(),
        )
        .unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    let return_value = instance.call("protoMethod", vec![]).unwrap();
    Fixture {
        spy,
        instance,
        return_value,
    }
}

// ── Single level ─────────────────────────────────────────────────────

#[test]
fn test_calls_the_super_method_once() {
    let f = fixture();
    assert_eq!(f.spy.count(), 1);
}

#[test]
fn test_forwards_arguments() {
    let f = fixture();
    assert_eq!(f.spy.last_args(), vec![Value::from("an argument")]);
}

#[test]
fn test_returns_super_result() {
    let f = fixture();
    assert_eq!(f.return_value, Value::from("return value"));
}

#[test]
fn test_missing_method_from_outside() {
    let f = fixture();
    let err = f.instance.call_super("missingMethod", vec![]).unwrap_err();
    assert_eq!(err, ProtoError::MethodNotFoundError("missingMethod".to_string()));
}

#[test]
fn test_missing_method_from_inside() {
    let proto = create(PropertyBag::new().into_value(), ProtoOptions::default())
        .unwrap()
        .extend(
            PropertyBag::new().add_method("broken", |this, _args| call_super(&this, "nowhere", vec![])),
            ProtoOptions::default(),
        )
        .unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    let err = instance.call("broken", vec![]).unwrap_err();
    assert_eq!(err.to_string(), "Method nowhere is not defined.");
}

#[test]
fn test_super_method_runs_in_private_context() {
    let proto = create(
        PropertyBag::new()
            .add_method("init", |this, _args| {
                this.set("secret", "hidden")?;
                Ok(Value::Undefined)
            })
            .add_method("reveal", |this, _args| this.get("secret"))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap()
    .extend(
        PropertyBag::new().add_method("reveal", |this, _args| call_super(&this, "reveal", vec![])),
        ProtoOptions::default(),
    )
    .unwrap();
    let instance = proto.instantiate(vec![]).unwrap();
    assert_eq!(instance.call("reveal", vec![]).unwrap(), Value::from("hidden"));
    assert_eq!(instance.get("secret").unwrap(), Value::Undefined);
}

// ── Multiple levels ──────────────────────────────────────────────────

#[test]
fn test_inherited_init_runs_through_super_chain() {
    let calls = Rc::new(RefCell::new(Vec::<&'static str>::new()));
    let top_calls = calls.clone();
    let proto = create(
        PropertyBag::new()
            .add_method("init", move |_this, _args| {
                top_calls.borrow_mut().push("proto");
                Ok(Value::Undefined)
            })
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let mid_calls = calls.clone();
    let proto2 = proto
        .extend(
            PropertyBag::new().add_method("init", move |this, _args| {
                call_super(&this, "init", vec![])?;
                mid_calls.borrow_mut().push("proto2");
                Ok(Value::Undefined)
            }),
            ProtoOptions::default(),
        )
        .unwrap();
    let proto3 = proto2.extend(PropertyBag::new(), ProtoOptions::default()).unwrap();
    proto3.instantiate(vec![]).unwrap();
    assert_eq!(*calls.borrow(), vec!["proto", "proto2"]);
}

#[test]
fn test_calls_method_at_the_next_defining_level() {
    let spy = Spy::default();
    let noop = Spy::default();
    let proto = create(
        PropertyBag::new()
            .add_property("topMethod", spy.returning("topMethod", Value::Undefined))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let proto2 = proto
        .extend(
            PropertyBag::new()
                .add_method("middleMethod", |this, _args| call_super(&this, "topMethod", vec![]))
                .add_property("topMethod", noop.returning("topMethod", Value::Undefined)),
            ProtoOptions::default(),
        )
        .unwrap();
    let proto3 = proto2.extend(PropertyBag::new(), ProtoOptions::default()).unwrap();
    let proto4 = proto3
        .extend(
            PropertyBag::new()
                .add_method("bottomMethod", |this, _args| call_super(&this, "middleMethod", vec![])),
            ProtoOptions::default(),
        )
        .unwrap();
    let instance = proto4.instantiate(vec![]).unwrap();
    instance.call("bottomMethod", vec![]).unwrap();
    assert_eq!(spy.count(), 1);
    assert_eq!(noop.count(), 0);
}

fn greeting_chain() -> Blueprint {
    let base = create(
        PropertyBag::new()
            .add_method("greet", |_this, _args| Ok(Value::from("base")))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let mid = base
        .extend(
            PropertyBag::new().add_method("greet", |this, _args| {
                let up = call_super(&this, "greet", vec![])?;
                Ok(Value::from(format!("{}-mid", up)))
            }),
            ProtoOptions::default(),
        )
        .unwrap();
    mid.extend(
        PropertyBag::new().add_method("greet", |this, _args| {
            let up = call_super(&this, "greet", vec![])?;
            Ok(Value::from(format!("{}-top", up)))
        }),
        ProtoOptions::default(),
    )
    .unwrap()
}

#[test]
fn test_greeting_runs_each_level_once_bottom_to_top() {
    let top = greeting_chain();
    let greeting = top.instantiate(vec![]).unwrap().call("greet", vec![]).unwrap();
    assert_eq!(greeting, Value::from("base-mid-top"));
}

#[test]
fn test_repeated_calls_give_the_same_result() {
    let instance = greeting_chain().instantiate(vec![]).unwrap();
    for _ in 0..3 {
        assert_eq!(instance.call("greet", vec![]).unwrap(), Value::from("base-mid-top"));
    }
}

#[test]
fn test_super_level_restored_after_error() {
    let failing = create(
        PropertyBag::new()
            .add_method("act", |_this, _args| Err(ProtoError::type_error("boom")))
            .add_method("greet", |_this, _args| Ok(Value::from("base")))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let child = failing
        .extend(
            PropertyBag::new()
                .add_method("act", |this, _args| call_super(&this, "act", vec![]))
                .add_method("greet", |this, _args| {
                    let up = call_super(&this, "greet", vec![])?;
                    Ok(Value::from(format!("{}-child", up)))
                }),
            ProtoOptions::default(),
        )
        .unwrap();
    let instance = child.instantiate(vec![]).unwrap();
    assert!(instance.call("act", vec![]).is_err());
    assert_eq!(instance.call("greet", vec![]).unwrap(), Value::from("base-child"));
}

#[test]
fn test_replacing_super_method_affects_next_call() {
    let top = greeting_chain();
    let instance = top.instantiate(vec![]).unwrap();
    let base = top.parent().unwrap().parent().unwrap();
    base.set(
        "greet",
        native_function("greet", |_this, _args| Ok(Value::from("root"))),
    )
    .unwrap();
    assert_eq!(instance.call("greet", vec![]).unwrap(), Value::from("root-mid-top"));
}
