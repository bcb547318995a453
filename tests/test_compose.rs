extern crate protomatter;

use protomatter::{compose, create, Blueprint, Instance, PropertyBag, ProtoError, ProtoOptions, Value};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn option(options: &[Value], name: &str) -> Result<Value, ProtoError> {
    options.first().cloned().unwrap_or_default().get(name)
}

fn commentable(log: &Log) -> Blueprint {
    let init_log = log.clone();
    let save_log = log.clone();
    create(
        PropertyBag::new()
            .add_method("addComment", |this, _args| this.invoke("saveComment", vec![]))
            .add_method("init", move |this, args| {
                init_log.borrow_mut().push("commentable".to_string());
                this.set("comments", option(&args, "comments")?)?;
                Ok(Value::Undefined)
            })
            .add_method("numComments", |this, _args| this.get("comments"))
            .with_private(PropertyBag::new().add_method("saveComment", move |_this, _args| {
                save_log.borrow_mut().push("saveComment".to_string());
                Ok(Value::Undefined)
            }))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap()
}

fn likeable(log: &Log) -> Blueprint {
    let init_log = log.clone();
    let save_log = log.clone();
    create(
        PropertyBag::new()
            .add_method("init", move |this, args| {
                init_log.borrow_mut().push("likeable".to_string());
                this.set("liked", option(&args, "liked")?)?;
                Ok(Value::Undefined)
            })
            .add_method("isLiked", |this, _args| this.get("liked"))
            .add_method("like", |this, _args| this.invoke("saveLike", vec![]))
            .with_private(PropertyBag::new().add_method("saveLike", move |_this, _args| {
                save_log.borrow_mut().push("saveLike".to_string());
                Ok(Value::Undefined)
            }))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap()
}

fn post(log: &Log) -> Instance {
    let init_log = log.clone();
    let own = PropertyBag::new()
        .add_method("getText", |this, _args| this.get("text"))
        .add_method("getTitle", |this, _args| this.get("title"))
        .add_method("init", move |this, args| {
            init_log.borrow_mut().push("post".to_string());
            this.set("title", option(&args, "title")?)?;
            this.set("text", option(&args, "text")?)?;
            Ok(Value::Undefined)
        });
    let post = compose(vec![
        own.into_value(),
        commentable(log).as_value(),
        likeable(log).as_value(),
    ])
    .unwrap();
    let options = PropertyBag::new()
        .add_property("comments", 0)
        .add_property("liked", false)
        .add_property("text", "...")
        .add_property("title", "Prototypal OO")
        .into_value();
    post.instantiate(vec![options]).unwrap()
}

#[test]
fn test_composed_private_methods_stay_private() {
    let log = Log::default();
    let post = post(&log);
    post.call("addComment", vec![]).unwrap();
    post.call("like", vec![]).unwrap();
    assert_eq!(post.get("saveComment").unwrap(), Value::Undefined);
    assert_eq!(post.get("saveLike").unwrap(), Value::Undefined);
    let calls = log.borrow();
    assert_eq!(calls.iter().filter(|c| *c == "saveComment").count(), 1);
    assert_eq!(calls.iter().filter(|c| *c == "saveLike").count(), 1);
}

#[test]
fn test_all_inits_run_once_in_argument_order() {
    let log = Log::default();
    let post = post(&log);
    assert_eq!(*log.borrow(), vec!["post", "commentable", "likeable"]);
    for attr in ["comments", "liked", "text", "title"] {
        assert_eq!(post.get(attr).unwrap(), Value::Undefined, "{}", attr);
    }
    assert_eq!(post.call("numComments", vec![]).unwrap(), Value::from(0));
    assert_eq!(post.call("isLiked", vec![]).unwrap(), Value::from(false));
    assert_eq!(post.call("getText", vec![]).unwrap(), Value::from("..."));
    assert_eq!(post.call("getTitle", vec![]).unwrap(), Value::from("Prototypal OO"));
}

#[test]
fn test_needs_at_least_two_sources() {
    let result = compose(vec![PropertyBag::new().into_value()]);
    assert!(matches!(result, Err(ProtoError::ConfigurationError(_))));
}

#[test]
fn test_rejects_non_object_sources() {
    let result = compose(vec![PropertyBag::new().into_value(), Value::from("darkside")]);
    assert!(matches!(result, Err(ProtoError::ConfigurationError(_))));
}

#[test]
fn test_statics_of_sources_are_merged() {
    let a = create(
        PropertyBag::new()
            .with_statics(PropertyBag::new().add_property("version", 1))
            .into_value(),
        ProtoOptions::default(),
    )
    .unwrap();
    let b = PropertyBag::new()
        .add_property("name", "b")
        .with_statics(PropertyBag::new().add_property("kind", "bag"));
    let composed = compose(vec![a.as_value(), b.into_value()]).unwrap();
    assert_eq!(composed.get("version").unwrap(), Value::from(1));
    assert_eq!(composed.get("kind").unwrap(), Value::from("bag"));
    let instance = composed.instantiate(vec![]).unwrap();
    assert_eq!(instance.get("version").unwrap(), Value::Undefined);
    assert_eq!(instance.get("name").unwrap(), Value::from("b"));
}

#[test]
fn test_composed_blueprint_can_be_extended() {
    let log = Log::default();
    let composed = compose(vec![commentable(&log).as_value(), likeable(&log).as_value()]).unwrap();
    let child = composed
        .extend(
            PropertyBag::new().add_method("init", |this, args| {
                this.set("extra", true)?;
                let mut forwarded = vec![Value::from("init")];
                forwarded.extend(args);
                this.invoke("callSuper", forwarded)?;
                Ok(Value::Undefined)
            }),
            ProtoOptions::default(),
        )
        .unwrap();
    let options = PropertyBag::new()
        .add_property("comments", 3)
        .add_property("liked", true)
        .into_value();
    let instance = child.instantiate(vec![options]).unwrap();
    assert_eq!(instance.call("numComments", vec![]).unwrap(), Value::from(3));
    assert_eq!(*log.borrow(), vec!["commentable", "likeable"]);
}
