//! # protomatter - class-like encapsulation over delegation
//!
//! Objects in this crate form a single-delegate chain, like the prototype
//! objects of a scripting engine. On top of that substrate the crate offers:
//! - blueprints built from property bags, with private methods kept off the
//!   public surface
//! - a hidden per-instance private context that receives every method call
//! - `callSuper` dispatch that climbs exactly one defining level at a time
//! - composition of several blueprints with chained initializers
//! - conversion of constructor-style functions into blueprints
//! - runtime mixins, which a blueprint can switch off
//!
//! ## Quick Start
//!
//! ```
//! use protomatter::{create, PropertyBag, ProtoOptions, Value};
//!
//! let counter = create(
//!     PropertyBag::new()
//!         .add_method("init", |this, _args| {
//!             this.set("count", 0)?;
//!             Ok(Value::Undefined)
//!         })
//!         .add_method("increment", |this, _args| {
//!             let count = this.get("count")?.as_number().unwrap_or(0.0);
//!             this.set("count", count + 1.0)?;
//!             Ok(Value::Undefined)
//!         })
//!         .add_method("getCount", |this, _args| this.get("count"))
//!         .into_value(),
//!     ProtoOptions::default(),
//! )
//! .unwrap();
//!
//! let c = counter.instantiate(vec![]).unwrap();
//! c.call("increment", vec![]).unwrap();
//! c.call("increment", vec![]).unwrap();
//! assert_eq!(c.call("getCount", vec![]).unwrap(), Value::from(2));
//! // State lives on the private context, not on the instance.
//! assert_eq!(c.get("count").unwrap(), Value::Undefined);
//! ```
//!
//! ## Super dispatch
//!
//! ```
//! use protomatter::{create, PropertyBag, ProtoOptions, Value};
//!
//! let base = create(
//!     PropertyBag::new()
//!         .add_method("greet", |_this, _args| Ok(Value::from("base")))
//!         .into_value(),
//!     ProtoOptions::default(),
//! )
//! .unwrap();
//! let mid = base
//!     .extend(
//!         PropertyBag::new().add_method("greet", |this, _args| {
//!             let up = this.invoke("callSuper", vec![Value::from("greet")])?;
//!             Ok(Value::from(format!("{}-mid", up)))
//!         }),
//!         ProtoOptions::default(),
//!     )
//!     .unwrap();
//! let greeting = mid.instantiate(vec![]).unwrap().call("greet", vec![]).unwrap();
//! assert_eq!(greeting, Value::from("base-mid"));
//! ```
//!
//! ## Architecture
//!
//! - **[`runtime::ds`]** - The object substrate (values, objects, functions, symbols)
//! - **[`runtime::proto`]** - Blueprints and instances
//!   - **[`runtime::proto::factory`]** - `create`, `instantiate`, `extend`
//!   - **[`runtime::proto::context`]** - Private contexts, public wrappers and mixins
//!   - **[`runtime::proto::super_resolver`]** - `callSuper`
//!   - **[`runtime::proto::composer`]** - `compose`
//!   - **[`runtime::proto::converter`]** - `convert`

#[macro_use]
extern crate lazy_static;

pub mod runtime;

pub use runtime::ds::error::ProtoError;
pub use runtime::ds::function_object::{native_function, new_constructor};
pub use runtime::ds::value::Value;
pub use runtime::proto::{
    compose, convert, create, Blueprint, Instance, PropertyBag, ProtoOptions,
};
