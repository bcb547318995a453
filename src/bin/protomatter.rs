//! Demo runner for protomatter.
//!
//! Usage:
//!   protomatter                 # Run every scenario
//!   protomatter <scenario>      # Run one scenario
//!   protomatter --list          # List scenarios
//!
//! Log output is controlled through `RUST_LOG`, e.g. `RUST_LOG=protomatter=trace`.

use protomatter::{
    compose, convert, create, native_function, new_constructor, PropertyBag, ProtoError,
    ProtoOptions, Value,
};
use std::env;
use std::io;
use std::process;

type Scenario = fn() -> Result<Value, ProtoError>;

const SCENARIOS: [(&str, Scenario); 5] = [
    ("counter", counter),
    ("greeting", greeting),
    ("compose", composition),
    ("convert", conversion),
    ("mixin", mixin),
];

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    match args.len() {
        1 => {
            let mut failed = false;
            for (name, scenario) in SCENARIOS.iter() {
                failed |= !run(name, *scenario);
            }
            if failed {
                process::exit(1);
            }
        }
        2 => {
            let arg = &args[1];
            if arg == "-h" || arg == "--help" {
                print_usage();
                process::exit(0);
            }
            if arg == "-l" || arg == "--list" {
                for (name, _) in SCENARIOS.iter() {
                    println!("{}", name);
                }
                process::exit(0);
            }
            match SCENARIOS.iter().find(|(name, _)| name == arg) {
                Some((name, scenario)) => {
                    if !run(name, *scenario) {
                        process::exit(1);
                    }
                }
                None => {
                    eprintln!("Unknown scenario '{}'", arg);
                    print_usage();
                    process::exit(1);
                }
            }
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("protomatter - class-like encapsulation over delegation");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  protomatter                 Run every scenario");
    eprintln!("  protomatter <scenario>      Run one scenario");
    eprintln!("  protomatter --list          List scenarios");
}

fn run(name: &str, scenario: Scenario) -> bool {
    match scenario() {
        Ok(result) => {
            println!("{:<10} {}", name, result);
            true
        }
        Err(e) => {
            eprintln!("{:<10} error: {}", name, e);
            false
        }
    }
}

fn first_arg(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or_default()
}

fn counter() -> Result<Value, ProtoError> {
    let counter = create(
        PropertyBag::new()
            .add_method("init", |this, _args| {
                this.set("count", 0)?;
                Ok(Value::Undefined)
            })
            .add_method("increment", |this, _args| {
                this.invoke("bump", vec![Value::from(1)])?;
                Ok(Value::Undefined)
            })
            .add_method("getCount", |this, _args| this.get("count"))
            .with_private(PropertyBag::new().add_method("bump", |this, args| {
                let by = first_arg(args).as_number().unwrap_or(0.0);
                let count = this.get("count")?.as_number().unwrap_or(0.0);
                this.set("count", count + by)?;
                Ok(Value::Undefined)
            }))
            .into_value(),
        ProtoOptions::default(),
    )?;
    let c = counter.instantiate(vec![])?;
    c.call("increment", vec![])?;
    c.call("increment", vec![])?;
    Ok(Value::from(format!(
        "getCount() = {}, count = {}",
        c.call("getCount", vec![])?,
        c.get("count")?
    )))
}

fn greeting() -> Result<Value, ProtoError> {
    let base = create(
        PropertyBag::new()
            .add_method("greet", |_this, _args| Ok(Value::from("base")))
            .into_value(),
        ProtoOptions::default(),
    )?;
    let mid = base.extend(
        PropertyBag::new().add_method("greet", |this, _args| {
            let up = this.invoke("callSuper", vec![Value::from("greet")])?;
            Ok(Value::from(format!("{}-mid", up)))
        }),
        ProtoOptions::default(),
    )?;
    let top = mid.extend(
        PropertyBag::new().add_method("greet", |this, _args| {
            let up = this.invoke("callSuper", vec![Value::from("greet")])?;
            Ok(Value::from(format!("{}-top", up)))
        }),
        ProtoOptions::default(),
    )?;
    top.instantiate(vec![])?.call("greet", vec![])
}

fn composition() -> Result<Value, ProtoError> {
    let named = PropertyBag::new()
        .add_method("init", |this, args| {
            this.set("name", first_arg(args))?;
            Ok(Value::Undefined)
        })
        .add_method("getName", |this, _args| this.get("name"));
    let aged = PropertyBag::new()
        .add_method("init", |this, args| {
            this.set("age", args.get(1).cloned().unwrap_or_default())?;
            Ok(Value::Undefined)
        })
        .add_method("getAge", |this, _args| this.get("age"));
    let person = compose(vec![named.into_value(), aged.into_value()])?;
    let p = person.instantiate(vec![Value::from("Ada"), Value::from(36)])?;
    Ok(Value::from(format!(
        "{} is {}",
        p.call("getName", vec![])?,
        p.call("getAge", vec![])?
    )))
}

fn conversion() -> Result<Value, ProtoError> {
    let point = new_constructor("Point", |this, args| {
        this.set("x", args.first().cloned().unwrap_or_default())?;
        this.set("y", args.get(1).cloned().unwrap_or_default())?;
        Ok(Value::Undefined)
    });
    point.get("prototype")?.set(
        "describe",
        native_function("describe", |this, _args| {
            Ok(Value::from(format!("({}, {})", this.get("x")?, this.get("y")?)))
        }),
    )?;
    let blueprint = convert(&point, ProtoOptions::default())?;
    blueprint
        .instantiate(vec![Value::from(3), Value::from(4)])?
        .call("describe", vec![])
}

fn mixin() -> Result<Value, ProtoError> {
    let open = create(
        PropertyBag::new()
            .add_method("init", |this, _args| {
                this.set("secret", "open sesame")?;
                Ok(Value::Undefined)
            })
            .into_value(),
        ProtoOptions::default(),
    )?;
    let o = open.instantiate(vec![])?;
    o.mix_in(PropertyBag::new().add_method("reveal", |this, _args| this.get("secret")))?;
    let sealed = create(Value::Undefined, ProtoOptions::new().with_allow_mixins(false))?;
    let refused = match sealed.instantiate(vec![])?.mix_in(PropertyBag::new()) {
        Err(e) => e.to_string(),
        Ok(()) => "accepted".to_string(),
    };
    Ok(Value::from(format!(
        "reveal() = {}; sealed: {}",
        o.call("reveal", vec![])?,
        refused
    )))
}
