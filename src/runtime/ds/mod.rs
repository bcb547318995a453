//! The delegation substrate: values, objects with a single delegate, and
//! callable function objects.

pub mod error;
pub mod function_object;
pub mod object;
pub mod object_property;
pub mod operations;
pub mod symbol;
pub mod value;
