//! Name-based method resolution and deferred invocation.
//!
//! Methods are looked up by name in a type's [`MetaObject`] table. A missing
//! method is never an error at resolution time; the feature relying on it
//! stays disabled and the miss is logged at debug level.
//!
//! [`MetaObject`]: horizon_foundation_core::MetaObject

mod callback;
pub mod resolver;

pub use callback::Callback;
pub use resolver::{resolve, resolve_getter, resolve_setter};
