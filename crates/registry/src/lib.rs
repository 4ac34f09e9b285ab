//! Reversible method-override registry for externally owned host
//! objects.
//!
//! Host frameworks that extend behavior by replacing methods on shared
//! objects usually do it by ambient mutation: whoever patches last
//! wins, nothing records who patched what, and nothing can be undone.
//! This crate makes that pattern explicit. A [`OverrideRegistry`]
//! tracks, per `(target, method)` key, an ordered stack of overrides;
//! each override receives the callable it displaced as an explicit
//! "super" argument, and the topmost override of any stack can be
//! reverted to restore exactly the behavior it replaced.
//!
//! Targets stay externally owned: the only capability the registry
//! needs is the [`Target`] trait — read a named callable member,
//! replace a named callable member. [`DynTarget`] is a map-backed
//! implementation for tests and hosts without a richer object model.
//!
//! # Example
//!
//! ```
//! use veneer_registry::{DynTarget, OverrideRegistry, TargetId, Value, replacement};
//!
//! let registry = OverrideRegistry::new();
//! let id = TargetId::new("pos.order");
//! let mut order = DynTarget::new().with_member("total", |_| Value::Int(10));
//!
//! let surcharge = registry
//! 	.apply(&mut order, &id, "total", replacement(|original, args| {
//! 		match original(args) {
//! 			Value::Int(n) => Value::Int(n + 5),
//! 			other => other,
//! 		}
//! 	}))
//! 	.unwrap();
//! assert_eq!(registry.invoke(&order, &id, "total", &[]).unwrap(), Value::Int(15));
//!
//! registry.revert(&mut order, &surcharge).unwrap();
//! assert_eq!(registry.invoke(&order, &id, "total", &[]).unwrap(), Value::Int(10));
//! ```

mod error;
mod registry;
mod target;
mod value;

pub use error::OverrideError;
pub use registry::{OverrideHandle, OverrideRegistry};
pub use target::{Callable, DynTarget, Replacement, Target, TargetId, callable, replacement};
pub use value::Value;
