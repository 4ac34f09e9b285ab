use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// A callable member installed on a target.
///
/// No `Send`/`Sync` bounds: the execution model is single-threaded and
/// cooperative, so callables may capture thread-local state freely.
pub type Callable = Arc<dyn Fn(&[Value]) -> Value>;

/// A replacement function registered through the registry.
///
/// The first parameter is the previously visible callable ("super").
/// The replacement may call through to it, transform its inputs or
/// outputs, or suppress it entirely; the registry does not enforce the
/// call-through.
pub type Replacement = Arc<dyn Fn(&dyn Fn(&[Value]) -> Value, &[Value]) -> Value>;

/// Wraps a closure as a [`Callable`].
pub fn callable(f: impl Fn(&[Value]) -> Value + 'static) -> Callable {
	Arc::new(f)
}

/// Wraps a closure as a [`Replacement`].
pub fn replacement(
	f: impl Fn(&dyn Fn(&[Value]) -> Value, &[Value]) -> Value + 'static,
) -> Replacement {
	Arc::new(f)
}

/// Opaque identity of an externally owned host object.
///
/// The registry keys override stacks by `(TargetId, method name)`; it
/// never stores or constructs the host object itself. Callers are
/// responsible for using one id consistently per object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(Box<str>);

impl TargetId {
	pub fn new(id: impl Into<Box<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TargetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TargetId {
	fn from(s: &str) -> Self {
		Self::new(s)
	}
}

/// Host object capability contract.
///
/// A target only needs to expose reading and replacing a named callable
/// member. No reflection on argument types, no lifecycle hooks.
pub trait Target {
	/// Returns the currently visible callable for `name`, if any.
	fn member(&self, name: &str) -> Option<Callable>;

	/// Replaces (or defines) the callable for `name`.
	fn install(&mut self, name: &str, member: Callable);
}

/// Map-backed [`Target`] for tests and embedders without a live host
/// object graph.
#[derive(Default)]
pub struct DynTarget {
	members: HashMap<Box<str>, Callable>,
}

impl DynTarget {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style member definition.
	pub fn with_member(mut self, name: &str, f: impl Fn(&[Value]) -> Value + 'static) -> Self {
		self.define(name, callable(f));
		self
	}

	/// Defines or replaces a member.
	pub fn define(&mut self, name: &str, member: Callable) {
		self.members.insert(Box::from(name), member);
	}
}

impl Target for DynTarget {
	fn member(&self, name: &str) -> Option<Callable> {
		self.members.get(name).cloned()
	}

	fn install(&mut self, name: &str, member: Callable) {
		self.members.insert(Box::from(name), member);
	}
}
