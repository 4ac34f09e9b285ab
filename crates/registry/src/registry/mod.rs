//! The override registry: reversible, composable method patching of
//! externally owned host objects.
//!
//! Each `(target, method)` key carries a stack of overrides. Applying
//! an override captures the currently visible callable as that entry's
//! "super" and installs a wrapper that forwards to the replacement.
//! Reverting the topmost entry restores exactly the callable it
//! displaced; reverting deeper entries is refused rather than splicing
//! an active call chain.

mod stack;

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::{Callable, OverrideError, Replacement, Target, TargetId, Value};
use stack::{OverrideEntry, OverrideKey, OverrideStack};

/// Handle referencing one applied override.
///
/// Returned by [`OverrideRegistry::apply`]; pass it back to
/// [`OverrideRegistry::revert`] to undo that application.
#[derive(Debug, Clone)]
pub struct OverrideHandle {
	target: TargetId,
	method: Box<str>,
	seq: u64,
}

impl OverrideHandle {
	/// Identity of the target this override was applied to.
	pub fn target(&self) -> &TargetId {
		&self.target
	}

	/// Name of the overridden method.
	pub fn method(&self) -> &str {
		&self.method
	}
}

/// Registry of method overrides on externally owned targets.
///
/// Single-threaded by contract: the host environment this pattern
/// serves runs cooperatively on one thread, so interior mutability is
/// `RefCell`/`Cell` and callables carry no `Send`/`Sync` bounds.
/// Mutations attempted from within an active invocation on the same
/// key are rejected with [`OverrideError::ReentrantMutation`] instead
/// of corrupting the chain.
#[derive(Default)]
pub struct OverrideRegistry {
	stacks: RefCell<HashMap<OverrideKey, OverrideStack>>,
	/// Invocation depth per key, maintained by [`Self::invoke`].
	active: RefCell<HashMap<OverrideKey, u32>>,
	next_seq: Cell<u64>,
}

impl OverrideRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs `replacement` over the currently visible `method` on
	/// `target`.
	///
	/// The replacement receives the displaced callable as its first
	/// argument and may call through, transform, or suppress it.
	/// Repeated applications on the same key compose: each sees the
	/// previous override as its "super", and the most recently applied
	/// override runs outermost.
	///
	/// Fails with [`OverrideError::NoSuchMethod`] if the target does
	/// not expose `method`.
	pub fn apply(
		&self,
		target: &mut dyn Target,
		id: &TargetId,
		method: &str,
		replacement: Replacement,
	) -> Result<OverrideHandle, OverrideError> {
		self.apply_inner(target, id, method, None, replacement)
	}

	/// Like [`Self::apply`], but installs `base` as the method first if
	/// the target does not expose it yet.
	pub fn apply_with_base(
		&self,
		target: &mut dyn Target,
		id: &TargetId,
		method: &str,
		base: Callable,
		replacement: Replacement,
	) -> Result<OverrideHandle, OverrideError> {
		self.apply_inner(target, id, method, Some(base), replacement)
	}

	fn apply_inner(
		&self,
		target: &mut dyn Target,
		id: &TargetId,
		method: &str,
		base: Option<Callable>,
		replacement: Replacement,
	) -> Result<OverrideHandle, OverrideError> {
		let key = OverrideKey::new(id, method);
		self.ensure_quiescent(&key)?;

		let original = match target.member(method) {
			Some(member) => member,
			None => match base {
				Some(base) => {
					target.install(method, base.clone());
					base
				}
				None => {
					return Err(OverrideError::NoSuchMethod {
						target: id.clone(),
						method: Box::from(method),
					});
				}
			},
		};

		let seq = self.next_seq.get();
		self.next_seq.set(seq + 1);

		let wrapper: Callable = {
			let original = original.clone();
			Arc::new(move |args: &[Value]| (*replacement)(&*original, args))
		};
		target.install(method, wrapper.clone());

		let depth = {
			let mut stacks = self.stacks.borrow_mut();
			let stack = stacks.entry(key.clone()).or_default();
			stack.entries.push(OverrideEntry {
				seq,
				original,
				wrapper,
			});
			stack.entries.len()
		};

		tracing::debug!(
			target_id = %key.target,
			method = %key.method,
			seq,
			depth,
			"override applied"
		);

		Ok(OverrideHandle {
			target: key.target,
			method: key.method,
			seq,
		})
	}

	/// Reverts the override referenced by `handle`.
	///
	/// Only the topmost (most recently applied) entry of a stack can be
	/// reverted; doing so restores exactly the callable that entry
	/// displaced. Reverting a deeper entry fails with
	/// [`OverrideError::UnsupportedReorder`] and changes nothing.
	pub fn revert(
		&self,
		target: &mut dyn Target,
		handle: &OverrideHandle,
	) -> Result<(), OverrideError> {
		let key = OverrideKey::new(&handle.target, &handle.method);
		self.ensure_quiescent(&key)?;

		let entry = {
			let mut stacks = self.stacks.borrow_mut();
			let Some(stack) = stacks.get_mut(&key) else {
				return Err(self.handle_not_found(handle));
			};
			let Some(pos) = stack.entries.iter().position(|e| e.seq == handle.seq) else {
				return Err(self.handle_not_found(handle));
			};
			let entries_above = stack.entries.len() - 1 - pos;
			if entries_above > 0 {
				return Err(OverrideError::UnsupportedReorder {
					target: handle.target.clone(),
					method: handle.method.clone(),
					seq: handle.seq,
					entries_above,
				});
			}
			// pos is the last index, so this is a pop.
			let entry = stack.entries.swap_remove(pos);
			if stack.entries.is_empty() {
				stacks.remove(&key);
			}
			entry
		};

		self.warn_if_foreign(target, &key, &entry);
		target.install(&key.method, entry.original.clone());

		tracing::debug!(
			target_id = %key.target,
			method = %key.method,
			seq = entry.seq,
			depth = self.depth(&handle.target, &handle.method),
			"override reverted"
		);
		Ok(())
	}

	/// Reverts every override on `(id, method)`, topmost first, and
	/// restores the true original callable. Returns the number of
	/// entries reverted; an unpatched key yields 0.
	pub fn revert_all(
		&self,
		target: &mut dyn Target,
		id: &TargetId,
		method: &str,
	) -> Result<usize, OverrideError> {
		let key = OverrideKey::new(id, method);
		self.ensure_quiescent(&key)?;

		let Some(stack) = self.stacks.borrow_mut().remove(&key) else {
			return Ok(0);
		};
		let count = stack.entries.len();
		if let Some(last) = stack.entries.last() {
			self.warn_if_foreign(target, &key, last);
		}
		// The first entry captured the callable that existed before any
		// override.
		if let Some(first) = stack.entries.first() {
			target.install(method, first.original.clone());
		}

		tracing::debug!(
			target_id = %key.target,
			method = %key.method,
			count,
			"override stack unwound"
		);
		Ok(count)
	}

	/// Invokes the currently visible `method` on `target`.
	///
	/// Equivalent to calling the member directly; exists so the chain
	/// can be exercised without a live host object graph. While the
	/// invocation runs, mutations on the same key are rejected.
	pub fn invoke(
		&self,
		target: &dyn Target,
		id: &TargetId,
		method: &str,
		args: &[Value],
	) -> Result<Value, OverrideError> {
		let member = target
			.member(method)
			.ok_or_else(|| OverrideError::NoSuchMethod {
				target: id.clone(),
				method: Box::from(method),
			})?;
		let _guard = InvokeGuard::enter(&self.active, OverrideKey::new(id, method));
		Ok((*member)(args))
	}

	/// Number of active overrides on `(id, method)`; 0 means unpatched.
	pub fn depth(&self, id: &TargetId, method: &str) -> usize {
		let key = OverrideKey::new(id, method);
		self.stacks
			.borrow()
			.get(&key)
			.map_or(0, |s| s.entries.len())
	}

	/// Logs when the visible member is not the wrapper the topmost
	/// entry installed, meaning something mutated the host outside the
	/// registry. The revert still proceeds: the entry's captured
	/// original is the correct restoration either way.
	fn warn_if_foreign(&self, target: &dyn Target, key: &OverrideKey, entry: &OverrideEntry) {
		if let Some(current) = target.member(&key.method) {
			if !Arc::ptr_eq(&current, &entry.wrapper) {
				tracing::warn!(
					target_id = %key.target,
					method = %key.method,
					seq = entry.seq,
					"host member changed outside the registry; restoring captured original"
				);
			}
		}
	}

	fn ensure_quiescent(&self, key: &OverrideKey) -> Result<(), OverrideError> {
		if self.active.borrow().get(key).copied().unwrap_or(0) > 0 {
			return Err(OverrideError::ReentrantMutation {
				target: key.target.clone(),
				method: key.method.clone(),
			});
		}
		Ok(())
	}

	fn handle_not_found(&self, handle: &OverrideHandle) -> OverrideError {
		OverrideError::HandleNotFound {
			target: handle.target.clone(),
			method: handle.method.clone(),
			seq: handle.seq,
		}
	}
}

/// Marks a key as having an invocation in flight for the duration of
/// the call, so mutations on it can be refused.
struct InvokeGuard<'a> {
	active: &'a RefCell<HashMap<OverrideKey, u32>>,
	key: OverrideKey,
}

impl<'a> InvokeGuard<'a> {
	fn enter(active: &'a RefCell<HashMap<OverrideKey, u32>>, key: OverrideKey) -> Self {
		*active.borrow_mut().entry(key.clone()).or_insert(0) += 1;
		Self { active, key }
	}
}

impl Drop for InvokeGuard<'_> {
	fn drop(&mut self) {
		let mut active = self.active.borrow_mut();
		if let Some(depth) = active.get_mut(&self.key) {
			*depth -= 1;
			if *depth == 0 {
				active.remove(&self.key);
			}
		}
	}
}
