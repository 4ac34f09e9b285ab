use crate::TargetId;

/// Errors returned by registry mutations and invocations.
///
/// All errors are reported synchronously at the offending call; a
/// failed operation leaves the registry and the target unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverrideError {
	/// The target does not expose the named callable member and no base
	/// implementation was supplied.
	#[error("no such method: target={target} method={method}")]
	NoSuchMethod { target: TargetId, method: Box<str> },

	/// The handle does not reference a still-active override entry.
	#[error("override handle not found: target={target} method={method} seq={seq}")]
	HandleNotFound {
		target: TargetId,
		method: Box<str>,
		seq: u64,
	},

	/// Revert of a non-topmost entry. Splicing an active call chain
	/// would require re-capturing every later entry's "super"; only the
	/// topmost entry can be reverted safely.
	#[error(
		"cannot revert non-topmost override: target={target} method={method} seq={seq} ({entries_above} applied after it)"
	)]
	UnsupportedReorder {
		target: TargetId,
		method: Box<str>,
		seq: u64,
		entries_above: usize,
	},

	/// Apply or revert attempted from within an active invocation on
	/// the same (target, method) key.
	#[error("re-entrant mutation during active invocation: target={target} method={method}")]
	ReentrantMutation { target: TargetId, method: Box<str> },
}
