use crate::{Callable, TargetId};

/// Key identifying one override stack: which method on which target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct OverrideKey {
	pub target: TargetId,
	pub method: Box<str>,
}

impl OverrideKey {
	pub fn new(target: &TargetId, method: &str) -> Self {
		Self {
			target: target.clone(),
			method: Box::from(method),
		}
	}
}

/// One applied override.
pub(crate) struct OverrideEntry {
	/// Process-unique sequence number; handles reference entries by it.
	pub seq: u64,
	/// The callable visible on the target immediately before this entry
	/// was installed. For the first entry this is the true original.
	pub original: Callable,
	/// The wrapper this entry installed on the target.
	pub wrapper: Callable,
}

/// Ordered overrides for one key, insertion order = application order.
///
/// Never empty while the key is patched; the containing map entry is
/// removed when the last override is reverted.
#[derive(Default)]
pub(crate) struct OverrideStack {
	pub entries: Vec<OverrideEntry>,
}
