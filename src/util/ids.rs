// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// A message identifier assigned by the infrastructure.
///
/// Unlike a locally-generated unique id, a `MessageId` is part of a single
/// global, strictly increasing, gap-free sequence maintained by the
/// transport: the component never mints one itself, it only observes ids
/// handed to it (inbound) or reserves the next one (outbound).
///
/// # Example
/// ```rust
/// use airssys_rt::util::MessageId;
///
/// let first = MessageId::new(0);
/// assert_eq!(first.next(), MessageId::new(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Wrap a raw sequence number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw sequence number.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The next id in the sequence.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identifies a process subscribed to a component.
///
/// Assigned locally, in subscription order, by [`ProcessIdGenerator`]. Used
/// only to give the subscription registry a stable, orderable key — it has
/// no meaning outside a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(u64);

impl ProcessId {
    /// Wrap a raw sequence number. Exposed for tests; production code obtains
    /// a `ProcessId` from a [`ProcessIdGenerator`].
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw sequence number.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process-{}", self.0)
    }
}

/// Hands out strictly increasing [`ProcessId`]s.
///
/// `DashMap` iteration order is not insertion order, so the subscription
/// registry uses this to recover a deterministic fairness order (§9 Design
/// Notes, fairness by insertion order).
#[derive(Debug, Default)]
pub struct ProcessIdGenerator {
    next: AtomicU64,
}

impl ProcessIdGenerator {
    /// Create a generator starting at 0.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Allocate the next `ProcessId`.
    pub fn next_id(&self) -> ProcessId {
        ProcessId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
