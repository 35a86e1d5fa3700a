//! A component's private attribute environment, with tentative mutation.

// Layer 1: Standard library
use std::collections::HashMap;

// Layer 2: Third-party
// (none — see DESIGN.md: a plain HashMap is the teacher's own idiom for
// small owned key/value state, no crate needed here)

// Layer 3: Internal
// (none)

/// A component's attribute environment: a committed map plus a tentative
/// overlay that a dispatch or send cycle accumulates before `commit` or
/// `rollback` decides its fate.
///
/// `AttributeStore` is plain, `Send` data with no single hard-wired owner at
/// the type level; the *protocol* around it (§3 DATA MODEL, "Loan
/// representation") is what restricts mutation to the Coordinator task — the
/// store moves by value across the channel boundary whenever it is loaned
/// out and moves back with the loanee's verdict.
///
/// # Example
/// ```rust
/// use airssys_rt::attributes::AttributeStore;
///
/// let mut store = AttributeStore::with_initial([("x".to_string(), "1".to_string())]);
/// store.set("x", "2");
/// assert_eq!(store.get("x"), ("2".to_string(), true));
/// assert!(store.commit());
/// assert_eq!(store.get("x"), ("2".to_string(), true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeStore {
    committed: HashMap<String, String>,
    pending: HashMap<String, String>,
}

impl AttributeStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with an initial committed environment.
    pub fn with_initial(initial: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            committed: initial.into_iter().collect(),
            pending: HashMap::new(),
        }
    }

    /// Read a key, preferring the tentative overlay. The bool indicates
    /// whether the key was present at all.
    pub fn get(&self, key: &str) -> (String, bool) {
        if let Some(v) = self.pending.get(key) {
            (v.clone(), true)
        } else if let Some(v) = self.committed.get(key) {
            (v.clone(), true)
        } else {
            (String::new(), false)
        }
    }

    /// Write a key into the tentative overlay. Not visible to other loans
    /// until `commit`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pending.insert(key.into(), value.into());
    }

    /// Merge the overlay into the committed map, discarding it.
    ///
    /// Returns whether any key was actually written — callers use this to
    /// decide whether to fire the attribute-change broadcast (§4.3 step c,
    /// §4.4 step 5).
    pub fn commit(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.committed.extend(self.pending.drain());
        true
    }

    /// Discard the overlay, leaving the committed map untouched.
    pub fn rollback(&mut self) {
        self.pending.clear();
    }

    /// A read-only view of the committed map, for diagnostics/tests.
    pub fn committed(&self) -> &HashMap<String, String> {
        &self.committed
    }
}
