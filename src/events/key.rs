//! # Event category identity.
//!
//! [`EventKey`] is the opaque token that distinguishes one category of events
//! from another. Every listener is registered under exactly one key, and every
//! published [`Event`](crate::events::Event) carries the key of its category.
//!
//! ## Rules
//! - **Create once per category**: call [`EventKey::new`] a single time for a
//!   given event class and share the resulting key (it is `Copy`).
//! - **Identity, not name**: two keys created with the same name are *different*
//!   categories. The name is a label for logs, never part of equality.
//! - **No runtime type inspection**: the bus resolves listeners by direct map
//!   lookup on the key; payload types are never inspected.
//!
//! ## Example
//! ```rust
//! use evbus::EventKey;
//!
//! let a = EventKey::new("order.created");
//! let b = EventKey::new("order.created");
//! let same = a;
//!
//! assert_eq!(a, same);
//! assert_ne!(a, b); // same label, distinct categories
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter for key identity allocation.
static KEY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of an event category.
///
/// Cheap to copy and suitable as a map key. Equality and hashing use the
/// internal id only; the name is a human-readable label for logs and faults.
#[derive(Clone, Copy, Debug)]
pub struct EventKey {
    id: u64,
    name: &'static str,
}

impl EventKey {
    /// Allocates a new, globally unique key labeled `name`.
    ///
    /// Each call produces a distinct identity, including calls with an
    /// identical name. Typically stored in a `static OnceLock` or passed
    /// around from the place the category is defined.
    pub fn new(name: &'static str) -> Self {
        Self {
            id: KEY_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            name,
        }
    }

    /// Returns the human-readable label this key was created with.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKey {}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
