//! Table change events pushed by the remote store
//!
//! Every mutation on a store table is broadcast to all connected listeners
//! as a `ChangeEvent`. Filtering by role is the subscriber's responsibility;
//! the transport delivers all rows.

use serde::{Deserialize, Serialize};

/// A single insert/update/delete notification for one table row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", rename_all = "lowercase")]
pub enum ChangeEvent<T> {
    /// A new row was created
    Insert { new: T },
    /// An existing row was rewritten (last-write-wins per row)
    Update { new: T },
    /// A row was removed. Carries the old row so subscribers can
    /// remove-by-id without a lookup.
    Delete { old: T },
}

impl<T> ChangeEvent<T> {
    /// The row payload, regardless of event kind
    pub fn row(&self) -> &T {
        match self {
            Self::Insert { new } | Self::Update { new } => new,
            Self::Delete { old } => old,
        }
    }
}
