//! Store building blocks shared by every [`ActivityStore`](crate::ActivityStore)
//! implementation, plus the in-memory store.

mod diff;
mod memory;
mod pending;

pub use diff::{insert_rows, rebase, ActivityDiff};
pub use memory::{InMemoryActivityStore, InMemoryUnitOfWork};
pub use pending::PendingChanges;
