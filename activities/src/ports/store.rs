//! Activity store port (outbound).
//!
//! The store hands out one [`UnitOfWork`] per dispatched request. Reads go
//! straight to the backing store; writes are staged and committed together by
//! [`UnitOfWork::save`], which reports how many rows actually changed.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Activity, ActivityId};

/// Infrastructure failure inside the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("conflicting write: {0}")]
    Conflict(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A write staged on a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    Add(Activity),
    /// `staged` is the handler's copy; `loaded` is the activity as it was
    /// read by the same unit of work, if it was read at all.
    Update {
        loaded: Option<Activity>,
        staged: Activity,
    },
    Remove(ActivityId),
}

/// Outbound port for activity persistence.
#[async_trait]
pub trait ActivityStore: Send + Sync + 'static {
    /// Open a unit of work scoped to a single request.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;
}

/// Request-scoped view of the store.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Stage a new activity, attendees included.
    fn add(&mut self, activity: Activity);

    async fn find_by_id(&mut self, id: ActivityId) -> Result<Option<Activity>, StoreError>;

    /// All activities in creation order.
    async fn query_all(&mut self) -> Result<Vec<Activity>, StoreError>;

    /// Stage a modified aggregate. Only what differs from the persisted
    /// version is written.
    fn update(&mut self, activity: Activity);

    /// Stage a deletion. Attendees go with the activity.
    fn remove(&mut self, id: ActivityId);

    /// Commit staged writes atomically and return the number of rows
    /// affected. Zero means nothing changed.
    async fn save(&mut self) -> Result<u64, StoreError>;
}
