//! In-memory [`ActivityStore`].
//!
//! Backs the tests and the `memory` store backend of the API. Knobs for
//! latency, outages and dropped writes let tests drive the fault and
//! persistence-no-op paths.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{insert_rows, rebase, ActivityDiff, PendingChanges};
use crate::{
    domain::{Activity, ActivityId},
    ports::{ActivityStore, PendingChange, StoreError, UnitOfWork},
};

#[derive(Clone, Default)]
pub struct InMemoryActivityStore {
    activities: Arc<RwLock<Vec<Activity>>>,
    latency: Option<Duration>,
    offline: bool,
    discard_writes: bool,
}

impl InMemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Order is kept as creation order.
    pub fn with_activities(self, activities: Vec<Activity>) -> Self {
        Self {
            activities: Arc::new(RwLock::new(activities)),
            ..self
        }
    }

    /// Delay every store operation.
    pub fn with_latency(self, latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..self
        }
    }

    /// Fail every operation with [`StoreError::Unavailable`].
    pub fn offline(self) -> Self {
        Self {
            offline: true,
            ..self
        }
    }

    /// Accept saves but persist nothing and report zero rows.
    pub fn discarding_writes(self) -> Self {
        Self {
            discard_writes: true,
            ..self
        }
    }

    /// Current contents, for assertions.
    pub async fn snapshot(&self) -> Vec<Activity> {
        self.activities.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.activities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.activities.read().await.is_empty()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(InMemoryUnitOfWork {
            store: self.clone(),
            pending: PendingChanges::default(),
        }))
    }
}

pub struct InMemoryUnitOfWork {
    store: InMemoryActivityStore,
    pending: PendingChanges,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn add(&mut self, activity: Activity) {
        self.pending.add(activity);
    }

    async fn find_by_id(&mut self, id: ActivityId) -> Result<Option<Activity>, StoreError> {
        self.store.ensure_online()?;
        self.store.pause().await;

        let activities = self.store.activities.read().await;
        let activity = activities.iter().find(|a| a.id() == id).cloned();
        if let Some(activity) = &activity {
            self.pending.loaded(activity);
        }
        Ok(activity)
    }

    async fn query_all(&mut self) -> Result<Vec<Activity>, StoreError> {
        self.store.ensure_online()?;
        self.store.pause().await;

        let activities = self.store.activities.read().await.clone();
        for activity in &activities {
            self.pending.loaded(activity);
        }
        Ok(activities)
    }

    fn update(&mut self, activity: Activity) {
        self.pending.update(activity);
    }

    fn remove(&mut self, id: ActivityId) {
        self.pending.remove(id);
    }

    async fn save(&mut self) -> Result<u64, StoreError> {
        self.store.ensure_online()?;
        let changes = self.pending.take();
        if changes.is_empty() {
            return Ok(0);
        }
        self.store.pause().await;
        if self.store.discard_writes {
            return Ok(0);
        }

        let mut activities = self.store.activities.write().await;
        // Work on a copy so a conflict leaves the store untouched.
        let mut next = activities.clone();
        let mut rows = 0;
        for change in changes {
            rows += apply(&mut next, change)?;
        }
        *activities = next;

        Ok(rows)
    }
}

fn apply(activities: &mut Vec<Activity>, change: PendingChange) -> Result<u64, StoreError> {
    match change {
        PendingChange::Add(activity) => {
            if activities.iter().any(|a| a.id() == activity.id()) {
                return Err(StoreError::Conflict(format!(
                    "activity {} already exists",
                    activity.id()
                )));
            }
            let rows = insert_rows(&activity);
            activities.push(activity);
            Ok(rows)
        }
        PendingChange::Update { loaded, staged } => {
            let Some(persisted) = activities.iter_mut().find(|a| a.id() == staged.id()) else {
                return Ok(0);
            };
            let next = rebase(loaded.as_ref(), &staged, persisted);
            let rows = ActivityDiff::between(persisted, &next).rows();
            *persisted = next;
            Ok(rows)
        }
        PendingChange::Remove(id) => {
            let before = activities.len();
            activities.retain(|a| a.id() != id);
            Ok((before - activities.len()) as u64)
        }
    }
}
