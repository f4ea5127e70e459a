use std::collections::HashMap;

use crate::{
    domain::{Activity, ActivityId},
    ports::PendingChange,
};

/// Writes staged on a unit of work, in the order they were made, along with
/// the activities as the unit of work first read them.
#[derive(Debug, Default)]
pub struct PendingChanges {
    changes: Vec<PendingChange>,
    loaded: HashMap<ActivityId, Activity>,
}

impl PendingChanges {
    /// Remembers `activity` as read from the store. The first read wins.
    pub fn loaded(&mut self, activity: &Activity) {
        self.loaded
            .entry(activity.id())
            .or_insert_with(|| activity.clone());
    }

    pub fn add(&mut self, activity: Activity) {
        self.changes.push(PendingChange::Add(activity));
    }

    pub fn update(&mut self, activity: Activity) {
        self.changes.push(PendingChange::Update {
            loaded: self.loaded.get(&activity.id()).cloned(),
            staged: activity,
        });
    }

    pub fn remove(&mut self, id: ActivityId) {
        self.changes.push(PendingChange::Remove(id));
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Drains the staged writes; the unit of work starts clean afterwards.
    pub fn take(&mut self) -> Vec<PendingChange> {
        self.loaded.clear();
        std::mem::take(&mut self.changes)
    }
}
