use std::sync::Arc;

use activities::{ActivityId, ActivityStore, StoreError, UserId};
use async_trait::async_trait;

/// Decides whether a user may modify an activity.
#[async_trait]
pub trait HostPolicy: Send + Sync + 'static {
    /// `None` when the activity does not exist.
    async fn is_host(&self, user: &UserId, activity: ActivityId)
        -> Result<Option<bool>, StoreError>;
}

/// Looks the host up in the activity store.
pub struct StoreHostPolicy {
    store: Arc<dyn ActivityStore>,
}

impl StoreHostPolicy {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HostPolicy for StoreHostPolicy {
    async fn is_host(
        &self,
        user: &UserId,
        activity: ActivityId,
    ) -> Result<Option<bool>, StoreError> {
        let mut unit = self.store.begin().await?;
        let activity = unit.find_by_id(activity).await?;

        Ok(activity.map(|activity| {
            activity
                .host()
                .is_some_and(|host| &host.user_id == user)
        }))
    }
}
