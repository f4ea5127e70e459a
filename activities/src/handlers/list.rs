use async_trait::async_trait;

use super::{Handler, HandlerResult};
use crate::{domain::Activity, outcome::Outcome, ports::UnitOfWork, request::ListActivities};

pub struct ListHandler;

#[async_trait]
impl Handler for ListHandler {
    type Request = ListActivities;

    async fn handle(
        &self,
        _request: ListActivities,
        store: &mut dyn UnitOfWork,
    ) -> HandlerResult<Vec<Activity>> {
        let activities = store.query_all().await?;
        Ok(Outcome::success(activities))
    }
}
