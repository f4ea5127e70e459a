use async_trait::async_trait;

use super::{Handler, HandlerResult, NOT_FOUND};
use crate::{domain::Activity, outcome::Outcome, ports::UnitOfWork, request::ActivityDetails};

pub struct DetailsHandler;

#[async_trait]
impl Handler for DetailsHandler {
    type Request = ActivityDetails;

    async fn handle(
        &self,
        request: ActivityDetails,
        store: &mut dyn UnitOfWork,
    ) -> HandlerResult<Activity> {
        match store.find_by_id(request.id).await? {
            Some(activity) => Ok(Outcome::success(activity)),
            None => Ok(Outcome::not_found(NOT_FOUND)),
        }
    }
}
