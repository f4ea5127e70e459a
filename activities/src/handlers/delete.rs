use async_trait::async_trait;

use super::{Handler, HandlerResult, NOT_FOUND};
use crate::{outcome::Outcome, ports::UnitOfWork, request::DeleteActivity};

pub struct DeleteHandler;

#[async_trait]
impl Handler for DeleteHandler {
    type Request = DeleteActivity;

    async fn handle(&self, request: DeleteActivity, store: &mut dyn UnitOfWork) -> HandlerResult<()> {
        if store.find_by_id(request.id).await?.is_none() {
            return Ok(Outcome::not_found(NOT_FOUND));
        }

        store.remove(request.id);
        if store.save().await? == 0 {
            return Ok(Outcome::failure("Failed to delete the activity"));
        }

        Ok(Outcome::success(()))
    }
}
