use async_trait::async_trait;

use super::{Handler, HandlerResult, NOT_FOUND};
use crate::{
    domain::ActivityDraft,
    outcome::Outcome,
    ports::{ApplyFields, UnitOfWork},
    request::EditActivity,
    validation::RuleSet,
};

pub struct EditHandler;

impl EditHandler {
    pub fn rules() -> RuleSet<EditActivity> {
        ActivityDraft::rules(draft_of)
    }
}

fn draft_of(request: &EditActivity) -> &ActivityDraft {
    &request.draft
}

#[async_trait]
impl Handler for EditHandler {
    type Request = EditActivity;

    async fn handle(&self, request: EditActivity, store: &mut dyn UnitOfWork) -> HandlerResult<()> {
        let Some(mut activity) = store.find_by_id(request.id).await? else {
            return Ok(Outcome::not_found(NOT_FOUND));
        };

        activity.apply_fields(&request.draft);
        store.update(activity);

        if store.save().await? == 0 {
            return Ok(Outcome::failure("Failed to update activity"));
        }

        Ok(Outcome::success(()))
    }
}
