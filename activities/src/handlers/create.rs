use async_trait::async_trait;
use time::OffsetDateTime;

use super::{Handler, HandlerResult};
use crate::{
    domain::{Activity, ActivityDraft, ActivityId},
    outcome::Outcome,
    ports::UnitOfWork,
    request::CreateActivity,
    validation::{not_blank, RuleSet},
};

pub struct CreateHandler;

impl CreateHandler {
    pub fn rules() -> RuleSet<CreateActivity> {
        ActivityDraft::rules(draft_of).rule(
            "creator",
            "Creator is required",
            |c: &CreateActivity| not_blank(c.creator.as_str()),
        )
    }
}

fn draft_of(request: &CreateActivity) -> &ActivityDraft {
    &request.draft
}

#[async_trait]
impl Handler for CreateHandler {
    type Request = CreateActivity;

    async fn handle(&self, request: CreateActivity, store: &mut dyn UnitOfWork) -> HandlerResult<()> {
        let id = ActivityId::generate();
        let activity = match Activity::hosted_by(
            id,
            request.draft,
            request.creator,
            OffsetDateTime::now_utc(),
        ) {
            Ok(activity) => activity,
            Err(err) => return Ok(Outcome::validation_failed(err.to_string())),
        };

        store.add(activity);
        if store.save().await? == 0 {
            return Ok(Outcome::failure("Failed to create activity"));
        }

        tracing::debug!(%id, "Activity created");
        Ok(Outcome::success(()))
    }
}
