use async_trait::async_trait;
use time::OffsetDateTime;

use super::{Handler, HandlerResult, NOT_FOUND};
use crate::{
    outcome::Outcome,
    ports::UnitOfWork,
    request::UpdateAttendance,
    validation::{not_blank, RuleSet},
};

/// Toggles the acting user's attendance.
pub struct UpdateAttendanceHandler;

impl UpdateAttendanceHandler {
    pub fn rules() -> RuleSet<UpdateAttendance> {
        RuleSet::new().rule("user", "User is required", |r: &UpdateAttendance| {
            not_blank(r.user.as_str())
        })
    }
}

#[async_trait]
impl Handler for UpdateAttendanceHandler {
    type Request = UpdateAttendance;

    async fn handle(
        &self,
        request: UpdateAttendance,
        store: &mut dyn UnitOfWork,
    ) -> HandlerResult<()> {
        // Existence first; attendance state means nothing without the activity.
        let Some(mut activity) = store.find_by_id(request.id).await? else {
            return Ok(Outcome::not_found(NOT_FOUND));
        };

        let change = activity.toggle_attendance(&request.user, OffsetDateTime::now_utc());
        store.update(activity);

        if store.save().await? == 0 {
            return Ok(Outcome::failure("Failed to update attendance"));
        }

        tracing::debug!(activity = %request.id, user = %request.user, ?change, "Attendance updated");
        Ok(Outcome::success(()))
    }
}
