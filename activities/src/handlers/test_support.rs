use time::{macros::datetime, OffsetDateTime};

use crate::{
    domain::{Activity, ActivityDraft, ActivityId, UserId},
    ports::{ActivityStore, UnitOfWork},
    InMemoryActivityStore,
};

pub(crate) fn draft(title: &str) -> ActivityDraft {
    ActivityDraft {
        title: title.to_string(),
        description: "Weekly meetup".to_string(),
        category: "running".to_string(),
        date: Some(datetime!(2026-11-01 09:00 UTC)),
        city: "X".to_string(),
        venue: "Y".to_string(),
    }
}

pub(crate) fn activity(title: &str, host: &str) -> Activity {
    Activity::hosted_by(
        ActivityId::generate(),
        draft(title),
        UserId::from(host),
        OffsetDateTime::now_utc(),
    )
    .unwrap()
}

pub(crate) async fn unit_of(store: &InMemoryActivityStore) -> Box<dyn UnitOfWork> {
    store.begin().await.unwrap()
}
