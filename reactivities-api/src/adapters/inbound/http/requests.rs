//! HTTP request bodies for the activity endpoints.

use activities::ActivityDraft;
use serde::Deserialize;
use time::OffsetDateTime;

/// Body of create and edit requests.
///
/// Every field may be omitted; missing values surface as validation
/// failures from the dispatcher rather than as JSON rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityBody {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub city: String,
    pub venue: String,
}

impl From<ActivityBody> for ActivityDraft {
    fn from(body: ActivityBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            category: body.category,
            date: body.date,
            city: body.city,
            venue: body.venue,
        }
    }
}
