//! HTTP response types for the activity endpoints.
//!
//! These types serialize to the JSON format expected by the client.

use activities::{Activity, Attendee};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub city: String,
    pub venue: String,
    pub is_cancelled: bool,
    /// User id of the host.
    pub host_id: Option<String>,
    pub attendees: Vec<AttendeeResponse>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id().to_string(),
            host_id: activity.host().map(|host| host.user_id.to_string()),
            is_cancelled: activity.is_cancelled(),
            attendees: activity
                .attendees()
                .iter()
                .map(AttendeeResponse::from)
                .collect(),
            title: activity.title,
            description: activity.description,
            category: activity.category,
            date: activity.date,
            city: activity.city,
            venue: activity.venue,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub user_id: String,
    pub is_host: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl From<&Attendee> for AttendeeResponse {
    fn from(attendee: &Attendee) -> Self {
        Self {
            user_id: attendee.user_id.to_string(),
            is_host: attendee.is_host,
            joined_at: attendee.joined_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activities::{ActivityDraft, ActivityId, UserId};
    use time::macros::datetime;

    #[test]
    fn serializes_camel_case_with_rfc3339_dates() {
        let activity = Activity::hosted_by(
            ActivityId::generate(),
            ActivityDraft {
                title: "Run Club".to_string(),
                description: "5k".to_string(),
                category: "running".to_string(),
                date: Some(datetime!(2026-11-01 09:00 UTC)),
                city: "X".to_string(),
                venue: "Y".to_string(),
            },
            UserId::from("u1"),
            datetime!(2026-10-01 12:00 UTC),
        )
        .unwrap();

        let json = serde_json::to_value(ActivityResponse::from(activity)).unwrap();

        assert_eq!(json["date"], "2026-11-01T09:00:00Z");
        assert_eq!(json["isCancelled"], false);
        assert_eq!(json["hostId"], "u1");
        assert_eq!(json["attendees"][0]["userId"], "u1");
        assert_eq!(json["attendees"][0]["isHost"], true);
    }
}
