use thiserror::Error;
use time::OffsetDateTime;

use super::{ActivityDraft, ActivityId, UserId};
use crate::ports::ApplyFields;

/// A user's membership in an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub user_id: UserId,
    pub activity_id: ActivityId,
    pub is_host: bool,
    pub joined_at: OffsetDateTime,
}

/// Where a user stands with respect to one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attendance {
    NotAttending,
    Attending,
    Hosting,
}

/// What a call to [`Activity::toggle_attendance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceChange {
    Joined,
    Left,
    /// The host toggled; the activity was cancelled instead of losing its host.
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("activity draft has no date")]
pub struct MissingDate;

/// An activity and the attendees it owns.
///
/// Holds exactly one host attendee at all times. The id and the attendee set
/// can only change through the methods below; content fields are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    id: ActivityId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: OffsetDateTime,
    pub city: String,
    pub venue: String,
    is_cancelled: bool,
    attendees: Vec<Attendee>,
}

impl Activity {
    /// A new activity with `host` as its only attendee.
    pub fn hosted_by(
        id: ActivityId,
        draft: ActivityDraft,
        host: UserId,
        now: OffsetDateTime,
    ) -> Result<Self, MissingDate> {
        let host = Attendee {
            user_id: host,
            activity_id: id,
            is_host: true,
            joined_at: now,
        };
        Self::restore(id, draft, false, vec![host])
    }

    /// Rebuilds an activity from persisted parts.
    pub fn restore(
        id: ActivityId,
        draft: ActivityDraft,
        is_cancelled: bool,
        attendees: Vec<Attendee>,
    ) -> Result<Self, MissingDate> {
        let date = draft.date.ok_or(MissingDate)?;
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            date,
            city: draft.city,
            venue: draft.venue,
            is_cancelled,
            attendees,
        })
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn attendee(&self, user: &UserId) -> Option<&Attendee> {
        self.attendees.iter().find(|a| &a.user_id == user)
    }

    pub fn host(&self) -> Option<&Attendee> {
        self.attendees.iter().find(|a| a.is_host)
    }

    pub fn attendance_of(&self, user: &UserId) -> Attendance {
        match self.attendee(user) {
            None => Attendance::NotAttending,
            Some(attendee) if attendee.is_host => Attendance::Hosting,
            Some(_) => Attendance::Attending,
        }
    }

    /// Flips the user's attendance.
    ///
    /// A newcomer joins, an attendee leaves, and the host cancels the whole
    /// activity (the host attendee is kept).
    pub fn toggle_attendance(&mut self, user: &UserId, now: OffsetDateTime) -> AttendanceChange {
        match self.attendance_of(user) {
            Attendance::NotAttending => {
                self.attendees.push(Attendee {
                    user_id: user.clone(),
                    activity_id: self.id,
                    is_host: false,
                    joined_at: now,
                });
                AttendanceChange::Joined
            }
            Attendance::Attending => {
                self.attendees.retain(|a| &a.user_id != user);
                AttendanceChange::Left
            }
            Attendance::Hosting => {
                self.is_cancelled = true;
                AttendanceChange::Cancelled
            }
        }
    }

    pub(crate) fn set_cancelled(&mut self, is_cancelled: bool) {
        self.is_cancelled = is_cancelled;
    }

    /// Adds `attendee` unless the user already attends.
    pub(crate) fn admit(&mut self, attendee: Attendee) -> bool {
        if self.attendee(&attendee.user_id).is_some() {
            return false;
        }
        self.attendees.push(attendee);
        true
    }

    /// Removes a non-host attendee. The host is never removed.
    pub(crate) fn dismiss(&mut self, user: &UserId) -> bool {
        let before = self.attendees.len();
        self.attendees.retain(|a| &a.user_id != user || a.is_host);
        self.attendees.len() != before
    }

    /// The content fields as a draft.
    pub fn to_draft(&self) -> ActivityDraft {
        ActivityDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            date: Some(self.date),
            city: self.city.clone(),
            venue: self.venue.clone(),
        }
    }
}

impl ApplyFields<ActivityDraft> for Activity {
    /// Copies the editable fields. Id, cancellation and attendees are left
    /// alone; a draft without a date keeps the current one.
    fn apply_fields(&mut self, source: &ActivityDraft) {
        self.title.clone_from(&source.title);
        self.description.clone_from(&source.description);
        self.category.clone_from(&source.category);
        if let Some(date) = source.date {
            self.date = date;
        }
        self.city.clone_from(&source.city);
        self.venue.clone_from(&source.venue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn draft() -> ActivityDraft {
        ActivityDraft {
            title: "Run Club".to_string(),
            description: "5k along the river".to_string(),
            category: "running".to_string(),
            date: Some(datetime!(2026-11-01 09:00 UTC)),
            city: "X".to_string(),
            venue: "Y".to_string(),
        }
    }

    fn run_club(host: &str) -> Activity {
        Activity::hosted_by(
            ActivityId::generate(),
            draft(),
            UserId::from(host),
            datetime!(2026-10-01 12:00 UTC),
        )
        .unwrap()
    }

    #[test]
    fn creator_becomes_the_only_host() {
        let activity = run_club("u1");

        assert_eq!(activity.attendees().len(), 1);
        let host = activity.host().unwrap();
        assert_eq!(host.user_id, UserId::from("u1"));
        assert_eq!(host.activity_id, activity.id());
        assert!(!activity.is_cancelled());
        assert_eq!(activity.attendance_of(&UserId::from("u1")), Attendance::Hosting);
    }

    #[test]
    fn draft_without_date_is_rejected() {
        let draft = ActivityDraft {
            date: None,
            ..draft()
        };

        let result = Activity::hosted_by(
            ActivityId::generate(),
            draft,
            UserId::from("u1"),
            OffsetDateTime::now_utc(),
        );

        assert_eq!(result, Err(MissingDate));
    }

    #[test]
    fn toggling_twice_returns_to_not_attending() {
        let mut activity = run_club("u1");
        let before = activity.attendees().to_vec();
        let u2 = UserId::from("u2");
        let now = datetime!(2026-10-02 08:30 UTC);

        assert_eq!(activity.toggle_attendance(&u2, now), AttendanceChange::Joined);
        assert_eq!(activity.attendance_of(&u2), Attendance::Attending);
        let joined = activity.attendee(&u2).unwrap();
        assert!(!joined.is_host);
        assert_eq!(joined.joined_at, now);

        assert_eq!(activity.toggle_attendance(&u2, now), AttendanceChange::Left);
        assert_eq!(activity.attendance_of(&u2), Attendance::NotAttending);
        assert_eq!(activity.attendees(), before.as_slice());
    }

    #[test]
    fn host_toggle_cancels_and_keeps_host() {
        let mut activity = run_club("u1");
        let host = UserId::from("u1");

        let change = activity.toggle_attendance(&host, OffsetDateTime::now_utc());

        assert_eq!(change, AttendanceChange::Cancelled);
        assert!(activity.is_cancelled());
        assert_eq!(activity.attendance_of(&host), Attendance::Hosting);
        assert_eq!(activity.attendees().len(), 1);
    }

    #[test]
    fn apply_fields_leaves_identity_and_attendees() {
        let mut activity = run_club("u1");
        activity.toggle_attendance(&UserId::from("u2"), OffsetDateTime::now_utc());
        let id = activity.id();
        let attendees = activity.attendees().to_vec();

        activity.apply_fields(&ActivityDraft {
            title: "Trail Club".to_string(),
            date: None,
            ..draft()
        });

        assert_eq!(activity.title, "Trail Club");
        assert_eq!(activity.date, datetime!(2026-11-01 09:00 UTC));
        assert_eq!(activity.id(), id);
        assert_eq!(activity.attendees(), attendees.as_slice());
    }

    #[test]
    fn admit_and_dismiss_keep_one_entry_per_user() {
        let mut activity = run_club("u1");
        let guest = Attendee {
            user_id: UserId::from("u2"),
            activity_id: activity.id(),
            is_host: false,
            joined_at: OffsetDateTime::now_utc(),
        };

        assert!(activity.admit(guest.clone()));
        assert!(!activity.admit(guest));
        assert_eq!(activity.attendees().len(), 2);

        assert!(activity.dismiss(&UserId::from("u2")));
        assert!(!activity.dismiss(&UserId::from("u2")));
        assert!(!activity.dismiss(&UserId::from("u1")));
        assert_eq!(activity.attendance_of(&UserId::from("u1")), Attendance::Hosting);
    }
}
