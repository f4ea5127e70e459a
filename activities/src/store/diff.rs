use crate::{
    domain::{Activity, Attendee},
    ports::ApplyFields,
};

/// Row-level difference between a persisted activity and a modified copy.
#[derive(Debug)]
pub struct ActivityDiff<'a> {
    /// Any of the editable fields differ.
    pub content_changed: bool,
    /// The new cancellation flag, when it differs.
    pub cancelled: Option<bool>,
    pub joined: Vec<&'a Attendee>,
    pub left: Vec<&'a Attendee>,
}

impl<'a> ActivityDiff<'a> {
    pub fn between(persisted: &'a Activity, current: &'a Activity) -> Self {
        let joined = current
            .attendees()
            .iter()
            .filter(|a| persisted.attendee(&a.user_id).is_none())
            .collect();
        let left = persisted
            .attendees()
            .iter()
            .filter(|a| current.attendee(&a.user_id).is_none())
            .collect();

        Self {
            content_changed: persisted.to_draft() != current.to_draft(),
            cancelled: (persisted.is_cancelled() != current.is_cancelled())
                .then_some(current.is_cancelled()),
            joined,
            left,
        }
    }

    /// True when the activity row itself needs writing.
    pub fn row_changed(&self) -> bool {
        self.content_changed || self.cancelled.is_some()
    }

    pub fn rows(&self) -> u64 {
        u64::from(self.row_changed()) + self.joined.len() as u64 + self.left.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// Replays this change on top of `current`.
    ///
    /// Only what changed is carried over: untouched fields, the flag and
    /// attendees keep whatever `current` holds, so writes that committed in
    /// the meantime survive.
    pub fn replay_onto(&self, staged: &Activity, current: &Activity) -> Activity {
        let mut next = current.clone();
        if self.content_changed {
            next.apply_fields(&staged.to_draft());
        }
        if let Some(is_cancelled) = self.cancelled {
            next.set_cancelled(is_cancelled);
        }
        for attendee in &self.left {
            next.dismiss(&attendee.user_id);
        }
        for attendee in &self.joined {
            next.admit((*attendee).clone());
        }
        next
    }
}

/// What `current` becomes once `staged` is committed on top of it.
///
/// `loaded` is the activity as the writer read it. Without one, the staged
/// copy replaces the current one wholesale.
pub fn rebase(loaded: Option<&Activity>, staged: &Activity, current: &Activity) -> Activity {
    match loaded {
        Some(loaded) => ActivityDiff::between(loaded, staged).replay_onto(staged, current),
        None => staged.clone(),
    }
}

pub fn insert_rows(activity: &Activity) -> u64 {
    1 + activity.attendees().len() as u64
}
