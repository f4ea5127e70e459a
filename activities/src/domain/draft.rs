use time::OffsetDateTime;

use crate::validation::{not_blank, RuleSet};

/// The editable content of an activity.
///
/// Create builds a new activity from a draft; Edit merges a draft onto the
/// persisted one. `date` is optional here so that a missing date is reported
/// as a validation failure instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: Option<OffsetDateTime>,
    pub city: String,
    pub venue: String,
}

impl ActivityDraft {
    /// Validation rules for a draft embedded in request `R`.
    ///
    /// `draft` projects the request onto the draft it carries, so the same
    /// rules serve both Create and Edit.
    pub fn rules<R: 'static>(draft: fn(&R) -> &ActivityDraft) -> RuleSet<R> {
        RuleSet::new()
            .rule("title", "Title is required", move |r: &R| {
                not_blank(&draft(r).title)
            })
            .rule("description", "Description is required", move |r: &R| {
                not_blank(&draft(r).description)
            })
            .rule("category", "Category is required", move |r: &R| {
                not_blank(&draft(r).category)
            })
            .rule("date", "Date is required", move |r: &R| draft(r).date.is_some())
            .rule("city", "City is required", move |r: &R| {
                not_blank(&draft(r).city)
            })
            .rule("venue", "Venue is required", move |r: &R| {
                not_blank(&draft(r).venue)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn identity(draft: &ActivityDraft) -> &ActivityDraft {
        draft
    }

    #[test]
    fn complete_draft_passes() {
        let draft = ActivityDraft {
            title: "Run Club".to_string(),
            description: "5k along the river".to_string(),
            category: "running".to_string(),
            date: Some(datetime!(2026-11-01 09:00 UTC)),
            city: "X".to_string(),
            venue: "Y".to_string(),
        };

        assert!(ActivityDraft::rules(identity).validate(&draft).is_empty());
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let violations = ActivityDraft::rules(identity).validate(&ActivityDraft::default());

        let fields: Vec<_> = violations.iter().map(|v| v.rule).collect();
        assert_eq!(
            fields,
            vec!["title", "description", "category", "date", "city", "venue"]
        );
    }
}
