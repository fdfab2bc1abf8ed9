mod logbook;
pub mod store;

use axum::{Router, routing::get};
use serde_json::Value;

use crate::{AppState, Issue, validate::{Fields, Validate}};

pub use logbook::{add_session, list_sessions};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(logbook::list_sessions).post(logbook::add_session))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewSession {
    pub subject: String,
    pub partner_id: Option<String>,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
}

impl Validate for NewSession {
    fn validate(body: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::new(body)?;

        let subject = fields.required_str("subject", "Subject is required");
        let partner_id = fields.optional_str("partner_id").filter(|id| !id.is_empty());
        let duration_minutes = fields.optional_int("duration_minutes");
        let notes = fields.optional_str("notes");

        if let Some(minutes) = duration_minutes {
            fields.check(minutes >= 0, "too_small", "duration_minutes", "Duration cannot be negative");
        }

        fields.finish()?;
        Ok(NewSession {
            subject,
            partner_id,
            // zero minutes is stored as unknown
            duration_minutes: duration_minutes.filter(|minutes| *minutes > 0),
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::NewSession;
    use crate::validate::Validate;

    #[test]
    fn only_subject_is_required() {
        let session = NewSession::validate(&json!({ "subject": "Algebra" })).unwrap();
        assert_eq!(session, NewSession { subject: "Algebra".to_owned(), ..Default::default() });

        let issues = NewSession::validate(&json!({ "subject": "" })).unwrap_err();
        assert_eq!(issues[0].message, "Subject is required");
    }

    #[test]
    fn blank_optionals_are_absent() {
        let session = NewSession::validate(&json!({
            "subject": "Chemistry",
            "partner_id": "",
            "duration_minutes": 0,
            "notes": null,
        }))
        .unwrap();

        assert_eq!(session.partner_id, None);
        assert_eq!(session.duration_minutes, None);
        assert_eq!(session.notes, None);
    }

    #[test]
    fn duration_must_be_a_whole_non_negative_number() {
        assert!(NewSession::validate(&json!({ "subject": "Bio", "duration_minutes": -5 })).is_err());
        assert!(NewSession::validate(&json!({ "subject": "Bio", "duration_minutes": "45" })).is_err());
        assert_eq!(
            NewSession::validate(&json!({ "subject": "Bio", "duration_minutes": 45 })).unwrap().duration_minutes,
            Some(45)
        );
    }
}
