mod save;
mod show;
pub mod store;

use axum::{Router, routing::get};
use serde_json::Value;

use crate::{AppState, Issue, validate::{Fields, Validate}};

pub use save::save_profile;
pub use show::get_profile;

pub const MIN_AGE: i64 = 6;
pub const MAX_AGE: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(show::get_profile).post(save::save_profile))
}

/// What a user submits about themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub name: String,
    pub age: i64,
    pub grade: String,
    pub favorite_subjects: String,
    pub bio: Option<String>,
}

impl Validate for NewProfile {
    fn validate(body: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::new(body)?;

        let name = fields.required_str("name", "Name is required");
        let age = fields.required_int("age");
        let grade = fields.required_str("grade", "Grade is required");
        let favorite_subjects = fields.required_str("favorite_subjects", "At least one subject is required");
        let bio = fields.optional_str("bio");

        if let Some(age) = age {
            fields.check(age >= MIN_AGE, "too_small", "age", "Age must be at least 6");
            fields.check(age <= MAX_AGE, "too_big", "age", "Age must be less than 100");
        }

        fields.finish()?;
        Ok(NewProfile {
            name,
            age: age.unwrap_or_default(),
            grade,
            favorite_subjects,
            bio,
        })
    }
}
