pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod matches;
pub mod messages;
pub mod profiles;
pub mod session;
pub mod study_sessions;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use axum::{Router, extract::FromRef};
use serde_json::Value;
use sqlx::SqlitePool;

pub use appresult::{AppError, AppResult, Issue};
pub use config::Config;
pub use matches::Completion;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub clients: auth::Clients,
    pub completion: Arc<dyn Completion>,
}

/// Every JSON endpoint, meant to be nested under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(profiles::router())
        .merge(matches::router())
        .merge(messages::router())
        .merge(study_sessions::router())
}

pub trait GetField {
    fn get_id_field(&self, field: &str) -> AppResult<String>;
}

impl GetField for serde_json::Value {
    // providers disagree on whether ids are strings or numbers
    fn get_id_field(&self, field: &str) -> AppResult<String> {
        match self.get(field) {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(format!("expected {field} in {self} to be an id").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::GetField;

    #[test]
    fn id_field_accepts_strings_and_numbers() {
        let google = json!({ "id": "10769150350006150715113082367" });
        let github = json!({ "id": 583231, "login": "octocat" });

        assert_eq!(google.get_id_field("id").unwrap(), "10769150350006150715113082367");
        assert_eq!(github.get_id_field("id").unwrap(), "583231");
        assert!(github.get_id_field("missing").is_err());
        assert!(json!({ "id": "" }).get_id_field("id").is_err());
    }
}
