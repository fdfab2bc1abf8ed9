mod completion;
mod list;
mod orchestrator;
pub mod prompt;
pub mod store;

use axum::{Router, routing::get};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{AppError, AppState, db::Profile};

pub use completion::{Completion, CompletionError, OpenAiCompletion};
pub use list::get_matches;
pub use orchestrator::find_matches;

/// How many partners the completion service is asked for, and how many of its
/// suggestions are considered.
pub const MAX_SUGGESTIONS: usize = 3;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches", get(list::get_matches))
}

/// A suggested partner as shown to the client. `id` and the timestamps are
/// minted per response and are not the stored match row's.
#[derive(Debug, Clone, Serialize)]
pub struct MatchWithProfile {
    pub id: Uuid,
    pub user_id: String,
    pub matched_user_id: String,
    pub compatibility_score: f64,
    pub match_reason: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub matched_profile: Profile,
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("completion is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("completion is malformed: {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Store(err) => AppError::Internal(err.into()),
            err => AppError::Matching(err.into()),
        }
    }
}
