use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::AppError;

pub const USER_ID: &str = "user_id";
pub const CSRF_STATE: &str = "csrf_state";
pub const PKCE_VERIFIER: &str = "pkce_verifier";
pub const RETURN_URL: &str = "return_url";

/// The signed-in user's id, taken from the session cookie.
///
/// Handlers that take this extractor never run for anonymous requests; those
/// are answered with 401 instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::from(msg))?;

        match session.get::<String>(USER_ID).await? {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => Err(AppError::Unauthorized),
        }
    }
}
