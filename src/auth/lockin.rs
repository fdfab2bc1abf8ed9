use axum::{debug_handler, extract::{Path, Query, State}, http::header::USER_AGENT, response::Redirect};
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeVerifier, TokenResponse};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use crate::{AppError, AppResult, GetField, Issue, session::{CSRF_STATE, PKCE_VERIFIER, RETURN_URL, USER_ID}};

use super::{Clients, clients::ClientProvider};

#[derive(Deserialize)]
pub struct LockinQuery {
    pub state: Option<String>,
    pub code: Option<String>,
}

/// Where the identity provider sends the browser back to.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn lockin(
    Path(provider): Path<ClientProvider>,
    Query(LockinQuery { state, code }): Query<LockinQuery>,
    State(clients): State<Clients>,
    session: Session,
) -> AppResult<Redirect> {
    let Some(code) = code else {
        return Err(AppError::Invalid(vec![Issue::new("invalid_type", "code", "No authorization code provided")]));
    };
    let state = CsrfToken::new(state.unwrap_or_default());

    let Some(stored_state) = session.remove::<String>(CSRF_STATE).await? else {
        return Err(AppError::Unauthorized);
    };
    if state.secret().as_str() != stored_state.as_str() {
        tracing::warn!(%provider, "csrf tokens don't match");
        return Err(AppError::Unauthorized);
    }

    let Some(pkce_verifier) = session.remove::<String>(PKCE_VERIFIER).await? else {
        return Err(AppError::Unauthorized);
    };

    let client = clients.get_client(provider)?;
    let token_result = client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
        .request_async(&clients.http_client)
        .await?;

    let user_info: Value = clients.http_client
        .get(provider.userinfo_url())
        .bearer_auth(token_result.access_token().secret())
        .header(USER_AGENT, concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let user_id = format!("{provider}:{}", user_info.get_id_field("id")?);
    let return_url = session.remove::<String>(RETURN_URL).await?;

    session.cycle_id().await?;
    session.insert(USER_ID, &user_id).await?;
    tracing::info!(user_id = %user_id, "welcome");

    Ok(Redirect::to(return_url.as_deref().unwrap_or("/")))
}
