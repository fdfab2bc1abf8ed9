use std::fmt;

use oauth2::{AuthUrl, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RedirectUrl, TokenUrl, basic::BasicClient};
use serde::Deserialize;

use crate::{AppError, AppResult, Config, Issue, config::OAuthKeys};

type HappyClient = BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientProvider {
    Google,
    Github,
}

impl ClientProvider {
    pub fn id(&self) -> &'static str {
        use ClientProvider::*;
        match self {
            Google => "google",
            Github => "github",
        }
    }

    fn auth_url(&self) -> &'static str {
        use ClientProvider::*;
        match self {
            Google => "https://accounts.google.com/o/oauth2/auth",
            Github => "https://github.com/login/oauth/authorize",
        }
    }

    fn token_url(&self) -> &'static str {
        use ClientProvider::*;
        match self {
            Google => "https://oauth2.googleapis.com/token",
            Github => "https://github.com/login/oauth/access_token",
        }
    }

    pub fn userinfo_url(&self) -> &'static str {
        use ClientProvider::*;
        match self {
            Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            Github => "https://api.github.com/user",
        }
    }

    pub fn scopes(&self) -> &'static [&'static str] {
        use ClientProvider::*;
        match self {
            Google => &["openid", "profile"],
            Github => &["read:user"],
        }
    }
}

impl fmt::Display for ClientProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Clone, Default)]
pub struct Clients {
    pub(crate) http_client: oauth2::reqwest::Client,
    google_client: Option<HappyClient>,
    github_client: Option<HappyClient>,
}

impl Clients {
    pub fn from_config(config: &Config) -> AppResult<Clients> {
        Self::new(&config.oauth_redirect_base, config.google.as_ref(), config.github.as_ref())
    }

    /// Providers without keys stay disabled.
    pub fn new(redirect_base: &str, google: Option<&OAuthKeys>, github: Option<&OAuthKeys>) -> AppResult<Clients> {
        let http_client = oauth2::reqwest::ClientBuilder::new()
            .redirect(oauth2::reqwest::redirect::Policy::none())
            .build()?;

        Ok(Clients {
            http_client,
            google_client: google.map(|keys| build(ClientProvider::Google, keys, redirect_base)).transpose()?,
            github_client: github.map(|keys| build(ClientProvider::Github, keys, redirect_base)).transpose()?,
        })
    }

    pub fn get_client(&self, provider: ClientProvider) -> AppResult<HappyClient> {
        use ClientProvider::*;
        match provider {
            Google => self.google_client.clone(),
            Github => self.github_client.clone(),
        }.ok_or(AppError::Invalid(vec![Issue::new(
            "unsupported",
            "provider",
            format!("OAuth provider {provider} is not configured"),
        )]))
    }
}

fn build(provider: ClientProvider, keys: &OAuthKeys, redirect_base: &str) -> AppResult<HappyClient> {
    let redirect_url = RedirectUrl::new(format!("{redirect_base}/api/auth/{provider}/callback"))?;

    Ok(
        BasicClient::new(ClientId::new(keys.client_id.clone()))
            .set_client_secret(ClientSecret::new(keys.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(provider.auth_url().to_owned())?)
            .set_token_uri(TokenUrl::new(provider.token_url().to_owned())?)
            .set_redirect_uri(redirect_url)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configured_providers_are_available() {
        let keys = OAuthKeys {
            client_id: "id".to_owned(),
            client_secret: "secret".to_owned(),
        };
        let clients = Clients::new("http://localhost:8080", Some(&keys), None).unwrap();

        let google = clients.get_client(ClientProvider::Google).unwrap();
        assert_eq!(
            google.redirect_uri().unwrap().as_str(),
            "http://localhost:8080/api/auth/google/callback"
        );
        assert!(matches!(clients.get_client(ClientProvider::Github), Err(AppError::Invalid(_))));
    }
}
