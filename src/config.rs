use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::{Context, anyhow};

/// OAuth client credentials for one identity provider.
#[derive(Debug, Clone)]
pub struct OAuthKeys {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_temperature: f32,

    pub session_inactivity_days: i64,
    pub cookie_secure: bool,

    pub oauth_redirect_base: String,
    pub google: Option<OAuthKeys>,
    pub github: Option<OAuthKeys>,

    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Reads the process environment, falling back to a `.env` file.
    pub fn from_env() -> anyhow::Result<Config> {
        Ok(Config {
            bind_addr: parsed("BIND_ADDR", "0.0.0.0:8080")?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", "16")?,

            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: optional("OPENAI_BASE_URL")
                .unwrap_or("https://api.openai.com/v1".to_owned())
                .trim_end_matches('/')
                .to_owned(),
            openai_model: optional("OPENAI_MODEL").unwrap_or("gpt-4o-mini".to_owned()),
            openai_temperature: parsed("OPENAI_TEMPERATURE", "0.7")?,

            session_inactivity_days: parsed("SESSION_INACTIVITY_DAYS", "60")?,
            cookie_secure: parsed("COOKIE_SECURE", "false")?,

            oauth_redirect_base: optional("OAUTH_REDIRECT_BASE")
                .unwrap_or("http://localhost:8080".to_owned())
                .trim_end_matches('/')
                .to_owned(),
            google: oauth_keys("GOOGLE"),
            github: oauth_keys("GITHUB"),

            static_dir: optional("STATIC_DIR").map(PathBuf::from),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    dotenv::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &str) -> anyhow::Result<String> {
    optional(key).ok_or(anyhow!("{key} must be set"))
}

fn parsed<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = optional(key).unwrap_or(default.to_owned());
    raw.parse().with_context(|| format!("{key} has invalid value {raw:?}"))
}

fn oauth_keys(prefix: &str) -> Option<OAuthKeys> {
    Some(OAuthKeys {
        client_id: optional(&format!("{prefix}_CLIENT_ID"))?,
        client_secret: optional(&format!("{prefix}_CLIENT_SECRET"))?,
    })
}
