use anyhow::{Context, Result};

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_secret: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub oauth_redirect_url: String,
    pub host: String,
    pub port: u16,
    /// When set, identity-lookup failures are logged instead of silently
    /// swallowed. They are never propagated either way.
    pub auth_debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;
        let auth_secret = std::env::var("AUTH_SECRET")
            .context("AUTH_SECRET must be set")?;
        let google_client_id = std::env::var("GOOGLE_CLIENT_ID")
            .context("GOOGLE_CLIENT_ID must be set")?;
        let google_client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
            .context("GOOGLE_CLIENT_SECRET must be set")?;
        let oauth_redirect_url = std::env::var("OAUTH_REDIRECT_URL")
            .context("OAUTH_REDIRECT_URL must be set")?;
        let host = std::env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("Invalid PORT")?;
        let auth_debug = std::env::var("AUTH_DEBUG").is_ok();

        Ok(Self {
            database_url,
            auth_secret,
            google_client_id,
            google_client_secret,
            oauth_redirect_url,
            host,
            port,
            auth_debug,
        })
    }
}
