use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Identity claims yielded by the provider after the code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderClaims {
    #[serde(rename = "sub")]
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleClient {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleClient {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
            client_secret,
            redirect_url,
        }
    }

    /// The consent-page URL a sign-in request redirects to.
    pub fn authorize_url(&self) -> String {
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
            ],
        )
        .map(String::from)
        .unwrap_or_else(|_| AUTHORIZE_URL.to_string())
    }

    /// Run the authorization-code exchange and fetch the user's claims.
    pub async fn exchange_code(&self, code: &str) -> Result<ProviderClaims> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("Failed to exchange authorization code")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token endpoint returned {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Invalid token endpoint response")?;

        self.fetch_userinfo(&token.access_token).await
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<ProviderClaims> {
        let response = self
            .client
            .get(USERINFO_URL)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .context("Failed to fetch userinfo")?;

        if !response.status().is_success() {
            anyhow::bail!("Userinfo endpoint returned {}", response.status());
        }

        response.json().await.context("Invalid userinfo response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_client_and_redirect() {
        let client = GoogleClient::new(
            "client-1".to_string(),
            "secret".to_string(),
            "https://app.example/auth/callback".to_string(),
        );

        let url = client.authorize_url();
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example%2Fauth%2Fcallback"));
    }

    #[test]
    fn userinfo_claims_tolerate_partial_profiles() {
        let claims: ProviderClaims =
            serde_json::from_str(r#"{"sub":"google-1","email":"a@x.com"}"#).unwrap();
        assert_eq!(claims.id.as_deref(), Some("google-1"));
        assert!(claims.name.is_none());
        assert!(claims.picture.is_none());
    }
}
