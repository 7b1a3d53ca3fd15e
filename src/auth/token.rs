use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::google::ProviderClaims;
use crate::models::User;

const SESSION_TTL_DAYS: i64 = 30;

/// The signed, request-scoped identity record. Carried as a bearer JWT and
/// re-merged with the database user row on every request that needs
/// identity. `picture` is the claim name; the materialized session exposes
/// it as `image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Subject identifier stamped when the token is first issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: i64,
}

/// The externally visible session object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl SessionToken {
    /// A fresh token for a completed OAuth sign-in, before enrichment.
    pub fn issue(claims: &ProviderClaims) -> Self {
        Self {
            sub: claims.id.clone(),
            id: None,
            name: claims.name.clone(),
            email: claims.email.clone(),
            picture: claims.picture.clone(),
            exp: (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        }
    }

    /// Sign-in transition when the adapter has already materialized the
    /// user row: identity comes from the row, with the provider claims
    /// filling in a missing name or image.
    pub fn merged_with_db_user(mut self, db_user: &User, claims: &ProviderClaims) -> Self {
        self.id = Some(db_user.id.clone());
        self.name = db_user.name.clone().or_else(|| claims.name.clone());
        self.email = Some(db_user.email.clone());
        self.picture = db_user.image.clone().or_else(|| claims.picture.clone());
        self
    }

    /// Sign-in transition when no user row exists yet (the adapter links
    /// accounts asynchronously): provider claims verbatim, with the id
    /// falling back to the token's existing subject.
    pub fn from_provider_claims(mut self, claims: &ProviderClaims) -> Self {
        self.id = claims.id.clone().or_else(|| self.sub.clone());
        self.name = claims.name.clone();
        self.email = claims.email.clone();
        self.picture = claims.picture.clone();
        self
    }

    /// Refresh transition: overwrite identity with the current database
    /// values so renames and avatar changes show up on the next request.
    pub fn refreshed_from_db_user(mut self, db_user: &User) -> Self {
        self.id = Some(db_user.id.clone());
        self.name = db_user.name.clone();
        self.email = Some(db_user.email.clone());
        self.picture = db_user.image.clone();
        self
    }

    /// Project the token into the session object handed to callers.
    pub fn session(&self) -> Session {
        Session {
            user: SessionUser {
                id: self
                    .id
                    .clone()
                    .or_else(|| self.sub.clone())
                    .unwrap_or_default(),
                name: self.name.clone(),
                email: self.email.clone(),
                image: self.picture.clone(),
            },
        }
    }

    pub fn encode(&self, secret: &str) -> jsonwebtoken::errors::Result<String> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn decode(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Self> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}
