use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row as materialized by the OAuth adapter on first sign-in. The
/// core never writes this table; it only reads it by email during token
/// enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "emailVerified")]
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
}
