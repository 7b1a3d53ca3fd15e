pub mod google;
pub mod token;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::db::user::UserRepository;
use crate::AppState;
use google::ProviderClaims;
use token::{Session, SessionToken};

/// Token enrichment, run at sign-in (fresh provider claims in hand) and on
/// every later request bearing only a token.
///
/// Enrichment is best-effort: a store failure during the lookup leaves the
/// token exactly as it was, optionally logged, and the next request's
/// refresh self-heals once the store is consistent again. This is the one
/// place errors are absorbed; CRUD errors always propagate.
pub async fn jwt_callback(
    users: &UserRepository,
    token: SessionToken,
    signed_in: Option<&ProviderClaims>,
    debug: bool,
) -> SessionToken {
    match signed_in {
        // Sign-in: the provider just vouched for this identity
        Some(claims) => {
            let email = claims.email.clone().or_else(|| token.email.clone());
            if let Some(email) = email {
                match users.find_by_email(&email).await {
                    Ok(Some(db_user)) => return token.merged_with_db_user(&db_user, claims),
                    Ok(None) => {}
                    Err(err) => {
                        if debug {
                            tracing::error!("identity lookup failed during sign-in: {}", err);
                        }
                        return token;
                    }
                }
            }

            // The adapter links accounts asynchronously and may not have
            // created the user row yet
            token.from_provider_claims(claims)
        }

        // Refresh: re-read the user row so the token tracks the database
        None => {
            let Some(email) = token.email.clone() else {
                return token;
            };
            match users.find_by_email(&email).await {
                Ok(Some(db_user)) => token.refreshed_from_db_user(&db_user),
                Ok(None) => token,
                Err(err) => {
                    if debug {
                        tracing::error!("identity lookup failed during refresh: {}", err);
                    }
                    token
                }
            }
        }
    }
}

/// Resolve the current session from the request's bearer token, or `None`
/// when the request carries no usable token.
pub async fn get_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let raw = header.strip_prefix("Bearer ")?;
    let token = SessionToken::decode(raw, &state.config.auth_secret).ok()?;

    let users = UserRepository::new(state.db_pool.clone());
    let token = jwt_callback(&users, token, None, state.config.auth_debug).await;
    Some(token.session())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::google::GoogleClient;
    use crate::config::Config;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use std::sync::Arc;

    fn test_state(pool: SqlitePool) -> Arc<AppState> {
        Arc::new(AppState {
            db_pool: pool,
            google: GoogleClient::new(
                "client-1".to_string(),
                "secret".to_string(),
                "http://localhost:3000/auth/callback".to_string(),
            ),
            config: Config {
                database_url: "sqlite::memory:".to_string(),
                auth_secret: "test-secret".to_string(),
                google_client_id: "client-1".to_string(),
                google_client_secret: "secret".to_string(),
                oauth_redirect_url: "http://localhost:3000/auth/callback".to_string(),
                host: "127.0.0.1".to_string(),
                port: 0,
                auth_debug: false,
            },
        })
    }

    async fn pool_with_user(name: &str) -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        sqlx::query("INSERT INTO user (id, name, email, image) VALUES (?, ?, ?, ?)")
            .bind("db-user-1")
            .bind(name)
            .bind("a@x.com")
            .bind(Option::<String>::None)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn claims() -> ProviderClaims {
        ProviderClaims {
            id: Some("google-123".to_string()),
            email: Some("a@x.com".to_string()),
            name: Some("Provider Name".to_string()),
            picture: None,
        }
    }

    #[tokio::test]
    async fn sign_in_merges_database_row() {
        let users = UserRepository::new(pool_with_user("DB Name").await);
        let claims = claims();
        let token = SessionToken::issue(&claims);

        let token = jwt_callback(&users, token, Some(&claims), false).await;
        assert_eq!(token.id.as_deref(), Some("db-user-1"));
        assert_eq!(token.name.as_deref(), Some("DB Name"));
    }

    #[tokio::test]
    async fn refresh_picks_up_renames() {
        let pool = pool_with_user("Old Name").await;
        let users = UserRepository::new(pool.clone());
        let claims = claims();
        let token = jwt_callback(&users, SessionToken::issue(&claims), Some(&claims), false).await;

        sqlx::query("UPDATE user SET name = ? WHERE email = ?")
            .bind("New Name")
            .bind("a@x.com")
            .execute(&pool)
            .await
            .unwrap();

        let token = jwt_callback(&users, token, None, false).await;
        assert_eq!(token.name.as_deref(), Some("New Name"));
    }

    #[tokio::test]
    async fn refresh_without_matching_row_passes_through() {
        let users = UserRepository::new(pool_with_user("DB Name").await);
        let mut token = SessionToken::issue(&claims());
        token.email = Some("nobody@x.com".to_string());

        let refreshed = jwt_callback(&users, token.clone(), None, false).await;
        assert_eq!(refreshed, token);
    }

    #[tokio::test]
    async fn refresh_on_store_error_passes_token_through() {
        // No migrations, so the user table does not exist and every lookup
        // errors out
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let users = UserRepository::new(pool);
        let token = SessionToken::issue(&claims());

        let refreshed = jwt_callback(&users, token.clone(), None, false).await;
        assert_eq!(refreshed, token);
    }

    #[tokio::test]
    async fn get_session_without_header_is_none() {
        let state = test_state(pool_with_user("DB Name").await);
        assert!(get_session(&state, &HeaderMap::new()).await.is_none());
    }

    #[tokio::test]
    async fn get_session_with_garbage_token_is_none() {
        let state = test_state(pool_with_user("DB Name").await);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer not-a-jwt".parse().unwrap());
        assert!(get_session(&state, &headers).await.is_none());

        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(get_session(&state, &headers).await.is_none());
    }

    #[tokio::test]
    async fn get_session_with_valid_token_refreshes_from_db() {
        let state = test_state(pool_with_user("DB Name").await);
        let jwt = SessionToken::issue(&claims()).encode("test-secret").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", jwt).parse().unwrap());

        let session = get_session(&state, &headers).await.unwrap();
        assert_eq!(session.user.id, "db-user-1");
        assert_eq!(session.user.name.as_deref(), Some("DB Name"));
    }

    #[tokio::test]
    async fn sign_in_on_store_error_passes_token_through() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let users = UserRepository::new(pool);
        let claims = claims();
        let token = SessionToken::issue(&claims);

        let enriched = jwt_callback(&users, token.clone(), Some(&claims), false).await;
        assert_eq!(enriched, token);
    }
}
