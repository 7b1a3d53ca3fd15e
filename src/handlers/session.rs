use crate::auth::token::{Session, SessionToken};
use crate::auth::{self, get_session};
use crate::db::user::UserRepository;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Kick off the OAuth flow by redirecting to the provider's consent page.
pub async fn sign_in(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&state.google.authorize_url())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
}

/// Authorization-code callback: exchange the code for provider claims, run
/// the sign-in transition against the user table, and hand back the signed
/// session token.
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let claims = match state.google.exchange_code(&params.code).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::error!("OAuth code exchange failed: {}", err);
            return (StatusCode::BAD_GATEWAY, "OAuth code exchange failed").into_response();
        }
    };

    let users = UserRepository::new(state.db_pool.clone());
    let token = SessionToken::issue(&claims);
    let token = auth::jwt_callback(&users, token, Some(&claims), state.config.auth_debug).await;

    match token.encode(&state.config.auth_secret) {
        Ok(jwt) => Json(json!({ "token": jwt })).into_response(),
        Err(err) => {
            tracing::error!("Failed to sign session token: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The zero-argument session accessor: the current session object, or null
/// when the request carries no usable token.
pub async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Option<Session>> {
    Json(get_session(&state, &headers).await)
}
