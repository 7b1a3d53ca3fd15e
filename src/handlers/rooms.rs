use crate::auth;
use crate::db::room::RoomRepository;
use crate::error::AppError;
use crate::models::{NewRoom, Room};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// Public listing, optionally filtered by a tags substring search.
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Room>>, AppError> {
    let repo = RoomRepository::new(state.db_pool.clone());
    let rooms = repo.list(params.search.as_deref()).await?;
    Ok(Json(rooms))
}

/// Rooms owned by the current session's user.
pub async fn my_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Room>>, AppError> {
    let session = auth::get_session(&state, &headers)
        .await
        .ok_or(AppError::Unauthenticated)?;

    let repo = RoomRepository::new(state.db_pool.clone());
    let rooms = repo.list_for_user(&session.user.id).await?;
    Ok(Json(rooms))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let repo = RoomRepository::new(state.db_pool.clone());
    match repo.get(&id).await? {
        Some(room) => Ok(Json(room).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// Create a room owned by the current session's user. The owner always
/// comes from the session, never from the request body.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(data): Json<NewRoom>,
) -> Result<Response, AppError> {
    let session = auth::get_session(&state, &headers)
        .await
        .ok_or(AppError::Unauthenticated)?;

    let repo = RoomRepository::new(state.db_pool.clone());
    let room = repo.create(data, &session.user.id).await?;
    Ok((StatusCode::CREATED, Json(room)).into_response())
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(data): Json<NewRoom>,
) -> Result<Response, AppError> {
    let session = auth::get_session(&state, &headers)
        .await
        .ok_or(AppError::Unauthenticated)?;

    let repo = RoomRepository::new(state.db_pool.clone());
    let Some(existing) = repo.get(&id).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    if existing.user_id != session.user.id {
        return Err(AppError::Forbidden);
    }

    let room = repo
        .update(&data.into_room(existing.id, existing.user_id))
        .await?;
    Ok(Json(room).into_response())
}

pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let session = auth::get_session(&state, &headers)
        .await
        .ok_or(AppError::Unauthenticated)?;

    let repo = RoomRepository::new(state.db_pool.clone());
    // Deleting an id that never existed stays a no-op, but an existing
    // room is only deletable by its owner
    if let Some(existing) = repo.get(&id).await? {
        if existing.user_id != session.user.id {
            return Err(AppError::Forbidden);
        }
    }
    repo.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
