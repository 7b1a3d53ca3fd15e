use crate::error::AppError;
use crate::models::{NewRoom, Room};
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch all rooms, optionally filtered by a tags substring search.
    ///
    /// A missing or blank search omits the WHERE clause entirely rather
    /// than binding an always-true predicate. The search term is not
    /// escaped, so `%` and `_` in user input act as extra LIKE wildcards,
    /// and SQLite's LIKE is ASCII case-insensitive.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Room>, sqlx::Error> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                sqlx::query_as::<_, Room>("SELECT * FROM room WHERE tags LIKE ?")
                    .bind(format!("%{}%", term))
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, Room>("SELECT * FROM room")
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    /// Fetch the rooms owned by a user.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Room>, sqlx::Error> {
        sqlx::query_as::<_, Room>("SELECT * FROM room WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetch a single room by id. Absence is not an error.
    pub async fn get(&self, id: &str) -> Result<Option<Room>, sqlx::Error> {
        sqlx::query_as::<_, Room>("SELECT * FROM room WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a room by id. Deleting an id that does not exist is a no-op.
    pub async fn delete(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM room WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Create a room. The id is generated here rather than by the store so
    /// the inserted row can be re-fetched immediately and referenced at
    /// insert time.
    pub async fn create(&self, data: NewRoom, user_id: &str) -> Result<Room, AppError> {
        let id = Uuid::new_v4().to_string();
        let room = data.into_room(id, user_id.to_string());

        sqlx::query(
            "INSERT INTO room (id, user_id, name, description, tags, github_repo)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&room.id)
        .bind(&room.user_id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(&room.tags)
        .bind(&room.github_repo)
        .execute(&self.pool)
        .await?;

        self.get(&room.id)
            .await?
            .ok_or(AppError::CreateVerification)
    }

    /// Update every mutable field of a room by id, then return the fresh
    /// row. The update and re-read are two statements, not a transaction;
    /// a concurrent delete in between surfaces as the verification error.
    pub async fn update(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query(
            "UPDATE room
             SET user_id = ?, name = ?, description = ?, tags = ?, github_repo = ?
             WHERE id = ?",
        )
        .bind(&room.user_id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(&room.tags)
        .bind(&room.github_repo)
        .bind(&room.id)
        .execute(&self.pool)
        .await?;

        self.get(&room.id)
            .await?
            .ok_or(AppError::UpdateVerification)
    }
}
