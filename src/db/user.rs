use crate::models::User;
use sqlx::SqlitePool;

/// Read access to the adapter-owned user table. The adapter creates and
/// mutates these rows; the core only looks them up by email during token
/// enrichment.
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM user WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }
}
