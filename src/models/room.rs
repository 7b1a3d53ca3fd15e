use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: String,
    #[serde(rename = "githubRepo")]
    pub github_repo: Option<String>,
}

/// Client-supplied room fields. The id and owner are never taken from the
/// client: the id is generated at insert time and the owner comes from the
/// current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub description: Option<String>,
    pub tags: String,
    #[serde(rename = "githubRepo")]
    pub github_repo: Option<String>,
}

impl NewRoom {
    pub fn into_room(self, id: String, user_id: String) -> Room {
        Room {
            id,
            user_id,
            name: self.name,
            description: self.description,
            tags: self.tags,
            github_repo: self.github_repo,
        }
    }
}
