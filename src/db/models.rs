use serde::{Deserialize, Deserializer, Serialize};
use std::num::ParseIntError;

/// A full `users` row. Never serialized; use [`PublicUser`] for responses.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub contact: String,
    pub username: String,
    pub password: String,
    pub fullname: String,
}

/// A user as exposed over the API, without the password column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub contact: String,
    pub username: String,
    pub fullname: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            contact: user.contact,
            username: user.username,
            fullname: user.fullname,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub likes: i64,
    pub created_at: String,
}

/// Columns of a post row about to be inserted. Missing fields stay `None`
/// and reach SQLite as NULL.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

// --- Request bodies ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub contact: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub fullname: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub contact: Option<String>,
    pub password: Option<String>,
}

/// Body carrying the acting user for save, unsave and delete.
#[derive(Debug, Default, Deserialize)]
pub struct UserRef {
    #[serde(rename = "userId", default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    #[serde(rename = "userId", default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FriendRequestBody {
    #[serde(rename = "senderId", default, deserialize_with = "deserialize_optional_id")]
    pub sender_id: Option<i64>,
    #[serde(rename = "receiverId", default, deserialize_with = "deserialize_optional_id")]
    pub receiver_id: Option<i64>,
}

// --- Id parsing ---

/// Parses an id sent as text (multipart fields, JSON strings). Blank is `None`.
pub fn parse_id(raw: &str) -> Result<Option<i64>, ParseIntError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

/// The front end sends ids both as JSON numbers and as strings.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdRepr::Number(id)) => Ok(Some(id)),
        Some(IdRepr::Text(raw)) => parse_id(&raw).map_err(serde::de::Error::custom),
    }
}
