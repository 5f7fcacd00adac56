use axum::extract::{Path, State};
use axum::routing::{post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::{CommentRequest, FriendRequestBody};
use crate::db::social;
use crate::error::{AppResult, ErrorContext};
use crate::extractors::JsonBody;
use crate::state::AppState;

// The backing tables are not part of the schema, so every handler here
// currently answers 500 with the driver's "no such table" message.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts/{id}/comment", post(add_comment))
        .route("/api/friend-requests", post(send_friend_request))
        .route("/api/friend-requests/{id}", put(accept_friend_request))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get().context("Error adding comment")?;
    social::insert_comment(&conn, id, body.user_id, body.comment.as_deref())
        .context("Error adding comment")?;
    Ok(Json(json!({ "message": "Comment added successfully" })))
}

async fn send_friend_request(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<FriendRequestBody>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get().context("Error sending friend request")?;
    social::insert_friend_request(&conn, body.sender_id, body.receiver_id)
        .context("Error sending friend request")?;
    Ok(Json(json!({ "message": "Friend request sent successfully" })))
}

async fn accept_friend_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get().context("Error accepting friend request")?;
    social::accept_friend_request(&conn, id).context("Error accepting friend request")?;
    Ok(Json(json!({ "message": "Friend request accepted successfully" })))
}
