use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::{Post, UserRef};
use crate::db::saves;
use crate::error::{AppResult, ErrorContext};
use crate::extractors::JsonBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts/{id}/save", post(save_post))
        .route("/api/posts/saved/{user_id}", get(saved_posts))
}

async fn save_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<UserRef>,
) -> AppResult<Json<Value>> {
    let conn = state.db.get().context("Error saving post")?;
    saves::save_post(&conn, body.user_id, id).context("Error saving post")?;
    Ok(Json(json!({ "message": "Post saved successfully" })))
}

async fn saved_posts(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get().context("Error fetching saved posts")?;
    let posts = saves::saved_posts(&conn, user_id).context("Error fetching saved posts")?;
    Ok(Json(posts))
}
