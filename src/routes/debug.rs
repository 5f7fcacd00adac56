use axum::extract::State;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::models::Post;
use crate::db::posts;
use crate::error::{AppResult, ErrorContext};
use crate::state::AppState;

/// Inspection routes. Only mounted when `server.debug_routes` is on.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/debug/posts", get(all_posts))
        .route("/api/debug/raw-posts", get(raw_posts))
        .route("/api/debug/clear-posts", delete(clear_posts))
}

async fn all_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get().context("Error fetching all posts")?;
    let posts = posts::all_posts(&conn).context("Error fetching all posts")?;
    tracing::debug!("All posts in database: {:?}", posts);
    Ok(Json(posts))
}

async fn raw_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get().context("Error fetching raw posts")?;
    let posts = posts::all_posts_newest_first(&conn).context("Error fetching raw posts")?;
    Ok(Json(posts))
}

/// Fails while any save still references a post.
async fn clear_posts(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let conn = state.db.get().context("Failed to clear posts table")?;
    let removed = posts::clear_posts(&conn).context("Failed to clear posts table")?;
    tracing::warn!("Cleared {} posts", removed);
    Ok(Json(json!({ "message": "Posts table cleared successfully" })))
}
