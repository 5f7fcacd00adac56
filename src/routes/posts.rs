use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::{NewPost, Post, UserRef};
use crate::db::{posts, saves};
use crate::error::{AppError, AppResult, ErrorContext};
use crate::extractors::{JsonBody, PostUpload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub action: Option<String>,
}

/// `max_upload_bytes` caps the multipart body of `POST /api/posts`.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/api/posts",
            get(list_posts)
                .post(create_post)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/posts/search", get(search_posts))
        .route("/api/posts/{id}", get(get_post).delete(delete_or_unsave))
        .route("/api/posts/{id}/like", post(like_post))
        .route("/api/posts/user/{user_id}", get(posts_by_user))
        .route("/api/posts/created/{user_id}", get(posts_by_user))
}

async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get().context("Error fetching posts")?;
    let posts = posts::latest_posts(&conn, posts::FEED_LIMIT).context("Error fetching posts")?;
    tracing::debug!("Returning {} posts", posts.len());
    Ok(Json(posts))
}

/// The image hits the disk before the row is inserted; a failed insert
/// leaves the file behind.
async fn create_post(
    State(state): State<AppState>,
    upload: PostUpload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let image_url = match &upload.image {
        Some(image) => Some(
            state
                .uploads
                .save(&image.file_name, &image.data)
                .await
                .map_err(|source| AppError::Storage {
                    context: "Error creating post",
                    source,
                })?,
        ),
        None => None,
    };

    let new_post = NewPost {
        user_id: upload.user_id,
        title: upload.title,
        description: upload.description,
        image_url,
    };
    tracing::info!(
        "Creating post: user_id={:?} title={:?} image={:?}",
        new_post.user_id,
        new_post.title,
        new_post.image_url
    );

    let conn = state.db.get().context("Error creating post")?;
    let post_id = posts::insert_post(&conn, &new_post).context("Error creating post")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "postId": post_id })),
    ))
}

async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Post>> {
    let conn = state.db.get().context("Error fetching post")?;
    posts::find_post(&conn, id)
        .context("Error fetching post")?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Post>>> {
    let term = query.term.unwrap_or_default();
    let conn = state.db.get().context("Error searching posts")?;
    let posts = posts::search_posts(&conn, &term).context("Error searching posts")?;
    Ok(Json(posts))
}

/// No per-user dedup: every call adds one like, even for unknown ids.
async fn like_post(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Value>> {
    let conn = state.db.get().context("Error liking post")?;
    posts::increment_likes(&conn, id).context("Error liking post")?;
    Ok(Json(json!({ "message": "Post liked successfully" })))
}

async fn posts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get().context("Error fetching user posts")?;
    let posts = posts::posts_by_user(&conn, user_id).context("Error fetching user posts")?;
    Ok(Json(posts))
}

/// `?action=unsave` drops the caller's save; anything else deletes the post,
/// which only its owner may do.
async fn delete_or_unsave(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
    JsonBody(body): JsonBody<UserRef>,
) -> AppResult<Json<Value>> {
    let action = query.action.as_deref().unwrap_or("delete");
    tracing::info!("Attempting to {} post {} for user {:?}", action, id, body.user_id);

    if action == "unsave" {
        let conn = state.db.get().context("Error unsaving post")?;
        let removed = match body.user_id {
            Some(user_id) => saves::unsave_post(&conn, user_id, id).context("Error unsaving post")?,
            None => 0,
        };
        if removed == 0 {
            return Err(AppError::NotFound("Post not found in saved posts".into()));
        }
        return Ok(Json(json!({ "message": "Post unsaved successfully" })));
    }

    let mut conn = state.db.get().context("Error checking post creator")?;
    let owner = posts::owner_of(&conn, id)
        .context("Error checking post creator")?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    if owner != body.user_id {
        return Err(AppError::Forbidden("Unauthorized to delete this post".into()));
    }

    let unsaved = posts::delete_post_with_saves(&mut conn, id).context("Error deleting post")?;
    tracing::info!("Post {} deleted, {} saves removed", id, unsaved);
    Ok(Json(json!({ "message": "Post deleted and unsaved successfully" })))
}
