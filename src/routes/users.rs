use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::credentials;
use crate::db::models::{LoginRequest, PublicUser, RegisterRequest};
use crate::db::users;
use crate::error::{AppError, AppResult, DbError, ErrorContext};
use crate::extractors::JsonBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/users/{id}", get(profile))
        .route("/api/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    tracing::info!(
        "Registration request: contact={:?} username={:?}",
        req.contact,
        req.username
    );

    let password =
        credentials::stored_password(state.config.auth.password_storage, req.password.as_deref())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let conn = state.db.get().context("Error registering user")?;
    let user_id = users::insert_user(
        &conn,
        req.contact.as_deref(),
        req.username.as_deref(),
        password.as_deref(),
        req.fullname.as_deref(),
    )
    .map_err(|e| {
        let source = DbError::from(e);
        if source.is_unique_violation() {
            tracing::warn!("Contact or username already taken: {:?}", req.contact);
        }
        AppError::Database {
            context: "Error registering user",
            source,
        }
    })?;

    tracing::info!("User registered: id={}", user_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "userId": user_id })),
    ))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<Value>> {
    let (Some(contact), Some(password)) = (req.contact.as_deref(), req.password.as_deref()) else {
        return Err(AppError::InvalidCredentials);
    };

    let conn = state.db.get().context("Error logging in")?;
    let user = credentials::authenticate(&conn, state.config.auth.password_storage, contact, password)
        .context("Error logging in")?
        .ok_or_else(|| {
            tracing::info!("Login failed for {:?}", contact);
            AppError::InvalidCredentials
        })?;

    tracing::info!("User logged in: id={}", user.id);
    Ok(Json(json!({
        "message": "Login successful",
        "user": PublicUser::from(user),
    })))
}

async fn profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PublicUser>> {
    let conn = state.db.get().context("Error fetching user data")?;
    users::find_public(&conn, id)
        .context("Error fetching user data")?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
