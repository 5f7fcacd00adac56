use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use serde::de::DeserializeOwned;

use crate::db::models::parse_id;
use crate::error::AppError;
use crate::state::AppState;

/// JSON request body that falls back to `T::default()` when the request has
/// no body or is not `application/json`. Malformed JSON is a 400.
#[derive(Debug, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json") || ct.contains("+json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
    }
}

/// Image part of a post upload, held in memory until it is written to disk.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Multipart body of `POST /api/posts`: `title`, `description`, `userId`
/// and an `image` file. Every part is optional; unknown parts are skipped.
#[derive(Debug, Default)]
pub struct PostUpload {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageUpload>,
}

impl FromRequest<AppState> for PostUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;

        let mut upload = PostUpload::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
                    // An empty file input still sends a part with no name and no bytes
                    if !(file_name.is_empty() && data.is_empty()) {
                        upload.image = Some(ImageUpload {
                            file_name,
                            data: data.to_vec(),
                        });
                    }
                }
                "title" | "description" | "userId" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
                    match name.as_str() {
                        "title" => upload.title = Some(text),
                        "description" => upload.description = Some(text),
                        _ => {
                            upload.user_id = parse_id(&text)
                                .map_err(|_| AppError::BadRequest("Invalid userId".into()))?;
                        }
                    }
                }
                other => tracing::debug!("Ignoring multipart field {:?}", other),
            }
        }

        Ok(upload)
    }
}
