use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

/// The single-page front end, compiled into the binary.
#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

pub async fn index() -> Response {
    embedded("index.html", "no-cache")
}

pub async fn serve(Path(path): Path<String>) -> Response {
    embedded(&path, "public, max-age=86400")
}

fn embedded(path: &str, cache_control: &str) -> Response {
    match Assets::get(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache_control.to_string()),
                ],
                file.data.to_vec(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
