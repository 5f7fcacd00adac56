pub mod assets;
pub mod debug;
pub mod posts;
pub mod saves;
pub mod social;
pub mod users;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::uploads::PUBLIC_PREFIX;

/// Full application router: JSON API, uploaded files, and the front end.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .merge(users::router())
        .merge(posts::router(state.config.server.max_upload_bytes))
        .merge(saves::router())
        .merge(social::router());

    if state.config.server.debug_routes {
        tracing::warn!("Debug routes enabled under /api/debug");
        api = api.merge(debug::router());
    }

    Router::new()
        .route("/", get(assets::index))
        .route("/assets/{*path}", get(assets::serve))
        .merge(api)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.uploads.root()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
