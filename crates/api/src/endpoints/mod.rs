//! API endpoints.

use axum::Router;
use videotube_common::AppError;

use crate::middleware::AppState;

pub mod comments;
pub mod dashboard;
pub mod healthcheck;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/healthcheck", healthcheck::router())
        .nest("/tweets", tweets::router())
        .nest("/playlists", playlists::router())
        .nest("/likes", likes::router())
        .nest("/comments", comments::router())
        .nest("/videos", videos::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/dashboard", dashboard::router())
        .fallback(route_not_found)
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
