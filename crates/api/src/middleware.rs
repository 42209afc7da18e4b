//! API middleware.

#![allow(missing_docs)]

use std::any::Any;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use videotube_common::{AppError, config::PaginationConfig};
use videotube_core::{
    CommentService, DashboardService, LikeService, PlaylistService, SubscriptionService,
    TweetService, UserService, VideoService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub tweet_service: TweetService,
    pub playlist_service: PlaylistService,
    pub like_service: LikeService,
    pub comment_service: CommentService,
    pub video_service: VideoService,
    pub subscription_service: SubscriptionService,
    pub dashboard_service: DashboardService,
    pub pagination: PaginationConfig,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` and stores the user in the
/// request extensions. Requests without a valid token pass through
/// anonymous; [`crate::extractors::AuthUser`] rejects them where required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(AppError::Unauthorized) => {
                tracing::debug!("Rejected bearer token");
            }
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}

/// Turn a handler panic into a `500` error envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal(format!("Handler panicked: {detail}")).into_response()
}
