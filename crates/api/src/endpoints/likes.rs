//! Like endpoints.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use videotube_common::AppResult;
use videotube_core::LikedVideo;
use videotube_db::repositories::LikeTarget;

use crate::{
    extractors::{AppPath, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Like state after a toggle.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub is_liked: bool,
}

async fn toggle(
    state: &AppState,
    user_id: &str,
    target: LikeTarget,
    target_id: &str,
) -> AppResult<ApiResponse<LikeState>> {
    let is_liked = state.like_service.toggle(user_id, target, target_id).await?;

    let what = match target {
        LikeTarget::Video => "Video",
        LikeTarget::Comment => "Comment",
        LikeTarget::Tweet => "Tweet",
    };

    Ok(if is_liked {
        ApiResponse::new(
            StatusCode::CREATED,
            LikeState { is_liked },
            format!("{what} liked successfully"),
        )
    } else {
        ApiResponse::ok(LikeState { is_liked }, format!("{what} unliked successfully"))
    })
}

async fn toggle_video_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
) -> AppResult<ApiResponse<LikeState>> {
    toggle(&state, &user.id, LikeTarget::Video, &video_id).await
}

async fn toggle_comment_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<String>,
) -> AppResult<ApiResponse<LikeState>> {
    toggle(&state, &user.id, LikeTarget::Comment, &comment_id).await
}

async fn toggle_tweet_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(tweet_id): AppPath<String>,
) -> AppResult<ApiResponse<LikeState>> {
    toggle(&state, &user.id, LikeTarget::Tweet, &tweet_id).await
}

async fn liked_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<LikedVideo>>> {
    let videos = state.like_service.liked_videos(&user.id).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle/v/{videoId}", post(toggle_video_like))
        .route("/toggle/c/{commentId}", post(toggle_comment_like))
        .route("/toggle/t/{tweetId}", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
}
