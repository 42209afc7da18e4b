//! Channel dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use videotube_common::AppResult;
use videotube_core::{ChannelStats, DashboardVideo};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn channel_stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ChannelStats>> {
    let stats = state.dashboard_service.stats(&user.id).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

async fn channel_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DashboardVideo>>> {
    let videos = state.dashboard_service.videos(&user.id).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
}
