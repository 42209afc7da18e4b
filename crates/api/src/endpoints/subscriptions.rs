//! Subscription endpoints.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use videotube_common::AppResult;
use videotube_core::{SubscribedChannel, views::ChannelSummary};

use crate::{
    extractors::{AppPath, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Subscription state after a toggle.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionState {
    pub is_subscribed: bool,
}

async fn toggle_subscription(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(channel_id): AppPath<String>,
) -> AppResult<ApiResponse<SubscriptionState>> {
    let is_subscribed = state
        .subscription_service
        .toggle(&user.id, &channel_id)
        .await?;

    Ok(if is_subscribed {
        ApiResponse::new(
            StatusCode::CREATED,
            SubscriptionState { is_subscribed },
            "Subscribed successfully",
        )
    } else {
        ApiResponse::ok(
            SubscriptionState { is_subscribed },
            "Unsubscribed successfully",
        )
    })
}

async fn channel_subscribers(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(channel_id): AppPath<String>,
) -> AppResult<ApiResponse<Vec<ChannelSummary>>> {
    let subscribers = state
        .subscription_service
        .subscribers(&user.id, &channel_id)
        .await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

async fn subscribed_channels(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(subscriber_id): AppPath<String>,
) -> AppResult<ApiResponse<Vec<SubscribedChannel>>> {
    let channels = state
        .subscription_service
        .subscribed_channels(&user.id, &subscriber_id)
        .await?;
    Ok(ApiResponse::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/c/{channelId}",
            post(toggle_subscription).get(channel_subscribers),
        )
        .route("/u/{subscriberId}", get(subscribed_channels))
}
