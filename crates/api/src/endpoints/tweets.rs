//! Tweet endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, patch, post},
};
use serde::Serialize;
use videotube_common::AppResult;
use videotube_core::{TweetInput, TweetView};
use videotube_db::entities::tweet;

use crate::{
    extractors::{AppJson, AppPath, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Tweet response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub id: String,
    pub content: String,
    pub owner: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<tweet::Model> for TweetResponse {
    fn from(t: tweet::Model) -> Self {
        Self {
            id: t.id,
            content: t.content,
            owner: t.owner_id,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.map(|u| u.to_rfc3339()),
        }
    }
}

/// Deleted tweet response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTweet {
    pub tweet_id: String,
}

async fn create_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<TweetInput>,
) -> AppResult<ApiResponse<TweetResponse>> {
    let tweet = state.tweet_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(tweet.into(), "Tweet created successfully"))
}

async fn user_tweets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(user_id): AppPath<String>,
) -> AppResult<ApiResponse<Vec<TweetView>>> {
    let tweets = state.tweet_service.list_by_user(&user.id, &user_id).await?;
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

async fn update_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(tweet_id): AppPath<String>,
    AppJson(input): AppJson<TweetInput>,
) -> AppResult<ApiResponse<TweetResponse>> {
    let tweet = state.tweet_service.update(&user.id, &tweet_id, input).await?;
    Ok(ApiResponse::ok(tweet.into(), "Tweet updated successfully"))
}

async fn delete_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(tweet_id): AppPath<String>,
) -> AppResult<ApiResponse<DeletedTweet>> {
    state.tweet_service.delete(&user.id, &tweet_id).await?;
    Ok(ApiResponse::ok(
        DeletedTweet { tweet_id },
        "Tweet deleted successfully",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/{userId}", get(user_tweets))
        .route("/{tweetId}", patch(update_tweet).delete(delete_tweet))
}
