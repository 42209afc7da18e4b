//! Comment endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, patch},
};
use serde::Serialize;
use videotube_common::{AppResult, PageQuery, PageRequest, Paginated};
use videotube_core::{CommentInput, CommentView};
use videotube_db::entities::comment;

use crate::{
    extractors::{AppJson, AppPath, AppQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub video: String,
    pub owner: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            content: c.content,
            video: c.video_id,
            owner: c.owner_id,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|u| u.to_rfc3339()),
        }
    }
}

/// Deleted comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedComment {
    pub comment_id: String,
}

async fn video_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<CommentView>>> {
    let page = PageRequest::from_query(query, &state.pagination);
    let comments = state
        .comment_service
        .list_by_video(&user.id, &video_id, page)
        .await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
    AppJson(input): AppJson<CommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .create(&user.id, &video_id, input)
        .await?;
    Ok(ApiResponse::created(comment.into(), "Comment added successfully"))
}

async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<String>,
    AppJson(input): AppJson<CommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .update(&user.id, &comment_id, input)
        .await?;
    Ok(ApiResponse::ok(comment.into(), "Comment updated successfully"))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<String>,
) -> AppResult<ApiResponse<DeletedComment>> {
    state.comment_service.delete(&user.id, &comment_id).await?;
    Ok(ApiResponse::ok(
        DeletedComment { comment_id },
        "Comment deleted successfully",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{videoId}", get(video_comments).post(add_comment))
        .route("/c/{commentId}", patch(update_comment).delete(delete_comment))
}
