//! Video endpoints.

use axum::{
    Router,
    extract::{Multipart, State, multipart::Field},
    routing::{get, patch},
};
use serde::Serialize;
use videotube_common::{AppResult, PageQuery, PageRequest, Paginated};
use videotube_core::{
    MediaUpload, PublishVideoInput, UpdateVideoInput, VideoDetail, VideoListParams,
    views::VideoSummary,
};
use videotube_db::entities::video;

use crate::{
    extractors::{AppPath, AppQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Video response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: String,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<video::Model> for VideoResponse {
    fn from(v: video::Model) -> Self {
        Self {
            id: v.id,
            video_file: v.video_file,
            thumbnail: v.thumbnail,
            title: v.title,
            description: v.description,
            duration: v.duration,
            views: v.views,
            is_published: v.is_published,
            owner: v.owner_id,
            created_at: v.created_at.to_rfc3339(),
            updated_at: v.updated_at.map(|u| u.to_rfc3339()),
        }
    }
}

/// Deleted video response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVideo {
    pub video_id: String,
}

/// Publish state after a toggle.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishState {
    pub is_published: bool,
}

/// Fields of a video upload or edit form.
#[derive(Default)]
struct VideoForm {
    title: String,
    description: Option<String>,
    video_file: Option<MediaUpload>,
    thumbnail: Option<MediaUpload>,
}

async fn read_upload(field: Field<'_>) -> AppResult<MediaUpload> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field.bytes().await?.to_vec();

    Ok(MediaUpload {
        file_name,
        content_type,
        data,
    })
}

async fn read_form(mut multipart: Multipart) -> AppResult<VideoForm> {
    let mut form = VideoForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => form.title = field.text().await?,
            "description" => form.description = Some(field.text().await?),
            "videoFile" => form.video_file = Some(read_upload(field).await?),
            "thumbnail" => form.thumbnail = Some(read_upload(field).await?),
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

async fn list_videos(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
    AppQuery(params): AppQuery<VideoListParams>,
) -> AppResult<ApiResponse<Paginated<VideoSummary>>> {
    let page = PageRequest::from_query(page, &state.pagination);
    let videos = state.video_service.list(params, page).await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

async fn publish_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<VideoResponse>> {
    let form = read_form(multipart).await?;

    let video = state
        .video_service
        .publish(
            &user.id,
            PublishVideoInput {
                title: form.title,
                description: form.description,
                video_file: form.video_file,
                thumbnail: form.thumbnail,
            },
        )
        .await?;

    Ok(ApiResponse::created(video.into(), "Video uploaded successfully"))
}

async fn get_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
) -> AppResult<ApiResponse<VideoDetail>> {
    let video = state.video_service.get(&user.id, &video_id).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

async fn update_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<VideoResponse>> {
    let form = read_form(multipart).await?;

    let video = state
        .video_service
        .update(
            &user.id,
            &video_id,
            UpdateVideoInput {
                title: form.title,
                description: form.description,
                thumbnail: form.thumbnail,
            },
        )
        .await?;

    Ok(ApiResponse::ok(video.into(), "Video updated successfully"))
}

async fn delete_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
) -> AppResult<ApiResponse<DeletedVideo>> {
    state.video_service.delete(&user.id, &video_id).await?;
    Ok(ApiResponse::ok(
        DeletedVideo { video_id },
        "Video deleted successfully",
    ))
}

async fn toggle_publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(video_id): AppPath<String>,
) -> AppResult<ApiResponse<PublishState>> {
    let is_published = state
        .video_service
        .toggle_publish(&user.id, &video_id)
        .await?;
    Ok(ApiResponse::ok(
        PublishState { is_published },
        "Video publish status toggled successfully",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route(
            "/{videoId}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/toggle/publish/{videoId}", patch(toggle_publish))
}
