//! Playlist endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, patch, post},
};
use serde::Serialize;
use videotube_common::AppResult;
use videotube_core::{PlaylistDetail, PlaylistInput, PlaylistSummary, PlaylistWithVideos};
use videotube_db::entities::playlist;

use crate::{
    extractors::{AppJson, AppPath, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Playlist response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<playlist::Model> for PlaylistResponse {
    fn from(p: playlist::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            owner: p.owner_id,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|u| u.to_rfc3339()),
        }
    }
}

/// Deleted playlist response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPlaylist {
    pub playlist_id: String,
}

async fn create_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<PlaylistInput>,
) -> AppResult<ApiResponse<PlaylistResponse>> {
    let playlist = state.playlist_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(playlist.into(), "Playlist created successfully"))
}

async fn get_playlist(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    AppPath(playlist_id): AppPath<String>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let playlist = state.playlist_service.get(&playlist_id).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

async fn update_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(playlist_id): AppPath<String>,
    AppJson(input): AppJson<PlaylistInput>,
) -> AppResult<ApiResponse<PlaylistResponse>> {
    let playlist = state
        .playlist_service
        .update(&user.id, &playlist_id, input)
        .await?;
    Ok(ApiResponse::ok(playlist.into(), "Playlist updated successfully"))
}

async fn delete_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath(playlist_id): AppPath<String>,
) -> AppResult<ApiResponse<DeletedPlaylist>> {
    state.playlist_service.delete(&user.id, &playlist_id).await?;
    Ok(ApiResponse::ok(
        DeletedPlaylist { playlist_id },
        "Playlist deleted successfully",
    ))
}

async fn add_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath((video_id, playlist_id)): AppPath<(String, String)>,
) -> AppResult<ApiResponse<PlaylistWithVideos>> {
    let playlist = state
        .playlist_service
        .add_video(&user.id, &video_id, &playlist_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist successfully"))
}

async fn remove_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppPath((video_id, playlist_id)): AppPath<(String, String)>,
) -> AppResult<ApiResponse<PlaylistWithVideos>> {
    let playlist = state
        .playlist_service
        .remove_video(&user.id, &video_id, &playlist_id)
        .await?;
    Ok(ApiResponse::ok(
        playlist,
        "Video removed from playlist successfully",
    ))
}

async fn user_playlists(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    AppPath(user_id): AppPath<String>,
) -> AppResult<ApiResponse<Vec<PlaylistSummary>>> {
    let playlists = state.playlist_service.list_by_user(&user_id).await?;
    Ok(ApiResponse::ok(playlists, "User playlists fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route(
            "/{playlistId}",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route("/add/{videoId}/{playlistId}", patch(add_video))
        .route("/remove/{videoId}/{playlistId}", patch(remove_video))
        .route("/user/{userId}", get(user_playlists))
}
