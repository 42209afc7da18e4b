//! Playlist service.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use videotube_common::{AppError, AppResult, IdGenerator, ensure_valid_id};
use videotube_db::{
    entities::{playlist, playlist_video, video},
    repositories::{PlaylistRepository, UserRepository, VideoRepository},
};

use crate::{
    validation::require_text,
    views::{OwnerSummary, VideoSummary, load_owners},
};

/// Body of playlist create and update requests.
#[derive(Debug, Deserialize, Validate)]
pub struct PlaylistInput {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// A playlist with the IDs of its videos, in position order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithVideos {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub videos: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl PlaylistWithVideos {
    fn new(p: playlist::Model, entries: &[playlist_video::Model]) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            owner: p.owner_id,
            videos: entries.iter().map(|e| e.video_id.clone()).collect(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// A playlist with its owner and published videos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<OwnerSummary>,
    pub total_videos: u64,
    pub total_views: i64,
    pub videos: Vec<VideoSummary>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// A playlist in a user's list of playlists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub total_videos: u64,
    pub total_views: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Published videos of a playlist's entries, keeping entry order.
fn published_in_order<'a>(
    entries: impl IntoIterator<Item = &'a playlist_video::Model>,
    videos: &HashMap<String, video::Model>,
) -> Vec<&'a str> {
    entries
        .into_iter()
        .map(|e| e.video_id.as_str())
        .filter(|id| videos.get(*id).is_some_and(|v| v.is_published))
        .collect()
}

/// Service for managing playlists.
#[derive(Clone)]
pub struct PlaylistService {
    playlist_repo: PlaylistRepository,
    video_repo: VideoRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl PlaylistService {
    /// Create a new playlist service.
    #[must_use]
    pub const fn new(
        playlist_repo: PlaylistRepository,
        video_repo: VideoRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            playlist_repo,
            video_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a playlist.
    pub async fn create(&self, user_id: &str, input: PlaylistInput) -> AppResult<playlist::Model> {
        require_text(&input.name, "name")?;
        input.validate()?;

        let model = playlist::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(user_id.to_string()),
            name: Set(input.name),
            description: Set(input.description.unwrap_or_default()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let playlist = self.playlist_repo.create(model).await?;
        tracing::info!(playlist_id = %playlist.id, user_id = %user_id, "Playlist created");
        Ok(playlist)
    }

    async fn get_playlist(&self, playlist_id: &str) -> AppResult<playlist::Model> {
        self.playlist_repo
            .find_by_id(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))
    }

    fn ensure_owner(playlist: &playlist::Model, user_id: &str, action: &str) -> AppResult<()> {
        if playlist.owner_id != user_id {
            return Err(AppError::Forbidden(format!(
                "You are not allowed to {action} this playlist"
            )));
        }
        Ok(())
    }

    /// A playlist with its owner and published videos in position order.
    pub async fn get(&self, playlist_id: &str) -> AppResult<PlaylistDetail> {
        ensure_valid_id(playlist_id, "playlistId")?;
        let playlist = self.get_playlist(playlist_id).await?;

        let entries = self.playlist_repo.find_entries(playlist_id).await?;
        let video_ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
        let mut videos: HashMap<String, video::Model> = self
            .video_repo
            .find_by_ids(&video_ids)
            .await?
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();

        let ordered: Vec<String> = published_in_order(&entries, &videos)
            .into_iter()
            .map(str::to_string)
            .collect();

        let owners = load_owners(
            &self.user_repo,
            ordered
                .iter()
                .filter_map(|id| videos.get(id).map(|v| v.owner_id.as_str()))
                .chain([playlist.owner_id.as_str()]),
        )
        .await?;

        let videos: Vec<VideoSummary> = ordered
            .iter()
            .filter_map(|id| videos.remove(id))
            .map(|v| {
                let owner = owners.get(&v.owner_id).cloned();
                VideoSummary::new(v, owner)
            })
            .collect();

        tracing::debug!(playlist_id = %playlist_id, videos = videos.len(), "Fetched playlist");

        Ok(PlaylistDetail {
            owner: owners.get(&playlist.owner_id).cloned(),
            total_videos: videos.len() as u64,
            total_views: videos.iter().map(|v| v.views).sum(),
            videos,
            created_at: playlist.created_at.to_rfc3339(),
            updated_at: playlist.updated_at.map(|t| t.to_rfc3339()),
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
        })
    }

    /// Rename a playlist or change its description.
    pub async fn update(
        &self,
        user_id: &str,
        playlist_id: &str,
        input: PlaylistInput,
    ) -> AppResult<playlist::Model> {
        ensure_valid_id(playlist_id, "playlistId")?;
        require_text(&input.name, "name")?;
        input.validate()?;

        let playlist = self.get_playlist(playlist_id).await?;
        Self::ensure_owner(&playlist, user_id, "update")?;

        let mut active: playlist::ActiveModel = playlist.into();
        active.name = Set(input.name);
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.playlist_repo.update(active).await?;
        tracing::info!(playlist_id = %playlist_id, "Playlist updated");
        Ok(updated)
    }

    /// Delete a playlist.
    pub async fn delete(&self, user_id: &str, playlist_id: &str) -> AppResult<()> {
        ensure_valid_id(playlist_id, "playlistId")?;

        let playlist = self.get_playlist(playlist_id).await?;
        Self::ensure_owner(&playlist, user_id, "delete")?;

        self.playlist_repo.delete(playlist_id).await?;
        tracing::info!(playlist_id = %playlist_id, "Playlist deleted");
        Ok(())
    }

    /// Look up both sides of an add/remove and check ownership.
    async fn get_for_edit(
        &self,
        user_id: &str,
        video_id: &str,
        playlist_id: &str,
    ) -> AppResult<playlist::Model> {
        ensure_valid_id(video_id, "videoId")?;
        ensure_valid_id(playlist_id, "playlistId")?;

        let playlist = self.get_playlist(playlist_id).await?;
        self.video_repo
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        Self::ensure_owner(&playlist, user_id, "edit")?;
        Ok(playlist)
    }

    /// Append a video to the end of a playlist.
    pub async fn add_video(
        &self,
        user_id: &str,
        video_id: &str,
        playlist_id: &str,
    ) -> AppResult<PlaylistWithVideos> {
        let playlist = self.get_for_edit(user_id, video_id, playlist_id).await?;

        let mut entries = self.playlist_repo.find_entries(playlist_id).await?;
        if entries.iter().any(|e| e.video_id == video_id) {
            return Err(AppError::BadRequest("Video already in playlist".to_string()));
        }

        let position = entries.last().map_or(0, |e| e.position + 1);
        let entry = self
            .playlist_repo
            .add_video(playlist_video::ActiveModel {
                id: Set(self.id_gen.generate()),
                playlist_id: Set(playlist_id.to_string()),
                video_id: Set(video_id.to_string()),
                position: Set(position),
                created_at: Set(Utc::now().into()),
            })
            .await?;
        entries.push(entry);

        tracing::info!(playlist_id = %playlist_id, video_id = %video_id, position, "Video added to playlist");
        Ok(PlaylistWithVideos::new(playlist, &entries))
    }

    /// Remove a video from a playlist.
    pub async fn remove_video(
        &self,
        user_id: &str,
        video_id: &str,
        playlist_id: &str,
    ) -> AppResult<PlaylistWithVideos> {
        let playlist = self.get_for_edit(user_id, video_id, playlist_id).await?;

        let mut entries = self.playlist_repo.find_entries(playlist_id).await?;
        if !entries.iter().any(|e| e.video_id == video_id) {
            return Err(AppError::BadRequest("Video is not in playlist".to_string()));
        }

        self.playlist_repo.remove_video(playlist_id, video_id).await?;
        entries.retain(|e| e.video_id != video_id);

        tracing::info!(playlist_id = %playlist_id, video_id = %video_id, "Video removed from playlist");
        Ok(PlaylistWithVideos::new(playlist, &entries))
    }

    /// All playlists of a user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<PlaylistSummary>> {
        ensure_valid_id(user_id, "userId")?;
        self.user_repo.get_by_id(user_id).await?;

        let playlists = self.playlist_repo.find_by_owner(user_id).await?;
        let playlist_ids: Vec<String> = playlists.iter().map(|p| p.id.clone()).collect();
        let entries = self
            .playlist_repo
            .find_entries_for_playlists(&playlist_ids)
            .await?;

        let video_ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
        let videos: HashMap<String, video::Model> = self
            .video_repo
            .find_by_ids(&video_ids)
            .await?
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();

        let mut by_playlist: HashMap<&str, Vec<&playlist_video::Model>> = HashMap::new();
        for entry in &entries {
            by_playlist
                .entry(entry.playlist_id.as_str())
                .or_default()
                .push(entry);
        }

        Ok(playlists
            .iter()
            .map(|p| {
                let published = published_in_order(
                    by_playlist.get(p.id.as_str()).into_iter().flatten().copied(),
                    &videos,
                );
                PlaylistSummary {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    description: p.description.clone(),
                    total_videos: published.len() as u64,
                    total_views: published
                        .iter()
                        .filter_map(|id| videos.get(*id))
                        .map(|v| v.views)
                        .sum(),
                    created_at: p.created_at.to_rfc3339(),
                    updated_at: p.updated_at.map(|t| t.to_rfc3339()),
                }
            })
            .collect())
    }
}
