//! Playlist repository.

use std::sync::Arc;

use crate::entities::{Playlist, PlaylistVideo, playlist, playlist_video};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use videotube_common::{AppError, AppResult};

/// Playlist repository for database operations.
#[derive(Clone)]
pub struct PlaylistRepository {
    db: Arc<DatabaseConnection>,
}

impl PlaylistRepository {
    /// Create a new playlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a playlist by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<playlist::Model>> {
        Playlist::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all playlists of a user, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<playlist::Model>> {
        Playlist::find()
            .filter(playlist::Column::OwnerId.eq(owner_id))
            .order_by_desc(playlist::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new playlist.
    pub async fn create(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a playlist.
    pub async fn update(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a playlist and its entries.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        PlaylistVideo::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Playlist::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // ==================== Playlist Entry Operations ====================

    /// Entries of a playlist in position order.
    pub async fn find_entries(&self, playlist_id: &str) -> AppResult<Vec<playlist_video::Model>> {
        PlaylistVideo::find()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(playlist_video::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Entries of several playlists, each playlist's entries in position order.
    pub async fn find_entries_for_playlists(
        &self,
        playlist_ids: &[String],
    ) -> AppResult<Vec<playlist_video::Model>> {
        if playlist_ids.is_empty() {
            return Ok(vec![]);
        }

        PlaylistVideo::find()
            .filter(playlist_video::Column::PlaylistId.is_in(playlist_ids.iter().cloned()))
            .order_by_asc(playlist_video::Column::PlaylistId)
            .order_by_asc(playlist_video::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a video to a playlist at the given position.
    pub async fn add_video(
        &self,
        model: playlist_video::ActiveModel,
    ) -> AppResult<playlist_video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a video from a playlist.
    pub async fn remove_video(&self, playlist_id: &str, video_id: &str) -> AppResult<u64> {
        let result = PlaylistVideo::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Remove a video from every playlist.
    pub async fn delete_entries_by_video(&self, video_id: &str) -> AppResult<u64> {
        let result = PlaylistVideo::delete_many()
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_playlist(id: &str, owner_id: &str, name: &str) -> playlist::Model {
        playlist::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_entry(id: &str, playlist_id: &str, video_id: &str, position: i32) -> playlist_video::Model {
        playlist_video::Model {
            id: id.to_string(),
            playlist_id: playlist_id.to_string(),
            video_id: video_id.to_string(),
            position,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let playlist = create_test_playlist("p1", "user1", "Favorites");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[playlist.clone()]])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert_eq!(result.unwrap().name, "Favorites");
    }

    #[tokio::test]
    async fn test_find_entries_in_position_order() {
        let e1 = create_test_entry("e1", "p1", "v1", 0);
        let e2 = create_test_entry("e2", "p1", "v2", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        let entries = repo.find_entries("p1").await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].video_id, "v2");
    }

    #[tokio::test]
    async fn test_delete_removes_entries_then_playlist() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert!(repo.delete("p1").await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_video_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert_eq!(repo.remove_video("p1", "v9").await.unwrap(), 0);
    }
}
