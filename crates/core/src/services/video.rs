//! Video service.
//!
//! Publishing stores the media through a [`StorageBackend`] before the
//! database row is written. Uploads are not rolled back when a later step
//! fails.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use videotube_common::{
    AppError, AppResult, IdGenerator, PageRequest, Paginated, StorageBackend, UploadedFile,
    ensure_valid_id, generate_storage_key,
};
use videotube_db::{
    entities::video,
    repositories::{
        CommentRepository, LikeRepository, LikeTarget, PlaylistRepository,
        SubscriptionRepository, UserRepository, VideoQuery, VideoRepository, VideoSortField,
    },
};

use crate::{
    validation::require_text,
    views::{ChannelSummary, VideoSummary, load_owners},
};

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Filters and ordering for the video listing, as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListParams {
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

impl VideoListParams {
    fn into_query(self) -> AppResult<VideoQuery> {
        let sort_by = match self.sort_by.as_deref() {
            None | Some("createdAt") => VideoSortField::CreatedAt,
            Some("views") => VideoSortField::Views,
            Some("duration") => VideoSortField::Duration,
            Some("title") => VideoSortField::Title,
            Some(_) => return Err(AppError::BadRequest("Invalid sortBy".to_string())),
        };

        let ascending = match self.sort_type.as_deref() {
            None | Some("desc") => false,
            Some("asc") => true,
            Some(_) => return Err(AppError::BadRequest("Invalid sortType".to_string())),
        };

        if let Some(user_id) = &self.user_id {
            ensure_valid_id(user_id, "userId")?;
        }

        Ok(VideoQuery {
            search: self.query,
            owner_id: self.user_id,
            sort_by,
            ascending,
        })
    }
}

/// Fields of a new video.
#[derive(Debug, Default, Validate)]
pub struct PublishVideoInput {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub video_file: Option<MediaUpload>,
    pub thumbnail: Option<MediaUpload>,
}

/// Fields of a video update. A thumbnail replaces the current one.
#[derive(Debug, Default, Validate)]
pub struct UpdateVideoInput {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub thumbnail: Option<MediaUpload>,
}

/// A single video with its channel and like state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: String,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: ChannelSummary,
    pub likes_count: u64,
    pub is_liked: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Service for uploading, listing and managing videos.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    playlist_repo: PlaylistRepository,
    subscription_repo: SubscriptionRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub fn new(
        video_repo: VideoRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        playlist_repo: PlaylistRepository,
        subscription_repo: SubscriptionRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            video_repo,
            user_repo,
            like_repo,
            comment_repo,
            playlist_repo,
            subscription_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// One page of published videos.
    pub async fn list(
        &self,
        params: VideoListParams,
        page: PageRequest,
    ) -> AppResult<Paginated<VideoSummary>> {
        let query = params.into_query()?;

        let videos = self.video_repo.search_published(&query, page).await?;
        let total = self.video_repo.count_published(&query).await?;
        let owners = load_owners(&self.user_repo, videos.iter().map(|v| v.owner_id.as_str())).await?;

        tracing::debug!(page = page.page, total, "Listed videos");

        Ok(Paginated::new(videos, total, page).map(|v| {
            let owner = owners.get(&v.owner_id).cloned();
            VideoSummary::new(v, owner)
        }))
    }

    async fn store(&self, owner_id: &str, upload: &MediaUpload) -> AppResult<UploadedFile> {
        let key = generate_storage_key(owner_id, &upload.file_name);
        self.storage
            .upload(&key, &upload.data, &upload.content_type)
            .await
    }

    /// Upload a new video. It stays unpublished until toggled.
    pub async fn publish(&self, user_id: &str, input: PublishVideoInput) -> AppResult<video::Model> {
        require_text(&input.title, "title")?;
        input.validate()?;

        let video_file = input
            .video_file
            .as_ref()
            .filter(|f| !f.data.is_empty())
            .ok_or_else(|| AppError::BadRequest("videoFile is required".to_string()))?;
        let thumbnail = input
            .thumbnail
            .as_ref()
            .filter(|f| !f.data.is_empty())
            .ok_or_else(|| AppError::BadRequest("thumbnail is required".to_string()))?;

        let stored_video = self.store(user_id, video_file).await?;
        let stored_thumbnail = self.store(user_id, thumbnail).await?;

        let model = video::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(user_id.to_string()),
            video_file: Set(stored_video.url),
            video_file_key: Set(stored_video.key),
            thumbnail: Set(stored_thumbnail.url),
            thumbnail_key: Set(stored_thumbnail.key),
            title: Set(input.title),
            description: Set(input.description.unwrap_or_default()),
            duration: Set(stored_video.duration.unwrap_or(0.0)),
            views: Set(0),
            is_published: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let video = self.video_repo.create(model).await?;
        tracing::info!(video_id = %video.id, user_id = %user_id, size = stored_video.size, "Video uploaded");
        Ok(video)
    }

    /// A single video as seen by `viewer_id`. Every call counts as a view.
    pub async fn get(&self, viewer_id: &str, video_id: &str) -> AppResult<VideoDetail> {
        ensure_valid_id(video_id, "videoId")?;

        let video = self
            .video_repo
            .find_by_id(video_id)
            .await?
            .filter(|v| v.is_published || v.owner_id == viewer_id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let owner = self.user_repo.get_by_id(&video.owner_id).await?;
        let subscribers = self.subscription_repo.count_by_channel(&owner.id).await?;
        let is_subscribed = self
            .subscription_repo
            .find(viewer_id, &owner.id)
            .await?
            .is_some();
        let likes_count = self
            .like_repo
            .count_by_target(LikeTarget::Video, video_id)
            .await?;
        let is_liked = self
            .like_repo
            .find_by_target_and_user(LikeTarget::Video, video_id, viewer_id)
            .await?
            .is_some();

        let detail = VideoDetail {
            id: video.id,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            title: video.title,
            description: video.description,
            duration: video.duration,
            views: video.views,
            is_published: video.is_published,
            owner: ChannelSummary::new(&owner, subscribers, is_subscribed),
            likes_count,
            is_liked,
            created_at: video.created_at.to_rfc3339(),
            updated_at: video.updated_at.map(|t| t.to_rfc3339()),
        };

        self.video_repo.increment_views(video_id).await?;
        tracing::debug!(video_id = %video_id, viewer_id = %viewer_id, "Video viewed");
        Ok(detail)
    }

    async fn get_owned(&self, user_id: &str, video_id: &str, action: &str) -> AppResult<video::Model> {
        let video = self
            .video_repo
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if video.owner_id != user_id {
            return Err(AppError::Forbidden(format!(
                "You are not allowed to {action} this video"
            )));
        }

        Ok(video)
    }

    async fn delete_object(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(error = %e, key = %key, "Failed to delete stored object");
        }
    }

    /// Change title and description, optionally replacing the thumbnail.
    pub async fn update(
        &self,
        user_id: &str,
        video_id: &str,
        input: UpdateVideoInput,
    ) -> AppResult<video::Model> {
        ensure_valid_id(video_id, "videoId")?;
        require_text(&input.title, "title")?;
        input.validate()?;

        let video = self.get_owned(user_id, video_id, "update").await?;
        let old_thumbnail_key = video.thumbnail_key.clone();

        let mut active: video::ActiveModel = video.into();
        active.title = Set(input.title);
        if let Some(description) = input.description {
            active.description = Set(description);
        }

        let replaced = match input.thumbnail.as_ref().filter(|f| !f.data.is_empty()) {
            Some(thumbnail) => {
                let stored = self.store(user_id, thumbnail).await?;
                active.thumbnail = Set(stored.url);
                active.thumbnail_key = Set(stored.key);
                true
            }
            None => false,
        };
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.video_repo.update(active).await?;
        if replaced {
            self.delete_object(&old_thumbnail_key).await;
        }

        tracing::info!(video_id = %video_id, thumbnail_replaced = replaced, "Video updated");
        Ok(updated)
    }

    /// Delete a video with its comments, likes, playlist entries and media.
    pub async fn delete(&self, user_id: &str, video_id: &str) -> AppResult<()> {
        ensure_valid_id(video_id, "videoId")?;
        let video = self.get_owned(user_id, video_id, "delete").await?;

        let comment_ids = self.comment_repo.find_ids_by_video(video_id).await?;
        self.like_repo
            .delete_by_targets(LikeTarget::Comment, &comment_ids)
            .await?;
        self.comment_repo.delete_by_video(video_id).await?;
        self.like_repo
            .delete_by_targets(LikeTarget::Video, &[video_id.to_string()])
            .await?;
        self.playlist_repo.delete_entries_by_video(video_id).await?;
        self.video_repo.delete(video_id).await?;

        self.delete_object(&video.video_file_key).await;
        self.delete_object(&video.thumbnail_key).await;

        tracing::info!(video_id = %video_id, comments = comment_ids.len(), "Video deleted");
        Ok(())
    }

    /// Flip the published flag. Returns the new state.
    pub async fn toggle_publish(&self, user_id: &str, video_id: &str) -> AppResult<bool> {
        ensure_valid_id(video_id, "videoId")?;
        let video = self.get_owned(user_id, video_id, "publish").await?;

        let is_published = !video.is_published;
        let mut active: video::ActiveModel = video.into();
        active.is_published = Set(is_published);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.video_repo.update(active).await?;
        tracing::info!(video_id = %video_id, is_published = updated.is_published, "Video publish state toggled");
        Ok(updated.is_published)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        MemoryStorage, create_test_user, create_test_video, logged_sql, test_id,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use videotube_db::entities::{like, subscription};

    fn service(db: Arc<DatabaseConnection>, storage: Arc<MemoryStorage>) -> VideoService {
        VideoService::new(
            VideoRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            PlaylistRepository::new(db.clone()),
            SubscriptionRepository::new(db),
            storage,
        )
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn upload(name: &str, content_type: &str) -> MediaUpload {
        MediaUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: b"bytes".to_vec(),
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_field() {
        let service = service(empty_db(), Arc::default());

        let params = VideoListParams {
            sort_by: Some("likes".to_string()),
            ..Default::default()
        };
        let err = service.list(params, PageRequest::default()).await.unwrap_err();

        assert_eq!(err.message(), "Invalid sortBy");
    }

    #[tokio::test]
    async fn test_publish_requires_thumbnail() {
        let service = service(empty_db(), Arc::default());

        let err = service
            .publish(
                &test_id(1),
                PublishVideoInput {
                    title: "Trip".to_string(),
                    video_file: Some(upload("trip.mp4", "video/mp4")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.message(), "thumbnail is required");
    }

    #[tokio::test]
    async fn test_publish_upload_failure_is_server_error() {
        let storage = Arc::new(MemoryStorage {
            fail_uploads: true,
            ..Default::default()
        });
        let service = service(empty_db(), storage);

        let err = service
            .publish(
                &test_id(1),
                PublishVideoInput {
                    title: "Trip".to_string(),
                    video_file: Some(upload("trip.mp4", "video/mp4")),
                    thumbnail: Some(upload("trip.png", "image/png")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_publish_stores_both_files_unpublished() {
        let owner = test_id(1);
        let stored = create_test_video(&test_id(2), &owner, false);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let storage = Arc::new(MemoryStorage::default());
        let service = service(db, storage.clone());

        let video = service
            .publish(
                &owner,
                PublishVideoInput {
                    title: "Trip".to_string(),
                    description: None,
                    video_file: Some(upload("trip.mp4", "video/mp4")),
                    thumbnail: Some(upload("trip.png", "image/png")),
                },
            )
            .await
            .unwrap();

        assert!(!video.is_published);
        assert_eq!(storage.objects.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unpublished_video_hidden_from_others() {
        let video = create_test_video(&test_id(2), &test_id(9), false);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .into_connection(),
        );
        let service = service(db, Arc::default());

        let err = service.get(&test_id(1), &video.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_each_fetch_counts_a_view() {
        let owner = create_test_user(&test_id(9), "bob");
        let video = create_test_video(&test_id(2), &owner.id, true);

        let mut mock = MockDatabase::new(DatabaseBackend::Postgres);
        for _ in 0..2 {
            mock = mock
                .append_query_results([[video.clone()]])
                .append_query_results([[owner.clone()]])
                .append_query_results([[count_row(4)]])
                .append_query_results([Vec::<subscription::Model>::new()])
                .append_query_results([[count_row(1)]])
                .append_query_results([Vec::<like::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]);
        }
        let db = Arc::new(mock.into_connection());
        let service = service(db.clone(), Arc::default());

        let first = service.get(&test_id(1), &video.id).await.unwrap();
        service.get(&owner.id, &video.id).await.unwrap();

        assert_eq!(first.owner.subscribers_count, 4);
        assert_eq!(first.likes_count, 1);
        assert!(!first.is_liked);

        drop(service);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let updates = log
            .iter()
            .filter(|t| format!("{t:?}").contains("UPDATE"))
            .count();
        assert_eq!(updates, 2);
    }

    #[tokio::test]
    async fn test_update_replaces_thumbnail() {
        let owner = test_id(1);
        let video = create_test_video(&test_id(2), &owner, true);
        let old_key = video.thumbnail_key.clone();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .append_query_results([[video.clone()]])
                .into_connection(),
        );
        let storage = Arc::new(MemoryStorage::default());
        let service = service(db, storage.clone());

        service
            .update(
                &owner,
                &video.id,
                UpdateVideoInput {
                    title: "New title".to_string(),
                    description: None,
                    thumbnail: Some(upload("new.png", "image/png")),
                },
            )
            .await
            .unwrap();

        assert_eq!(storage.objects.lock().unwrap().len(), 1);
        assert_eq!(*storage.deleted.lock().unwrap(), vec![old_key]);
    }

    #[tokio::test]
    async fn test_toggle_publish_by_non_owner_is_forbidden() {
        let video = create_test_video(&test_id(2), &test_id(9), false);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .into_connection(),
        );
        let service = service(db, Arc::default());

        let err = service
            .toggle_publish(&test_id(1), &video.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    fn rename(title: &str) -> UpdateVideoInput {
        UpdateVideoInput {
            title: title.to_string(),
            description: None,
            thumbnail: Some(upload("new.png", "image/png")),
        }
    }

    #[tokio::test]
    async fn test_update_missing_video_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );
        let storage = Arc::new(MemoryStorage::default());
        let service = service(db, storage.clone());

        let err = service
            .update(&test_id(1), &test_id(2), rename("Renamed"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(storage.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let video = create_test_video(&test_id(2), &test_id(9), true);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .into_connection(),
        );
        let storage = Arc::new(MemoryStorage::default());
        let service = service(Arc::clone(&db), storage.clone());

        let err = service
            .update(&test_id(1), &video.id, rename("Mine now"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.message(), "You are not allowed to update this video");
        assert!(storage.objects.lock().unwrap().is_empty());
        assert!(storage.deleted.lock().unwrap().is_empty());

        drop(service);
        let sql = logged_sql(db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("SELECT"));
    }

    #[tokio::test]
    async fn test_delete_missing_video_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );
        let service = service(db, Arc::default());

        let err = service.delete(&test_id(1), &test_id(2)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let video = create_test_video(&test_id(2), &test_id(9), true);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .into_connection(),
        );
        let storage = Arc::new(MemoryStorage::default());
        let service = service(Arc::clone(&db), storage.clone());

        let err = service.delete(&test_id(1), &video.id).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(storage.deleted.lock().unwrap().is_empty());

        drop(service);
        let sql = logged_sql(db);
        assert!(sql.iter().all(|q| !q.starts_with("DELETE")), "{sql:?}");
    }
}
