//! Like service.

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use videotube_common::{AppError, AppResult, IdGenerator, ensure_valid_id};
use videotube_db::{
    entities::like,
    repositories::{
        CommentRepository, LikeRepository, LikeTarget, TweetRepository, UserRepository,
        VideoRepository,
    },
};

use crate::views::{VideoSummary, load_owners};

/// A liked video in the requester's library.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub like_id: String,
    pub liked_at: String,
    pub video: VideoSummary,
}

/// Service for liking videos, comments and tweets.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    video_repo: VideoRepository,
    comment_repo: CommentRepository,
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        video_repo: VideoRepository,
        comment_repo: CommentRepository,
        tweet_repo: TweetRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            like_repo,
            video_repo,
            comment_repo,
            tweet_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn ensure_target_exists(&self, target: LikeTarget, target_id: &str) -> AppResult<()> {
        let (exists, what) = match target {
            LikeTarget::Video => (self.video_repo.find_by_id(target_id).await?.is_some(), "Video"),
            LikeTarget::Comment => (
                self.comment_repo.find_by_id(target_id).await?.is_some(),
                "Comment",
            ),
            LikeTarget::Tweet => (self.tweet_repo.find_by_id(target_id).await?.is_some(), "Tweet"),
        };

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{what} not found")))
        }
    }

    /// Like the target, or remove the like if it already exists.
    ///
    /// Returns whether the target is liked afterwards.
    pub async fn toggle(&self, user_id: &str, target: LikeTarget, target_id: &str) -> AppResult<bool> {
        let param = match target {
            LikeTarget::Video => "videoId",
            LikeTarget::Comment => "commentId",
            LikeTarget::Tweet => "tweetId",
        };
        ensure_valid_id(target_id, param)?;
        self.ensure_target_exists(target, target_id).await?;

        if let Some(existing) = self
            .like_repo
            .find_by_target_and_user(target, target_id, user_id)
            .await?
        {
            self.like_repo.delete(&existing.id).await?;
            tracing::info!(user_id = %user_id, target = ?target, target_id = %target_id, "Like removed");
            return Ok(false);
        }

        let id_for = |t: LikeTarget| Set((t == target).then(|| target_id.to_string()));
        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            video_id: id_for(LikeTarget::Video),
            comment_id: id_for(LikeTarget::Comment),
            tweet_id: id_for(LikeTarget::Tweet),
            liked_by: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.like_repo.create(model).await?;

        tracing::info!(user_id = %user_id, target = ?target, target_id = %target_id, "Like added");
        Ok(true)
    }

    /// Published videos the user has liked, most recent like first.
    pub async fn liked_videos(&self, user_id: &str) -> AppResult<Vec<LikedVideo>> {
        let likes = self.like_repo.find_video_likes_by_user(user_id).await?;
        let video_ids: Vec<String> = likes.iter().filter_map(|l| l.video_id.clone()).collect();

        let mut videos: std::collections::HashMap<String, _> = self
            .video_repo
            .find_by_ids(&video_ids)
            .await?
            .into_iter()
            .filter(|v| v.is_published)
            .map(|v| (v.id.clone(), v))
            .collect();

        let owners = load_owners(&self.user_repo, videos.values().map(|v| v.owner_id.as_str())).await?;

        Ok(likes
            .into_iter()
            .filter_map(|l| {
                let video = videos.remove(l.video_id.as_deref()?)?;
                let owner = owners.get(&video.owner_id).cloned();
                Some(LikedVideo {
                    like_id: l.id,
                    liked_at: l.created_at.to_rfc3339(),
                    video: VideoSummary::new(video, owner),
                })
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_test_user, create_test_video, test_id};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use videotube_db::entities::{tweet, video};

    fn service(db: DatabaseConnection) -> LikeService {
        let db = Arc::new(db);
        LikeService::new(
            LikeRepository::new(db.clone()),
            VideoRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            TweetRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    fn create_test_tweet(id: &str) -> tweet::Model {
        tweet::Model {
            id: id.to_string(),
            owner_id: test_id(9),
            content: "hello".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_like(id: &str, tweet_id: &str, user_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            video_id: None,
            comment_id: None,
            tweet_id: Some(tweet_id.to_string()),
            liked_by: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_rejects_malformed_id() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let err = service
            .toggle(&test_id(1), LikeTarget::Comment, "12")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Invalid commentId");
    }

    #[tokio::test]
    async fn test_toggle_missing_target() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let err = service
            .toggle(&test_id(1), LikeTarget::Video, &test_id(2))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Video not found");
    }

    #[tokio::test]
    async fn test_toggle_cycle() {
        let user = test_id(1);
        let tweet_id = test_id(2);
        let like = create_test_like(&test_id(3), &tweet_id, &user);

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                // like
                .append_query_results([[create_test_tweet(&tweet_id)]])
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[like.clone()]])
                // unlike
                .append_query_results([[create_test_tweet(&tweet_id)]])
                .append_query_results([[like.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // like again
                .append_query_results([[create_test_tweet(&tweet_id)]])
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[like]])
                .into_connection(),
        );

        assert!(service.toggle(&user, LikeTarget::Tweet, &tweet_id).await.unwrap());
        assert!(!service.toggle(&user, LikeTarget::Tweet, &tweet_id).await.unwrap());
        assert!(service.toggle(&user, LikeTarget::Tweet, &tweet_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_liked_videos_skips_unpublished() {
        let user = test_id(1);
        let owner = create_test_user(&test_id(9), "bob");
        let published = create_test_video(&test_id(2), &owner.id, true);
        let hidden = create_test_video(&test_id(3), &owner.id, false);

        let video_like = |id: u32, video_id: &str| like::Model {
            id: test_id(id),
            video_id: Some(video_id.to_string()),
            comment_id: None,
            tweet_id: None,
            liked_by: user.clone(),
            created_at: Utc::now().into(),
        };

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video_like(4, &hidden.id), video_like(5, &published.id)]])
                .append_query_results([[published.clone(), hidden]])
                .append_query_results([[owner]])
                .into_connection(),
        );

        let liked = service.liked_videos(&user).await.unwrap();

        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].video.id, published.id);
        assert_eq!(liked[0].like_id, test_id(5));
        assert_eq!(liked[0].video.owner.as_ref().unwrap().username, "bob");
    }
}
