//! Tweet service.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use videotube_common::{AppError, AppResult, IdGenerator, ensure_valid_id};
use videotube_db::{
    entities::tweet,
    repositories::{LikeRepository, LikeTarget, TweetRepository, UserRepository},
};

use crate::{validation::require_text, views::OwnerSummary};

/// Body of tweet create and update requests.
#[derive(Debug, Deserialize, Validate)]
pub struct TweetInput {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub content: String,
}

/// A tweet with its author and like state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: String,
    pub content: String,
    pub owner: OwnerSummary,
    pub likes_count: u64,
    pub is_liked: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Service for managing tweets.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub const fn new(
        tweet_repo: TweetRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            tweet_repo,
            user_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a tweet.
    pub async fn create(&self, user_id: &str, input: TweetInput) -> AppResult<tweet::Model> {
        require_text(&input.content, "content")?;
        input.validate()?;

        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(user_id.to_string()),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let tweet = self.tweet_repo.create(model).await?;
        tracing::info!(tweet_id = %tweet.id, user_id = %user_id, "Tweet created");
        Ok(tweet)
    }

    /// All tweets of a user, newest first, as seen by `viewer_id`.
    pub async fn list_by_user(&self, viewer_id: &str, user_id: &str) -> AppResult<Vec<TweetView>> {
        ensure_valid_id(user_id, "userId")?;

        let owner = self.user_repo.get_by_id(user_id).await?;
        let tweets = self.tweet_repo.find_by_owner(user_id).await?;
        let ids: Vec<String> = tweets.iter().map(|t| t.id.clone()).collect();

        let counts = self.like_repo.count_by_targets(LikeTarget::Tweet, &ids).await?;
        let liked: HashSet<String> = self
            .like_repo
            .find_by_user_and_targets(viewer_id, LikeTarget::Tweet, &ids)
            .await?
            .into_iter()
            .filter_map(|l| l.tweet_id)
            .collect();

        let owner = OwnerSummary::from(&owner);
        tracing::debug!(user_id = %user_id, count = tweets.len(), "Listed tweets");

        Ok(tweets
            .into_iter()
            .map(|t| TweetView {
                likes_count: counts.get(&t.id).copied().unwrap_or(0),
                is_liked: liked.contains(&t.id),
                owner: owner.clone(),
                created_at: t.created_at.to_rfc3339(),
                updated_at: t.updated_at.map(|u| u.to_rfc3339()),
                id: t.id,
                content: t.content,
            })
            .collect())
    }

    /// Load a tweet the user is allowed to modify.
    async fn get_owned(&self, user_id: &str, tweet_id: &str, action: &str) -> AppResult<tweet::Model> {
        let tweet = self
            .tweet_repo
            .find_by_id(tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

        if tweet.owner_id != user_id {
            return Err(AppError::Forbidden(format!(
                "You are not allowed to {action} this tweet"
            )));
        }

        Ok(tweet)
    }

    /// Replace a tweet's content.
    pub async fn update(
        &self,
        user_id: &str,
        tweet_id: &str,
        input: TweetInput,
    ) -> AppResult<tweet::Model> {
        ensure_valid_id(tweet_id, "tweetId")?;
        require_text(&input.content, "content")?;
        input.validate()?;

        let tweet = self.get_owned(user_id, tweet_id, "update").await?;

        let mut active: tweet::ActiveModel = tweet.into();
        active.content = Set(input.content);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.tweet_repo.update(active).await?;
        tracing::info!(tweet_id = %tweet_id, "Tweet updated");
        Ok(updated)
    }

    /// Delete a tweet together with its likes.
    pub async fn delete(&self, user_id: &str, tweet_id: &str) -> AppResult<()> {
        ensure_valid_id(tweet_id, "tweetId")?;
        self.get_owned(user_id, tweet_id, "delete").await?;

        self.like_repo
            .delete_by_targets(LikeTarget::Tweet, &[tweet_id.to_string()])
            .await?;
        self.tweet_repo.delete(tweet_id).await?;

        tracing::info!(tweet_id = %tweet_id, "Tweet deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_test_user, test_id};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use videotube_db::entities::like;

    fn service(db: DatabaseConnection) -> TweetService {
        let db = Arc::new(db);
        TweetService::new(
            TweetRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            LikeRepository::new(db),
        )
    }

    fn create_test_tweet(id: &str, owner_id: &str, content: &str) -> tweet::Model {
        tweet::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn input(content: &str) -> TweetInput {
        TweetInput {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        // Nothing queued: reaching the database would fail differently.
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let err = service.create(&test_id(1), input("   ")).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), "content is required");
    }

    #[tokio::test]
    async fn test_create_stores_content_as_given() {
        let user_id = test_id(1);
        let stored = create_test_tweet(&test_id(2), &user_id, "hi");

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let tweet = service.create(&user_id, input("hi")).await.unwrap();
        assert_eq!(tweet.content, "hi");
        assert_eq!(tweet.owner_id, user_id);
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_id() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let err = service
            .update(&test_id(1), "abc", input("hello"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Invalid tweetId");
    }

    #[tokio::test]
    async fn test_update_missing_tweet() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tweet::Model>::new()])
                .into_connection(),
        );

        let err = service
            .update(&test_id(1), &test_id(2), input("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let tweet = create_test_tweet(&test_id(2), &test_id(9), "original");

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tweet]])
                .into_connection(),
        );

        let err = service
            .update(&test_id(1), &test_id(2), input("hijacked"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_likes_then_tweet() {
        let owner = test_id(1);
        let tweet = create_test_tweet(&test_id(2), &owner, "bye");

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tweet]])
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

        assert!(service.delete(&owner, &test_id(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_by_user_marks_likes() {
        let owner = create_test_user(&test_id(1), "alice");
        let viewer = test_id(5);
        let t1 = create_test_tweet(&test_id(2), &owner.id, "liked");
        let t2 = create_test_tweet(&test_id(3), &owner.id, "not liked");
        let viewer_like = like::Model {
            id: test_id(4),
            video_id: None,
            comment_id: None,
            tweet_id: Some(t1.id.clone()),
            liked_by: viewer.clone(),
            created_at: Utc::now().into(),
        };

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[owner.clone()]])
                .append_query_results([[t1.clone(), t2]])
                .append_query_results([[maplit::btreemap! {
                    "target_id" => sea_orm::Value::String(Some(Box::new(t1.id.clone()))),
                    "count" => sea_orm::Value::BigInt(Some(1)),
                }]])
                .append_query_results([[viewer_like]])
                .into_connection(),
        );

        let tweets = service.list_by_user(&viewer, &owner.id).await.unwrap();

        assert_eq!(tweets.len(), 2);
        assert!(tweets[0].is_liked);
        assert_eq!(tweets[0].likes_count, 1);
        assert!(!tweets[1].is_liked);
        assert_eq!(tweets[1].likes_count, 0);
        assert_eq!(tweets[1].owner.username, "alice");
    }
}
