//! Tweet repository.

use std::sync::Arc;

use crate::entities::{Tweet, tweet};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use videotube_common::{AppError, AppResult};

/// Tweet repository for database operations.
#[derive(Clone)]
pub struct TweetRepository {
    db: Arc<DatabaseConnection>,
}

impl TweetRepository {
    /// Create a new tweet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tweet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tweet::Model>> {
        Tweet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all tweets of a user, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<tweet::Model>> {
        Tweet::find()
            .filter(tweet::Column::OwnerId.eq(owner_id))
            .order_by_desc(tweet::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tweet.
    pub async fn create(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a tweet.
    pub async fn update(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tweet.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Tweet::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_tweet(id: &str, owner_id: &str, content: &str, age_secs: i64) -> tweet::Model {
        tweet::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            content: content.to_string(),
            created_at: (Utc::now() - Duration::seconds(age_secs)).into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_owner() {
        let t1 = create_test_tweet("t1", "user1", "newer", 1);
        let t2 = create_test_tweet("t2", "user1", "older", 60);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1, t2]])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        let result = repo.find_by_owner("user1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content, "newer");
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let tweet = create_test_tweet("t1", "user1", "hi", 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tweet.clone()]])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        let created = repo
            .create(tweet::ActiveModel {
                id: Set(tweet.id.clone()),
                owner_id: Set(tweet.owner_id.clone()),
                content: Set(tweet.content.clone()),
                created_at: Set(tweet.created_at),
                updated_at: Set(None),
            })
            .await
            .unwrap();

        assert_eq!(created.content, "hi");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        assert!(repo.delete("t1").await.is_ok());
    }
}
