//! Like repository.

use std::{collections::HashMap, sync::Arc};

use crate::entities::{Like, like};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use videotube_common::{AppError, AppResult};

/// What a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    const fn column(self) -> like::Column {
        match self {
            Self::Video => like::Column::VideoId,
            Self::Comment => like::Column::CommentId,
            Self::Tweet => like::Column::TweetId,
        }
    }

    /// The target id stored in a like row of this kind.
    #[must_use]
    pub fn target_id(self, model: &like::Model) -> Option<&str> {
        match self {
            Self::Video => model.video_id.as_deref(),
            Self::Comment => model.comment_id.as_deref(),
            Self::Tweet => model.tweet_id.as_deref(),
        }
    }
}

#[derive(FromQueryResult)]
struct TargetCount {
    target_id: Option<String>,
    count: i64,
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's like on a target.
    pub async fn find_by_target_and_user(
        &self,
        target: LikeTarget,
        target_id: &str,
        user_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(target.column().eq(target_id))
            .filter(like::Column::LikedBy.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new like.
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a like.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Like::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete every like on the given targets.
    pub async fn delete_by_targets(&self, target: LikeTarget, target_ids: &[String]) -> AppResult<u64> {
        if target_ids.is_empty() {
            return Ok(0);
        }

        let result = Like::delete_many()
            .filter(target.column().is_in(target_ids.iter().cloned()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Count likes per target. Targets without likes are absent from the map.
    pub async fn count_by_targets(
        &self,
        target: LikeTarget,
        target_ids: &[String],
    ) -> AppResult<HashMap<String, u64>> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let column = target.column();
        let rows = Like::find()
            .select_only()
            .column_as(column, "target_id")
            .column_as(like::Column::Id.count(), "count")
            .filter(column.is_in(target_ids.iter().cloned()))
            .group_by(column)
            .into_model::<TargetCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|r| Some((r.target_id?, u64::try_from(r.count).unwrap_or(0))))
            .collect())
    }

    /// Count likes on a single target.
    pub async fn count_by_target(&self, target: LikeTarget, target_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(target.column().eq(target_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The user's likes among the given targets.
    pub async fn find_by_user_and_targets(
        &self,
        user_id: &str,
        target: LikeTarget,
        target_ids: &[String],
    ) -> AppResult<Vec<like::Model>> {
        if target_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(like::Column::LikedBy.eq(user_id))
            .filter(target.column().is_in(target_ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All video likes of a user, newest first.
    pub async fn find_video_likes_by_user(&self, user_id: &str) -> AppResult<Vec<like::Model>> {
        Like::find()
            .filter(like::Column::LikedBy.eq(user_id))
            .filter(like::Column::VideoId.is_not_null())
            .order_by_desc(like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
