//! Video repository.

use std::sync::Arc;

use crate::entities::{Video, video};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use videotube_common::{AppError, AppResult, PageRequest};

/// Column a video listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VideoSortField {
    #[default]
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortField {
    const fn column(self) -> video::Column {
        match self {
            Self::CreatedAt => video::Column::CreatedAt,
            Self::Views => video::Column::Views,
            Self::Duration => video::Column::Duration,
            Self::Title => video::Column::Title,
        }
    }
}

/// Filters for the published video listing.
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Only videos uploaded by this user.
    pub owner_id: Option<String>,
    pub sort_by: VideoSortField,
    pub ascending: bool,
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find videos by IDs, in no particular order.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<video::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Video::find()
            .filter(video::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn published(query: &VideoQuery) -> Select<Video> {
        let mut select = Video::find().filter(video::Column::IsPublished.eq(true));

        if let Some(owner_id) = &query.owner_id {
            select = select.filter(video::Column::OwnerId.eq(owner_id.as_str()));
        }

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Expr::col(video::Column::Title).ilike(pattern.as_str()))
                    .add(Expr::col(video::Column::Description).ilike(pattern.as_str())),
            );
        }

        select
    }

    /// Get one page of published videos matching `query`.
    pub async fn search_published(
        &self,
        query: &VideoQuery,
        page: PageRequest,
    ) -> AppResult<Vec<video::Model>> {
        let order = if query.ascending {
            Order::Asc
        } else {
            Order::Desc
        };

        Self::published(query)
            .order_by(query.sort_by.column(), order.clone())
            .order_by(video::Column::Id, order)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count published videos matching `query`.
    pub async fn count_published(&self, query: &VideoQuery) -> AppResult<u64> {
        Self::published(query)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all videos of a user, published or not, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .order_by_desc(video::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the most recent published video of each of the given channels.
    pub async fn find_latest_published_by_owners(
        &self,
        owner_ids: &[String],
    ) -> AppResult<Vec<video::Model>> {
        if owner_ids.is_empty() {
            return Ok(vec![]);
        }

        // DISTINCT ON keeps the first row of each owner in ORDER BY order.
        Video::find()
            .distinct_on([video::Column::OwnerId])
            .filter(video::Column::OwnerId.is_in(owner_ids.iter().cloned()))
            .filter(video::Column::IsPublished.eq(true))
            .order_by_asc(video::Column::OwnerId)
            .order_by_desc(video::Column::CreatedAt)
            .order_by_desc(video::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the videos of a user.
    pub async fn count_by_owner(&self, owner_id: &str) -> AppResult<u64> {
        Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of views across all videos of a user.
    pub async fn sum_views_by_owner(&self, owner_id: &str) -> AppResult<i64> {
        #[derive(FromQueryResult)]
        struct SumResult {
            total: Option<i64>,
        }

        let result = Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .select_only()
            .column_as(Expr::cust("CAST(COALESCE(SUM(\"views\"), 0) AS BIGINT)"), "total")
            .into_model::<SumResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a video.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the view counter atomically.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Video::update_many()
            .col_expr(video::Column::Views, Expr::col(video::Column::Views).add(1))
            .filter(video::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Delete a video.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Video::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
