//! Subscription repository.

use std::{collections::HashMap, sync::Arc};

use crate::entities::{Subscription, subscription};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use videotube_common::{AppError, AppResult};

#[derive(FromQueryResult)]
struct ChannelCount {
    channel_id: String,
    count: i64,
}

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subscription of `subscriber_id` to `channel_id`.
    pub async fn find(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> AppResult<Option<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new subscription.
    pub async fn create(&self, model: subscription::ActiveModel) -> AppResult<subscription::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a subscription.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Subscription::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Subscriptions to a channel, newest first.
    pub async fn find_by_channel(&self, channel_id: &str) -> AppResult<Vec<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .order_by_desc(subscription::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Subscriptions held by a user, newest first.
    pub async fn find_by_subscriber(
        &self,
        subscriber_id: &str,
    ) -> AppResult<Vec<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .order_by_desc(subscription::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count subscribers of a channel.
    pub async fn count_by_channel(&self, channel_id: &str) -> AppResult<u64> {
        Subscription::find()
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count subscribers per channel. Channels without subscribers are absent.
    pub async fn count_by_channels(&self, channel_ids: &[String]) -> AppResult<HashMap<String, u64>> {
        if channel_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Subscription::find()
            .select_only()
            .column(subscription::Column::ChannelId)
            .column_as(subscription::Column::Id.count(), "count")
            .filter(subscription::Column::ChannelId.is_in(channel_ids.iter().cloned()))
            .group_by(subscription::Column::ChannelId)
            .into_model::<ChannelCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| (r.channel_id, u64::try_from(r.count).unwrap_or(0)))
            .collect())
    }

    /// Which of `channel_ids` the subscriber follows.
    pub async fn find_subscribed_among(
        &self,
        subscriber_id: &str,
        channel_ids: &[String],
    ) -> AppResult<Vec<String>> {
        if channel_ids.is_empty() {
            return Ok(vec![]);
        }

        Subscription::find()
            .select_only()
            .column(subscription::Column::ChannelId)
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.is_in(channel_ids.iter().cloned()))
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
