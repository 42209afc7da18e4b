//! Subscription service.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use videotube_common::{AppError, AppResult, IdGenerator, ensure_valid_id};
use videotube_db::{
    entities::subscription,
    repositories::{SubscriptionRepository, UserRepository, VideoRepository},
};

use crate::views::{ChannelSummary, VideoSummary};

/// A channel the user follows, with its newest published video.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    pub channel: ChannelSummary,
    pub latest_video: Option<VideoSummary>,
}

/// Service for subscribing to channels.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    user_repo: UserRepository,
    video_repo: VideoRepository,
    id_gen: IdGenerator,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        subscription_repo: SubscriptionRepository,
        user_repo: UserRepository,
        video_repo: VideoRepository,
    ) -> Self {
        Self {
            subscription_repo,
            user_repo,
            video_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Subscribe to a channel, or unsubscribe if already subscribed.
    ///
    /// Returns whether the user is subscribed afterwards.
    pub async fn toggle(&self, user_id: &str, channel_id: &str) -> AppResult<bool> {
        ensure_valid_id(channel_id, "channelId")?;
        if channel_id == user_id {
            return Err(AppError::BadRequest(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }

        self.user_repo
            .find_by_id(channel_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

        if let Some(existing) = self.subscription_repo.find(user_id, channel_id).await? {
            self.subscription_repo.delete(&existing.id).await?;
            tracing::info!(user_id = %user_id, channel_id = %channel_id, "Unsubscribed");
            return Ok(false);
        }

        self.subscription_repo
            .create(subscription::ActiveModel {
                id: Set(self.id_gen.generate()),
                subscriber_id: Set(user_id.to_string()),
                channel_id: Set(channel_id.to_string()),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        tracing::info!(user_id = %user_id, channel_id = %channel_id, "Subscribed");
        Ok(true)
    }

    /// Summaries of `user_ids` in the given order, as seen by `viewer_id`.
    async fn channel_summaries(
        &self,
        viewer_id: &str,
        user_ids: &[String],
    ) -> AppResult<Vec<ChannelSummary>> {
        let users: HashMap<String, _> = self
            .user_repo
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        let counts = self.subscription_repo.count_by_channels(user_ids).await?;
        let followed: HashSet<String> = self
            .subscription_repo
            .find_subscribed_among(viewer_id, user_ids)
            .await?
            .into_iter()
            .collect();

        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id))
            .map(|u| {
                ChannelSummary::new(
                    u,
                    counts.get(&u.id).copied().unwrap_or(0),
                    followed.contains(&u.id),
                )
            })
            .collect())
    }

    /// Subscribers of a channel, newest first.
    pub async fn subscribers(&self, viewer_id: &str, channel_id: &str) -> AppResult<Vec<ChannelSummary>> {
        ensure_valid_id(channel_id, "channelId")?;
        self.user_repo.get_by_id(channel_id).await?;

        let subscriber_ids: Vec<String> = self
            .subscription_repo
            .find_by_channel(channel_id)
            .await?
            .into_iter()
            .map(|s| s.subscriber_id)
            .collect();

        self.channel_summaries(viewer_id, &subscriber_ids).await
    }

    /// Channels a user subscribes to, newest subscription first.
    pub async fn subscribed_channels(
        &self,
        viewer_id: &str,
        subscriber_id: &str,
    ) -> AppResult<Vec<SubscribedChannel>> {
        ensure_valid_id(subscriber_id, "subscriberId")?;
        self.user_repo.get_by_id(subscriber_id).await?;

        let channel_ids: Vec<String> = self
            .subscription_repo
            .find_by_subscriber(subscriber_id)
            .await?
            .into_iter()
            .map(|s| s.channel_id)
            .collect();

        let channels = self.channel_summaries(viewer_id, &channel_ids).await?;
        let mut latest: HashMap<String, _> = self
            .video_repo
            .find_latest_published_by_owners(&channel_ids)
            .await?
            .into_iter()
            .map(|v| (v.owner_id.clone(), v))
            .collect();

        Ok(channels
            .into_iter()
            .map(|channel| SubscribedChannel {
                latest_video: latest.remove(&channel.id).map(|v| VideoSummary::new(v, None)),
                channel,
            })
            .collect())
    }
}
