//! Channel dashboard service.

use serde::Serialize;
use videotube_common::AppResult;
use videotube_db::repositories::{LikeRepository, LikeTarget, SubscriptionRepository, VideoRepository};

use crate::views::VideoSummary;

/// Totals for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_subscribers: u64,
    pub total_likes: u64,
    pub total_views: i64,
    pub total_videos: u64,
}

/// One of the channel owner's videos with its like count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVideo {
    #[serde(flatten)]
    pub video: VideoSummary,
    pub likes_count: u64,
}

/// Service behind the channel owner's dashboard.
#[derive(Clone)]
pub struct DashboardService {
    video_repo: VideoRepository,
    like_repo: LikeRepository,
    subscription_repo: SubscriptionRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        like_repo: LikeRepository,
        subscription_repo: SubscriptionRepository,
    ) -> Self {
        Self {
            video_repo,
            like_repo,
            subscription_repo,
        }
    }

    /// Subscriber, like, view and video totals of the user's channel.
    pub async fn stats(&self, user_id: &str) -> AppResult<ChannelStats> {
        let videos = self.video_repo.find_by_owner(user_id).await?;
        let ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();

        let total_likes = self
            .like_repo
            .count_by_targets(LikeTarget::Video, &ids)
            .await?
            .values()
            .sum();

        Ok(ChannelStats {
            total_subscribers: self.subscription_repo.count_by_channel(user_id).await?,
            total_likes,
            total_views: self.video_repo.sum_views_by_owner(user_id).await?,
            total_videos: videos.len() as u64,
        })
    }

    /// All of the user's videos, unpublished included, newest first.
    pub async fn videos(&self, user_id: &str) -> AppResult<Vec<DashboardVideo>> {
        let videos = self.video_repo.find_by_owner(user_id).await?;
        let ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
        let counts = self.like_repo.count_by_targets(LikeTarget::Video, &ids).await?;

        Ok(videos
            .into_iter()
            .map(|v| DashboardVideo {
                likes_count: counts.get(&v.id).copied().unwrap_or(0),
                video: VideoSummary::new(v, None),
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_test_video, test_id};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stats() {
        let owner = test_id(1);
        let v1 = create_test_video(&test_id(2), &owner, true);
        let v2 = create_test_video(&test_id(3), &owner, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[v1.clone(), v2.clone()]])
                .append_query_results([vec![
                    maplit::btreemap! {
                        "target_id" => sea_orm::Value::String(Some(Box::new(v1.id.clone()))),
                        "count" => sea_orm::Value::BigInt(Some(3)),
                    },
                    maplit::btreemap! {
                        "target_id" => sea_orm::Value::String(Some(Box::new(v2.id.clone()))),
                        "count" => sea_orm::Value::BigInt(Some(2)),
                    },
                ]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                .append_query_results([[maplit::btreemap! {
                    "total" => sea_orm::Value::BigInt(Some(20))
                }]])
                .into_connection(),
        );

        let service = DashboardService::new(
            VideoRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            SubscriptionRepository::new(db),
        );

        let stats = service.stats(&owner).await.unwrap();
        assert_eq!(
            stats,
            ChannelStats {
                total_subscribers: 7,
                total_likes: 5,
                total_views: 20,
                total_videos: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_videos_include_unpublished() {
        let owner = test_id(1);
        let hidden = create_test_video(&test_id(2), &owner, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[hidden.clone()]])
                .append_query_results([Vec::<std::collections::BTreeMap<&str, sea_orm::Value>>::new()])
                .into_connection(),
        );

        let service = DashboardService::new(
            VideoRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            SubscriptionRepository::new(db),
        );

        let videos = service.videos(&owner).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert!(!videos[0].video.is_published);
        assert_eq!(videos[0].likes_count, 0);

        let json = serde_json::to_value(&videos[0]).unwrap();
        assert_eq!(json["likesCount"], 0);
        assert_eq!(json["isPublished"], false);
    }
}
