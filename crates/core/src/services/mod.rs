//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod dashboard;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support;

pub use comment::{CommentInput, CommentService, CommentView};
pub use dashboard::{ChannelStats, DashboardService, DashboardVideo};
pub use like::{LikeService, LikedVideo};
pub use playlist::{PlaylistDetail, PlaylistInput, PlaylistService, PlaylistSummary, PlaylistWithVideos};
pub use subscription::{SubscribedChannel, SubscriptionService};
pub use tweet::{TweetInput, TweetService, TweetView};
pub use user::UserService;
pub use video::{
    MediaUpload, PublishVideoInput, UpdateVideoInput, VideoDetail, VideoListParams, VideoService,
};
