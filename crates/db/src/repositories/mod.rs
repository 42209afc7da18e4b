//! Repositories: the only code that talks to the database.

mod comment;
mod like;
mod playlist;
mod subscription;
mod tweet;
mod user;
mod video;

pub use comment::CommentRepository;
pub use like::{LikeRepository, LikeTarget};
pub use playlist::PlaylistRepository;
pub use subscription::SubscriptionRepository;
pub use tweet::TweetRepository;
pub use user::UserRepository;
pub use video::{VideoQuery, VideoRepository, VideoSortField};
