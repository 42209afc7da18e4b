//! Read models returned by list and detail operations.
//!
//! Users only ever leave the server through [`OwnerSummary`] or
//! [`ChannelSummary`], so credentials are never serialized.

use std::collections::HashMap;

use serde::Serialize;
use videotube_common::AppResult;
use videotube_db::{
    entities::{user, video},
    repositories::UserRepository,
};

/// Public identity of a record's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

impl From<&user::Model> for OwnerSummary {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            full_name: u.full_name.clone(),
            avatar: u.avatar.clone(),
        }
    }
}

/// A channel as seen by the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
    pub subscribers_count: u64,
    pub is_subscribed: bool,
}

impl ChannelSummary {
    #[must_use]
    pub fn new(u: &user::Model, subscribers_count: u64, is_subscribed: bool) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            full_name: u.full_name.clone(),
            avatar: u.avatar.clone(),
            subscribers_count,
            is_subscribed,
        }
    }
}

/// A video in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: Option<OwnerSummary>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl VideoSummary {
    #[must_use]
    pub fn new(v: video::Model, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: v.id,
            video_file: v.video_file,
            thumbnail: v.thumbnail,
            title: v.title,
            description: v.description,
            duration: v.duration,
            views: v.views,
            is_published: v.is_published,
            owner,
            created_at: v.created_at.to_rfc3339(),
            updated_at: v.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Fetch the owners of a batch of records, keyed by user ID.
pub(crate) async fn load_owners(
    user_repo: &UserRepository,
    owner_ids: impl IntoIterator<Item = &str>,
) -> AppResult<HashMap<String, OwnerSummary>> {
    let mut ids: Vec<String> = owner_ids.into_iter().map(str::to_string).collect();
    ids.sort_unstable();
    ids.dedup();

    let users = user_repo.find_by_ids(&ids).await?;
    Ok(users
        .iter()
        .map(|u| (u.id.clone(), OwnerSummary::from(u)))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_user() -> user::Model {
        user::Model {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice".to_string(),
            avatar: "/media/alice.png".to_string(),
            cover_image: None,
            password_hash: "secret-hash".to_string(),
            token: Some("secret-token".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_owner_summary_exposes_only_public_fields() {
        let json = serde_json::to_value(OwnerSummary::from(&create_test_user())).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        assert_eq!(obj["fullName"], "Alice");
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn test_channel_summary_camel_case() {
        let json = serde_json::to_value(ChannelSummary::new(&create_test_user(), 3, true)).unwrap();
        assert_eq!(json["subscribersCount"], 3);
        assert_eq!(json["isSubscribed"], true);
    }
}
