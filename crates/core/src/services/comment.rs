//! Comment service.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use videotube_common::{AppError, AppResult, IdGenerator, PageRequest, Paginated, ensure_valid_id};
use videotube_db::{
    entities::comment,
    repositories::{CommentRepository, LikeRepository, LikeTarget, UserRepository, VideoRepository},
};

use crate::{
    validation::require_text,
    views::{OwnerSummary, load_owners},
};

/// Body of comment create and update requests.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub content: String,
}

/// A comment with its author and like state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub owner: Option<OwnerSummary>,
    pub likes_count: u64,
    pub is_liked: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Service for managing comments on videos.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        video_repo: VideoRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
            user_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Unpublished videos and their comments exist only for their owner.
    async fn ensure_video_visible(&self, viewer_id: &str, video_id: &str) -> AppResult<()> {
        self.video_repo
            .find_by_id(video_id)
            .await?
            .filter(|v| v.is_published || v.owner_id == viewer_id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        Ok(())
    }

    /// One page of a video's comments, newest first.
    pub async fn list_by_video(
        &self,
        viewer_id: &str,
        video_id: &str,
        page: PageRequest,
    ) -> AppResult<Paginated<CommentView>> {
        ensure_valid_id(video_id, "videoId")?;
        self.ensure_video_visible(viewer_id, video_id).await?;

        let comments = self.comment_repo.find_by_video(video_id, page).await?;
        let total = self.comment_repo.count_by_video(video_id).await?;

        let ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let owners = load_owners(&self.user_repo, comments.iter().map(|c| c.owner_id.as_str())).await?;
        let counts = self.like_repo.count_by_targets(LikeTarget::Comment, &ids).await?;
        let liked: HashSet<String> = self
            .like_repo
            .find_by_user_and_targets(viewer_id, LikeTarget::Comment, &ids)
            .await?
            .into_iter()
            .filter_map(|l| l.comment_id)
            .collect();

        tracing::debug!(video_id = %video_id, page = page.page, total, "Listed comments");

        Ok(Paginated::new(comments, total, page).map(|c| CommentView {
            owner: owners.get(&c.owner_id).cloned(),
            likes_count: counts.get(&c.id).copied().unwrap_or(0),
            is_liked: liked.contains(&c.id),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|u| u.to_rfc3339()),
            id: c.id,
            content: c.content,
        }))
    }

    /// Comment on a video.
    pub async fn create(
        &self,
        user_id: &str,
        video_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        ensure_valid_id(video_id, "videoId")?;
        require_text(&input.content, "content")?;
        input.validate()?;
        self.ensure_video_visible(user_id, video_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            video_id: Set(video_id.to_string()),
            owner_id: Set(user_id.to_string()),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::info!(comment_id = %comment.id, video_id = %video_id, "Comment created");
        Ok(comment)
    }

    async fn get_owned(&self, user_id: &str, comment_id: &str, action: &str) -> AppResult<comment::Model> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.owner_id != user_id {
            return Err(AppError::Forbidden(format!(
                "You are not allowed to {action} this comment"
            )));
        }

        Ok(comment)
    }

    /// Replace a comment's content.
    pub async fn update(
        &self,
        user_id: &str,
        comment_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        ensure_valid_id(comment_id, "commentId")?;
        require_text(&input.content, "content")?;
        input.validate()?;

        let comment = self.get_owned(user_id, comment_id, "update").await?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(input.content);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.comment_repo.update(active).await?;
        tracing::info!(comment_id = %comment_id, "Comment updated");
        Ok(updated)
    }

    /// Delete a comment together with its likes.
    pub async fn delete(&self, user_id: &str, comment_id: &str) -> AppResult<()> {
        ensure_valid_id(comment_id, "commentId")?;
        self.get_owned(user_id, comment_id, "delete").await?;

        self.like_repo
            .delete_by_targets(LikeTarget::Comment, &[comment_id.to_string()])
            .await?;
        self.comment_repo.delete(comment_id).await?;

        tracing::info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }
}
