//! Fixtures shared by the service tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use sea_orm::DatabaseConnection;
use videotube_common::{AppResult, StorageBackend, UploadedFile};
use videotube_db::entities::{user, video};

/// A well-formed identifier that sorts by `n`.
pub fn test_id(n: u32) -> String {
    format!("01j{n:023}")
}

/// SQL of every statement the mock connection received, in order.
///
/// Every service holding the connection must be dropped first.
pub fn logged_sql(db: Arc<DatabaseConnection>) -> Vec<String> {
    Arc::try_unwrap(db)
        .ok()
        .unwrap()
        .into_transaction_log()
        .iter()
        .flat_map(|t| t.statements().iter().map(|s| s.sql.clone()))
        .collect()
}

pub fn create_test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: username.to_uppercase(),
        avatar: format!("/media/{username}.png"),
        cover_image: None,
        password_hash: "hash".to_string(),
        token: Some(format!("token-{username}")),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn create_test_video(id: &str, owner_id: &str, published: bool) -> video::Model {
    video::Model {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        video_file: format!("/media/{id}.mp4"),
        video_file_key: format!("{id}.mp4"),
        thumbnail: format!("/media/{id}.png"),
        thumbnail_key: format!("{id}.png"),
        title: format!("Video {id}"),
        description: String::new(),
        duration: 30.0,
        views: 10,
        is_published: published,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// In-memory storage recording uploads and deletions.
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_uploads: bool,
}

#[async_trait::async_trait]
impl StorageBackend for MemoryStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        if self.fail_uploads {
            return Err(videotube_common::AppError::Storage("upload refused".to_string()));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: String::new(),
            duration: content_type.starts_with("video/").then_some(12.5),
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("/media/{key}")
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }
}
