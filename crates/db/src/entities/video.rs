//! Video entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The uploading user
    pub owner_id: String,

    /// Public URL of the video file
    pub video_file: String,

    /// Storage key of the video file
    pub video_file_key: String,

    /// Public URL of the thumbnail
    pub thumbnail: String,

    /// Storage key of the thumbnail
    pub thumbnail_key: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Length in seconds
    pub duration: f64,

    /// Incremented on every detail fetch
    #[sea_orm(default_value = 0)]
    pub views: i64,

    #[sea_orm(default_value = false)]
    pub is_published: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
