//! Playlist entity - an ordered collection of videos created by a user.

use sea_orm::entity::prelude::*;

/// Playlist entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "playlist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who created the playlist.
    pub owner_id: String,

    /// Playlist name.
    pub name: String,

    /// Playlist description (empty when not given).
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// When the playlist was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the playlist was last updated.
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::playlist_video::Entity")]
    PlaylistVideos,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::playlist_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaylistVideos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
