//! Create video table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Video::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Video::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Video::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(Video::VideoFile).string_len(1024).not_null())
                    .col(ColumnDef::new(Video::VideoFileKey).string_len(512).not_null())
                    .col(ColumnDef::new(Video::Thumbnail).string_len(1024).not_null())
                    .col(ColumnDef::new(Video::ThumbnailKey).string_len(512).not_null())
                    .col(ColumnDef::new(Video::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Video::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Video::Duration).double().not_null().default(0.0))
                    .col(ColumnDef::new(Video::Views).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Video::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Video::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Video::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_owner")
                            .from(Video::Table, Video::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (owner_id, created_at) for channel listings
        manager
            .create_index(
                Index::create()
                    .name("idx_video_owner_created")
                    .table(Video::Table)
                    .col(Video::OwnerId)
                    .col(Video::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: is_published (public listing filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_is_published")
                    .table(Video::Table)
                    .col(Video::IsPublished)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Video::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
    OwnerId,
    VideoFile,
    VideoFileKey,
    Thumbnail,
    ThumbnailKey,
    Title,
    Description,
    Duration,
    Views,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
