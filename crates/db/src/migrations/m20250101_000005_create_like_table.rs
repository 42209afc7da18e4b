//! Create like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Like::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Like::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Like::VideoId).string_len(32))
                    .col(ColumnDef::new(Like::CommentId).string_len(32))
                    .col(ColumnDef::new(Like::TweetId).string_len(32))
                    .col(ColumnDef::new(Like::LikedBy).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Like::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Exactly one like target per row
                    .check(Expr::cust(
                        "num_nonnulls(video_id, comment_id, tweet_id) = 1",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_user")
                            .from(Like::Table, Like::LikedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_video")
                            .from(Like::Table, Like::VideoId)
                            .to(Video::Table, Video::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_comment")
                            .from(Like::Table, Like::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_tweet")
                            .from(Like::Table, Like::TweetId)
                            .to(Tweet::Table, Tweet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No unique (target, liked_by) index: the toggle is check-then-act.
        for (name, column) in [
            ("idx_like_video_id", Like::VideoId),
            ("idx_like_comment_id", Like::CommentId),
            ("idx_like_tweet_id", Like::TweetId),
            ("idx_like_liked_by", Like::LikedBy),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Like::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Like::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Like {
    Table,
    Id,
    VideoId,
    CommentId,
    TweetId,
    LikedBy,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}

#[derive(Iden)]
enum Tweet {
    Table,
    Id,
}
