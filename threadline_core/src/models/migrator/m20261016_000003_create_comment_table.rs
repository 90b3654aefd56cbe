use sea_orm_migration::{prelude::*, schema::*};

use super::m20261016_000001_create_post_table::Post;
use super::m20261016_000002_create_forum_table::Forum;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .col(pk_auto(Comment::Id))
                    .col(uuid_null(Comment::PostId))
                    .col(uuid_null(Comment::ForumId))
                    .col(uuid(Comment::AuthorId))
                    .col(text(Comment::Text))
                    .col(string(Comment::CreatedAt))
                    // A comment hangs off exactly one piece of content
                    .check(
                        Expr::col(Comment::PostId)
                            .is_not_null()
                            .and(Expr::col(Comment::ForumId).is_null())
                            .or(Expr::col(Comment::PostId)
                                .is_null()
                                .and(Expr::col(Comment::ForumId).is_not_null())),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-post_id")
                            .from(Comment::Table, Comment::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-forum_id")
                            .from(Comment::Table, Comment::ForumId)
                            .to(Forum::Table, Forum::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_post_id")
                    .table(Comment::Table)
                    .col(Comment::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_forum_id")
                    .table(Comment::Table)
                    .col(Comment::ForumId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Comment {
    Table,
    Id,
    PostId,
    ForumId,
    AuthorId,
    Text,
    CreatedAt,
}
