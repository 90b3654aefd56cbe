use sea_orm_migration::{prelude::*, schema::*};

use super::m20261016_000003_create_comment_table::Comment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommentClosure::Table)
                    .col(integer(CommentClosure::AncestorId))
                    .col(integer(CommentClosure::DescendantId))
                    .col(integer(CommentClosure::Depth))
                    // One depth per ordered pair; inserts rely on this for ON CONFLICT
                    .index(
                        Index::create()
                            .primary()
                            .col(CommentClosure::AncestorId)
                            .col(CommentClosure::DescendantId),
                    )
                    .check(Expr::col(CommentClosure::Depth).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment_closure-ancestor_id")
                            .from(CommentClosure::Table, CommentClosure::AncestorId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment_closure-descendant_id")
                            .from(CommentClosure::Table, CommentClosure::DescendantId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Ancestor lookups for a new reply go through the descendant side
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_closure_descendant_depth")
                    .table(CommentClosure::Table)
                    .col(CommentClosure::DescendantId)
                    .col(CommentClosure::Depth)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentClosure::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CommentClosure {
    Table,
    AncestorId,
    DescendantId,
    Depth,
}
