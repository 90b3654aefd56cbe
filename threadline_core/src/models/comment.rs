use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseTransaction, JoinType};
use serde::{Deserialize, Serialize};

use crate::{
    content::ContentRef,
    entity::{comment::Entity as CommentEntity, comment_closure, prelude::*},
    error::CommentError,
    ids::{AuthorId, CommentId},
    models::{closure, registry},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: ContentRef,
    pub author_id: AuthorId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CommentModel> for Comment {
    type Error = CommentError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        let content = ContentRef::from_columns(model.post_id, model.forum_id).ok_or_else(|| {
            CommentError::CorruptRow {
                id: model.id,
                reason: "exactly one of post_id / forum_id must be set".to_string(),
            }
        })?;

        let created_at = DateTime::parse_from_rfc3339(&model.created_at)
            .map_err(|e| CommentError::CorruptRow {
                id: model.id,
                reason: format!("created_at: {e}"),
            })?
            .with_timezone(&Utc);

        Ok(Comment {
            id: model.id,
            content,
            author_id: model.author_id,
            text: model.text,
            created_at,
        })
    }
}

/// A comment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: ContentRef,
    pub author_id: AuthorId,
    pub text: String,
    /// `None` starts a new thread on the content.
    pub parent_id: Option<CommentId>,
}

pub async fn find<C>(id: CommentId, conn: &C) -> Result<Option<Comment>, CommentError>
where
    C: ConnectionTrait,
{
    CommentEntity::find_by_id(id)
        .one(conn)
        .await?
        .map(Comment::try_from)
        .transpose()
}

/// The comments `id` replies under, parent first and thread root last.
///
/// One join against the closure table; an unknown or top-level `id` yields
/// an empty chain.
pub async fn ancestors<C>(id: CommentId, conn: &C) -> Result<Vec<Comment>, CommentError>
where
    C: ConnectionTrait,
{
    CommentEntity::find()
        .join(
            JoinType::InnerJoin,
            comment_closure::Relation::Ancestor.def().rev(),
        )
        .filter(CommentClosureColumn::DescendantId.eq(id))
        .filter(CommentClosureColumn::Depth.gt(0))
        .order_by_asc(CommentClosureColumn::Depth)
        .all(conn)
        .await?
        .into_iter()
        .map(Comment::try_from)
        .collect()
}

pub async fn count_for_content<C>(content: &ContentRef, conn: &C) -> Result<u64, CommentError>
where
    C: ConnectionTrait,
{
    let count = match content {
        ContentRef::Post(id) => {
            CommentEntity::find()
                .filter(CommentColumn::PostId.eq(*id))
                .count(conn)
                .await?
        }
        ContentRef::Forum(id) => {
            CommentEntity::find()
                .filter(CommentColumn::ForumId.eq(*id))
                .count(conn)
                .await?
        }
    };

    Ok(count)
}

/// Stores a new comment and the closure paths that place it in its thread.
///
/// Everything is validated before the first write. Taking the transaction
/// rather than any connection keeps the comment row and its closure rows
/// committed or rolled back together.
pub async fn append(new: NewComment, txn: &DatabaseTransaction) -> Result<Comment, CommentError> {
    check_preconditions(&new, txn).await?;

    let comment = insert(&new, txn).await?;
    let written = closure::extend(comment.id, new.parent_id, txn).await?;

    tracing::debug!(
        comment_id = %comment.id,
        parent_id = ?new.parent_id,
        paths = written,
        "extended comment closure"
    );

    Ok(comment)
}

async fn check_preconditions<C>(new: &NewComment, conn: &C) -> Result<(), CommentError>
where
    C: ConnectionTrait,
{
    if new.text.trim().is_empty() {
        return Err(CommentError::EmptyText);
    }

    if !registry::exists(&new.content, conn).await? {
        return Err(CommentError::ContentNotFound(new.content));
    }

    if let Some(parent_id) = new.parent_id {
        let parent = find(parent_id, conn)
            .await?
            .ok_or(CommentError::ParentNotFound(parent_id))?;

        if parent.content != new.content {
            return Err(CommentError::ParentContentMismatch {
                parent: parent_id,
                parent_content: parent.content,
                content: new.content,
            });
        }
    }

    Ok(())
}

/// Writes the bare comment row. No validation, no closure rows.
pub(crate) async fn insert<C>(new: &NewComment, conn: &C) -> Result<Comment, CommentError>
where
    C: ConnectionTrait,
{
    let comment = CommentActiveModel {
        id: NotSet,
        post_id: Set(new.content.post_id()),
        forum_id: Set(new.content.forum_id()),
        author_id: Set(new.author_id),
        text: Set(new.text.clone()),
        created_at: Set(Utc::now().to_rfc3339()),
    };

    let model = CommentEntity::insert(comment)
        .exec_with_returning(conn)
        .await?;

    Comment::try_from(model)
}
