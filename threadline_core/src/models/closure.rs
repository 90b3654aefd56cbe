//! Maintenance of the `comment_closure` table.
//!
//! The table holds one row for every (ancestor, descendant) pair of the reply
//! relation, including each comment's `(id, id, 0)` self-path. A new comment
//! inherits every path that ends at its parent, one hop longer; the parent's
//! own self-path turns into the direct `(parent, child, 1)` edge. Rows are
//! only ever added.

use sea_orm::{sea_query::OnConflict, ConnectionTrait, DbErr};

use crate::{entity::prelude::*, error::CommentError, ids::CommentId};

/// Derives every path that has to exist once `new_id` is stored as a reply
/// whose parent is reached by `parent_paths` (all rows ending at the parent).
pub fn derive_paths(
    new_id: CommentId,
    parent_paths: &[CommentClosureModel],
) -> Vec<CommentClosureModel> {
    let mut paths = Vec::with_capacity(parent_paths.len() + 1);

    paths.push(CommentClosureModel {
        ancestor_id: new_id,
        descendant_id: new_id,
        depth: 0,
    });

    paths.extend(parent_paths.iter().map(|path| CommentClosureModel {
        ancestor_id: path.ancestor_id,
        descendant_id: new_id,
        depth: path.depth + 1,
    }));

    paths
}

/// Writes the closure rows for a freshly inserted comment.
///
/// Returns how many rows were actually written; pairs that already exist are
/// skipped, so replaying the same extension is harmless.
pub async fn extend<C>(
    new_id: CommentId,
    parent_id: Option<CommentId>,
    conn: &C,
) -> Result<u64, CommentError>
where
    C: ConnectionTrait,
{
    let parent_paths = match parent_id {
        Some(parent_id) => {
            let paths = paths_to(parent_id, conn).await?;
            // Every stored comment has at least its self-path
            if paths.is_empty() {
                return Err(CommentError::ParentNotFound(parent_id));
            }
            paths
        }
        None => Vec::new(),
    };

    let written = insert_if_absent(derive_paths(new_id, &parent_paths), conn).await?;
    Ok(written)
}

/// Inserts closure rows, ignoring any `(ancestor_id, descendant_id)` pair that
/// is already present.
pub async fn insert_if_absent<C>(paths: Vec<CommentClosureModel>, conn: &C) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    if paths.is_empty() {
        return Ok(0);
    }

    let rows = paths.into_iter().map(|path| CommentClosureActiveModel {
        ancestor_id: Set(path.ancestor_id),
        descendant_id: Set(path.descendant_id),
        depth: Set(path.depth),
    });

    CommentClosure::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                CommentClosureColumn::AncestorId,
                CommentClosureColumn::DescendantId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

/// All rows ending at `id`, self-path included, nearest first.
pub async fn paths_to<C>(id: CommentId, conn: &C) -> Result<Vec<CommentClosureModel>, DbErr>
where
    C: ConnectionTrait,
{
    CommentClosure::find()
        .filter(CommentClosureColumn::DescendantId.eq(id))
        .order_by_asc(CommentClosureColumn::Depth)
        .all(conn)
        .await
}

/// The chain of comments above `id`, from its parent up to the thread root.
pub async fn ancestors<C>(id: CommentId, conn: &C) -> Result<Vec<CommentClosureModel>, DbErr>
where
    C: ConnectionTrait,
{
    CommentClosure::find()
        .filter(CommentClosureColumn::DescendantId.eq(id))
        .filter(CommentClosureColumn::Depth.gt(0))
        .order_by_asc(CommentClosureColumn::Depth)
        .all(conn)
        .await
}

/// Every comment below `id`, ordered by distance and then creation.
pub async fn descendants<C>(id: CommentId, conn: &C) -> Result<Vec<CommentClosureModel>, DbErr>
where
    C: ConnectionTrait,
{
    CommentClosure::find()
        .filter(CommentClosureColumn::AncestorId.eq(id))
        .filter(CommentClosureColumn::Depth.gt(0))
        .order_by_asc(CommentClosureColumn::Depth)
        .order_by_asc(CommentClosureColumn::DescendantId)
        .all(conn)
        .await
}
