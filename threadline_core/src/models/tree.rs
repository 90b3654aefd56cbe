//! Whole-thread reads over the closure table.
//!
//! A thread comes back from a single statement: every root comment of the
//! content joined to all of its closure rows, with each comment's parent
//! taken from its depth-1 path. The flat rows are then put into thread order
//! (depth-first, siblings oldest first).

use std::collections::HashMap;

use sea_orm::{ConnectionTrait, FromQueryResult, Statement, Value};
use serde::{Deserialize, Serialize};

use crate::{
    content::ContentRef,
    error::CommentError,
    ids::{AuthorId, CommentId, ForumId, PostId},
    models::comment::Comment,
};

/// A comment positioned in its thread. `depth` 0 is a top-level comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadedComment {
    pub comment: Comment,
    pub depth: i32,
    pub parent_id: Option<CommentId>,
}

#[derive(Debug, FromQueryResult)]
struct TreeRow {
    id: CommentId,
    post_id: Option<PostId>,
    forum_id: Option<ForumId>,
    author_id: AuthorId,
    text: String,
    created_at: String,
    depth: i32,
    parent_id: Option<CommentId>,
}

const TREE_COLUMNS: &str = r#"
        c.id,
        c.post_id,
        c.forum_id,
        c.author_id,
        c.text,
        c.created_at,
        cl.depth AS depth,
        parent.ancestor_id AS parent_id
"#;

/// Every comment on `content` in thread order.
///
/// Content without comments, or content that does not exist, yields an
/// empty thread.
pub async fn get_tree<C>(
    content: &ContentRef,
    conn: &C,
) -> Result<Vec<ThreadedComment>, CommentError>
where
    C: ConnectionTrait,
{
    let (content_column, content_id): (&str, Value) = match content {
        ContentRef::Post(id) => ("post_id", (*id).into()),
        ContentRef::Forum(id) => ("forum_id", (*id).into()),
    };

    // Roots are the comments of the content that have no path leading in
    let sql = format!(
        r#"
      SELECT {TREE_COLUMNS}
      FROM comment root
      INNER JOIN comment_closure cl ON cl.ancestor_id = root.id
      INNER JOIN comment c ON c.id = cl.descendant_id
      LEFT JOIN comment_closure parent ON parent.descendant_id = c.id AND parent.depth = 1
      WHERE root.{content_column} = ?
        AND NOT EXISTS (
          SELECT 1 FROM comment_closure up
          WHERE up.descendant_id = root.id AND up.depth > 0
        )
      ORDER BY cl.depth ASC, c.id ASC
      "#
    );

    let rows = TreeRow::find_by_statement(Statement::from_sql_and_values(
        conn.get_database_backend(),
        sql,
        [content_id],
    ))
    .all(conn)
    .await?;

    tracing::debug!(%content, rows = rows.len(), "loaded comment tree");

    thread_order(rows)
}

/// `root_id` and everything below it, depths relative to `root_id`.
pub async fn get_subtree<C>(
    root_id: CommentId,
    conn: &C,
) -> Result<Vec<ThreadedComment>, CommentError>
where
    C: ConnectionTrait,
{
    let sql = format!(
        r#"
      SELECT {TREE_COLUMNS}
      FROM comment_closure cl
      INNER JOIN comment c ON c.id = cl.descendant_id
      LEFT JOIN comment_closure parent ON parent.descendant_id = c.id AND parent.depth = 1
      WHERE cl.ancestor_id = ?
      ORDER BY cl.depth ASC, c.id ASC
      "#
    );

    let rows = TreeRow::find_by_statement(Statement::from_sql_and_values(
        conn.get_database_backend(),
        sql,
        [root_id.into()],
    ))
    .all(conn)
    .await?;

    if rows.is_empty() {
        return Err(CommentError::CommentNotFound(root_id));
    }

    thread_order(rows)
}

/// Arranges rows sorted by `(depth, id)` into depth-first thread order.
fn thread_order(rows: Vec<TreeRow>) -> Result<Vec<ThreadedComment>, CommentError> {
    let total = rows.len();
    let mut roots = Vec::new();
    let mut children: HashMap<CommentId, Vec<ThreadedComment>> = HashMap::new();

    for row in rows {
        let node = row.into_threaded()?;
        match node.parent_id {
            // depth 0 is a root even when it has a parent outside the subtree
            Some(parent_id) if node.depth > 0 => {
                children.entry(parent_id).or_default().push(node)
            }
            _ => roots.push(node),
        }
    }

    let mut ordered = Vec::with_capacity(total);
    let mut stack: Vec<ThreadedComment> = roots.into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        if let Some(replies) = children.remove(&node.comment.id) {
            stack.extend(replies.into_iter().rev());
        }
        ordered.push(node);
    }

    if !children.is_empty() {
        tracing::warn!(
            orphans = children.values().map(Vec::len).sum::<usize>(),
            "comment rows whose parent is missing from the thread"
        );
    }

    Ok(ordered)
}

impl TreeRow {
    fn into_threaded(self) -> Result<ThreadedComment, CommentError> {
        let comment = Comment::try_from(crate::entity::comment::Model {
            id: self.id,
            post_id: self.post_id,
            forum_id: self.forum_id,
            author_id: self.author_id,
            text: self.text,
            created_at: self.created_at,
        })?;

        Ok(ThreadedComment {
            comment,
            depth: self.depth,
            parent_id: self.parent_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::prelude::{DatabaseConnection, TransactionTrait},
        models::{
            comment::{self, NewComment},
            registry, test_db,
        },
    };

    async fn reply(
        db: &DatabaseConnection,
        content: ContentRef,
        parent_id: Option<CommentId>,
        text: &str,
    ) -> CommentId {
        let txn = db.begin().await.unwrap();
        let comment = comment::append(
            NewComment {
                content,
                author_id: AuthorId::new(),
                text: text.to_string(),
                parent_id,
            },
            &txn,
        )
        .await
        .unwrap();
        txn.commit().await.unwrap();
        comment.id
    }

    fn shape(tree: &[ThreadedComment]) -> Vec<(&str, i32)> {
        tree.iter()
            .map(|node| (node.comment.text.as_str(), node.depth))
            .collect()
    }

    #[tokio::test]
    async fn returns_chain_in_order() {
        let db = test_db::setup().await;
        let post = ContentRef::Post(registry::create_post("P1".into(), &db).await.unwrap().id);

        let c1 = reply(&db, post, None, "C1").await;
        let c2 = reply(&db, post, Some(c1), "C2").await;
        reply(&db, post, Some(c2), "C3").await;

        let tree = get_tree(&post, &db).await.unwrap();
        assert_eq!(shape(&tree), vec![("C1", 0), ("C2", 1), ("C3", 2)]);
        assert_eq!(tree[0].parent_id, None);
        assert_eq!(tree[2].parent_id, Some(c2));
    }

    #[tokio::test]
    async fn orders_threads_depth_first_with_oldest_siblings_first() {
        let db = test_db::setup().await;
        let post = ContentRef::Post(registry::create_post("P1".into(), &db).await.unwrap().id);

        let a = reply(&db, post, None, "a").await;
        let b = reply(&db, post, None, "b").await;
        let a1 = reply(&db, post, Some(a), "a1").await;
        reply(&db, post, Some(b), "b1").await;
        let a2 = reply(&db, post, Some(a), "a2").await;
        reply(&db, post, Some(a1), "a1x").await;
        reply(&db, post, Some(a2), "a2x").await;

        let tree = get_tree(&post, &db).await.unwrap();
        assert_eq!(
            shape(&tree),
            vec![
                ("a", 0),
                ("a1", 1),
                ("a1x", 2),
                ("a2", 1),
                ("a2x", 2),
                ("b", 0),
                ("b1", 1),
            ]
        );
    }

    #[tokio::test]
    async fn keeps_content_items_apart() {
        let db = test_db::setup().await;
        let post = ContentRef::Post(registry::create_post("P1".into(), &db).await.unwrap().id);
        let forum = ContentRef::Forum(registry::create_forum("F1".into(), &db).await.unwrap().id);

        let on_post = reply(&db, post, None, "post root").await;
        reply(&db, post, Some(on_post), "post reply").await;
        reply(&db, forum, None, "forum root").await;

        let post_tree = get_tree(&post, &db).await.unwrap();
        assert_eq!(shape(&post_tree), vec![("post root", 0), ("post reply", 1)]);

        let forum_tree = get_tree(&forum, &db).await.unwrap();
        assert_eq!(shape(&forum_tree), vec![("forum root", 0)]);
        assert!(forum_tree.iter().all(|node| node.comment.content == forum));
    }

    #[tokio::test]
    async fn empty_content_has_empty_tree() {
        let db = test_db::setup().await;
        let post = ContentRef::Post(registry::create_post("P1".into(), &db).await.unwrap().id);

        assert!(get_tree(&post, &db).await.unwrap().is_empty());
        assert!(get_tree(&ContentRef::Forum(ForumId::new()), &db)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn subtree_is_relative_to_its_root() {
        let db = test_db::setup().await;
        let post = ContentRef::Post(registry::create_post("P1".into(), &db).await.unwrap().id);

        let c1 = reply(&db, post, None, "C1").await;
        let c2 = reply(&db, post, Some(c1), "C2").await;
        reply(&db, post, Some(c2), "C3").await;
        reply(&db, post, Some(c1), "C4").await;

        let subtree = get_subtree(c2, &db).await.unwrap();
        assert_eq!(shape(&subtree), vec![("C2", 0), ("C3", 1)]);
        // parent outside the subtree is still reported
        assert_eq!(subtree[0].parent_id, Some(c1));

        let missing = get_subtree(CommentId::from_i64(9999), &db).await;
        assert!(matches!(missing, Err(CommentError::CommentNotFound(_))));
    }
}
