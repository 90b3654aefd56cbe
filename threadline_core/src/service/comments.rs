use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;
use zel_core::prelude::*;

use crate::{
    content::{ContentRef, ContentType},
    entity::prelude::{ForumModel, PostModel},
    error::CommentError,
    ids::{AuthorId, CommentId},
    models::{
        comment::{self, Comment, NewComment},
        registry,
        tree::{self, ThreadedComment},
    },
};

impl From<CommentError> for ResourceError {
    fn from(error: CommentError) -> Self {
        if error.is_storage() {
            ResourceError::infra(error)
        } else {
            ResourceError::app(error)
        }
    }
}

#[derive(Clone)]
pub struct CommentsService {
    db: DatabaseConnection,
}

impl CommentsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn _create_post(&self, title: String) -> Result<PostModel, CommentError> {
        Ok(registry::create_post(title, &self.db).await?)
    }

    pub async fn _create_forum(&self, title: String) -> Result<ForumModel, CommentError> {
        Ok(registry::create_forum(title, &self.db).await?)
    }

    /// Add a comment to a post or forum, optionally as a reply
    pub async fn _append_comment(
        &self,
        content: ContentRef,
        author_id: AuthorId,
        text: String,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, CommentError> {
        let new = NewComment {
            content,
            author_id,
            text,
            parent_id,
        };

        let txn = self.db.begin().await?;

        // Dropping the transaction on error rolls back the comment row too
        let comment = match comment::append(new, &txn).await {
            Ok(comment) => comment,
            Err(error) => {
                tracing::warn!(%content, ?parent_id, %error, "rejected comment");
                return Err(error);
            }
        };

        txn.commit().await?;

        tracing::info!(
            comment_id = %comment.id,
            %content,
            ?parent_id,
            "appended comment"
        );

        Ok(comment)
    }

    pub async fn _get_comment(&self, comment_id: CommentId) -> Result<Comment, CommentError> {
        comment::find(comment_id, &self.db)
            .await?
            .ok_or(CommentError::CommentNotFound(comment_id))
    }

    pub async fn _get_tree(
        &self,
        content: ContentRef,
    ) -> Result<Vec<ThreadedComment>, CommentError> {
        tree::get_tree(&content, &self.db).await
    }

    pub async fn _get_subtree(
        &self,
        comment_id: CommentId,
    ) -> Result<Vec<ThreadedComment>, CommentError> {
        tree::get_subtree(comment_id, &self.db).await
    }

    /// Parent first, thread root last
    pub async fn _list_ancestors(
        &self,
        comment_id: CommentId,
    ) -> Result<Vec<Comment>, CommentError> {
        // Confirms the comment exists so an unknown id is not an empty chain
        self._get_comment(comment_id).await?;

        comment::ancestors(comment_id, &self.db).await
    }

    pub async fn _count_comments(&self, content: ContentRef) -> Result<u64, CommentError> {
        comment::count_for_content(&content, &self.db).await
    }
}

#[zel_service(name = "comments")]
trait Comments {
    #[doc = "Register a post that comments can attach to"]
    #[method(name = "create_post")]
    async fn create_post(&self, title: String) -> Result<PostModel, ResourceError>;

    #[doc = "Register a forum that comments can attach to"]
    #[method(name = "create_forum")]
    async fn create_forum(&self, title: String) -> Result<ForumModel, ResourceError>;

    #[doc = "Add a comment to a post or forum; content_type is \"post\" or \"forum\""]
    #[method(name = "append_comment")]
    async fn append_comment(
        &self,
        content_type: String,
        content_id: Uuid,
        author_id: AuthorId,
        text: String,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, ResourceError>;

    #[doc = "Get a single comment by ID"]
    #[method(name = "get_comment")]
    async fn get_comment(&self, comment_id: CommentId) -> Result<Comment, ResourceError>;

    #[doc = "Get every comment on a post or forum in thread order"]
    #[method(name = "get_tree")]
    async fn get_tree(
        &self,
        content_id: Uuid,
        content_type: String,
    ) -> Result<Vec<ThreadedComment>, ResourceError>;

    #[doc = "Get a comment and all of its replies in thread order"]
    #[method(name = "get_subtree")]
    async fn get_subtree(&self, comment_id: CommentId)
        -> Result<Vec<ThreadedComment>, ResourceError>;

    #[doc = "List the comments a reply sits under, nearest first"]
    #[method(name = "list_ancestors")]
    async fn list_ancestors(&self, comment_id: CommentId) -> Result<Vec<Comment>, ResourceError>;

    #[doc = "Count comments on a post or forum"]
    #[method(name = "count_comments")]
    async fn count_comments(
        &self,
        content_id: Uuid,
        content_type: String,
    ) -> Result<u64, ResourceError>;
}

#[async_trait]
impl CommentsServer for CommentsService {
    async fn create_post(
        &self,
        _ctx: RequestContext,
        title: String,
    ) -> Result<PostModel, ResourceError> {
        Ok(self._create_post(title).await?)
    }

    async fn create_forum(
        &self,
        _ctx: RequestContext,
        title: String,
    ) -> Result<ForumModel, ResourceError> {
        Ok(self._create_forum(title).await?)
    }

    async fn append_comment(
        &self,
        _ctx: RequestContext,
        content_type: String,
        content_id: Uuid,
        author_id: AuthorId,
        text: String,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, ResourceError> {
        let content = ContentRef::parse(&content_type, content_id)?;
        Ok(self
            ._append_comment(content, author_id, text, parent_id)
            .await?)
    }

    async fn get_comment(
        &self,
        _ctx: RequestContext,
        comment_id: CommentId,
    ) -> Result<Comment, ResourceError> {
        Ok(self._get_comment(comment_id).await?)
    }

    async fn get_tree(
        &self,
        _ctx: RequestContext,
        content_id: Uuid,
        content_type: String,
    ) -> Result<Vec<ThreadedComment>, ResourceError> {
        let content = ContentRef::parse(&content_type, content_id)?;
        Ok(self._get_tree(content).await?)
    }

    async fn get_subtree(
        &self,
        _ctx: RequestContext,
        comment_id: CommentId,
    ) -> Result<Vec<ThreadedComment>, ResourceError> {
        Ok(self._get_subtree(comment_id).await?)
    }

    async fn list_ancestors(
        &self,
        _ctx: RequestContext,
        comment_id: CommentId,
    ) -> Result<Vec<Comment>, ResourceError> {
        Ok(self._list_ancestors(comment_id).await?)
    }

    async fn count_comments(
        &self,
        _ctx: RequestContext,
        content_id: Uuid,
        content_type: String,
    ) -> Result<u64, ResourceError> {
        let content_type: ContentType = content_type.parse()?;
        Ok(self
            ._count_comments(ContentRef::new(content_type, content_id))
            .await?)
    }
}
