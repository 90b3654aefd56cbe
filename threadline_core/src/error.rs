use sea_orm::DbErr;
use thiserror::Error;

use crate::{content::ContentRef, ids::CommentId};

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("invalid content type: {0:?}")]
    InvalidContentType(String),

    #[error("comment text is empty")]
    EmptyText,

    #[error("parent comment {0} not found")]
    ParentNotFound(CommentId),

    #[error("content {0} not found")]
    ContentNotFound(ContentRef),

    #[error("parent comment {parent} belongs to {parent_content}, not {content}")]
    ParentContentMismatch {
        parent: CommentId,
        parent_content: ContentRef,
        content: ContentRef,
    },

    #[error("comment {0} not found")]
    CommentNotFound(CommentId),

    /// A stored comment row that violates the schema's own invariants.
    #[error("corrupt comment row {id}: {reason}")]
    CorruptRow { id: CommentId, reason: String },

    #[error("storage error: {0}")]
    StorageError(#[from] DbErr),
}

impl CommentError {
    /// Failures of the persistence layer rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            CommentError::StorageError(_) | CommentError::CorruptRow { .. }
        )
    }
}
