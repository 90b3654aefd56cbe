use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::{
    error::CommentError,
    ids::{ForumId, PostId},
};

/// The kinds of content a comment thread can hang off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Forum,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Forum => "forum",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CommentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ContentType::Post),
            "forum" => Ok(ContentType::Forum),
            other => Err(CommentError::InvalidContentType(other.to_owned())),
        }
    }
}

/// A resolved reference to the content item that owns a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ContentRef {
    Post(PostId),
    Forum(ForumId),
}

impl ContentRef {
    pub fn new(content_type: ContentType, id: Uuid) -> Self {
        match content_type {
            ContentType::Post => ContentRef::Post(PostId::from_uuid(id)),
            ContentType::Forum => ContentRef::Forum(ForumId::from_uuid(id)),
        }
    }

    /// Parses the wire pair `(content_type, content_id)` used by callers.
    pub fn parse(content_type: &str, id: Uuid) -> Result<Self, CommentError> {
        Ok(Self::new(content_type.parse()?, id))
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentRef::Post(_) => ContentType::Post,
            ContentRef::Forum(_) => ContentType::Forum,
        }
    }

    pub fn as_uuid(&self) -> &Uuid {
        match self {
            ContentRef::Post(id) => id.as_uuid(),
            ContentRef::Forum(id) => id.as_uuid(),
        }
    }

    pub fn post_id(&self) -> Option<PostId> {
        match self {
            ContentRef::Post(id) => Some(*id),
            ContentRef::Forum(_) => None,
        }
    }

    pub fn forum_id(&self) -> Option<ForumId> {
        match self {
            ContentRef::Forum(id) => Some(*id),
            ContentRef::Post(_) => None,
        }
    }

    /// Rebuilds the reference from the two mutually exclusive comment columns.
    pub fn from_columns(post_id: Option<PostId>, forum_id: Option<ForumId>) -> Option<Self> {
        match (post_id, forum_id) {
            (Some(post_id), None) => Some(ContentRef::Post(post_id)),
            (None, Some(forum_id)) => Some(ContentRef::Forum(forum_id)),
            _ => None,
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type(), self.as_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_content_types() {
        assert_eq!("post".parse::<ContentType>().unwrap(), ContentType::Post);
        assert_eq!("forum".parse::<ContentType>().unwrap(), ContentType::Forum);
    }

    #[test]
    fn rejects_unknown_content_type() {
        let err = "event".parse::<ContentType>().unwrap_err();
        assert!(matches!(err, CommentError::InvalidContentType(ref s) if s == "event"));

        // matching is exact, callers send lowercase literals
        assert!("Post".parse::<ContentType>().is_err());
    }

    #[test]
    fn content_ref_maps_onto_exclusive_columns() {
        let uuid = Uuid::now_v7();
        let content = ContentRef::parse("forum", uuid).unwrap();

        assert_eq!(content.post_id(), None);
        assert_eq!(content.forum_id(), Some(ForumId::from_uuid(uuid)));
        assert_eq!(
            ContentRef::from_columns(content.post_id(), content.forum_id()),
            Some(content)
        );
    }

    #[test]
    fn content_ref_rejects_ambiguous_columns() {
        assert_eq!(ContentRef::from_columns(None, None), None);
        assert_eq!(
            ContentRef::from_columns(Some(PostId::new()), Some(ForumId::new())),
            None
        );
    }

    #[test]
    fn content_ref_serializes_with_literal_type() {
        let uuid = Uuid::now_v7();
        let json = serde_json::to_value(ContentRef::new(ContentType::Post, uuid)).unwrap();
        assert_eq!(json["type"], "post");
        assert_eq!(json["id"], uuid.to_string());
    }
}
