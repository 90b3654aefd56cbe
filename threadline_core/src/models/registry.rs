//! Posts and forums, the content items comments attach to.
//!
//! Only identity matters here: comments need to know the content exists.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DbErr};

use crate::{
    content::ContentRef,
    entity::prelude::*,
    ids::{ForumId, PostId},
};

pub async fn create_post<C>(title: String, conn: &C) -> Result<PostModel, DbErr>
where
    C: ConnectionTrait,
{
    let post = PostActiveModel {
        id: Set(PostId::new()),
        title: Set(title),
        created_at: Set(Utc::now().to_rfc3339()),
    };

    Post::insert(post).exec_with_returning(conn).await
}

pub async fn create_forum<C>(title: String, conn: &C) -> Result<ForumModel, DbErr>
where
    C: ConnectionTrait,
{
    let forum = ForumActiveModel {
        id: Set(ForumId::new()),
        title: Set(title),
        created_at: Set(Utc::now().to_rfc3339()),
    };

    Forum::insert(forum).exec_with_returning(conn).await
}

pub async fn exists<C>(content: &ContentRef, conn: &C) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let found = match content {
        ContentRef::Post(id) => Post::find_by_id(*id).count(conn).await?,
        ContentRef::Forum(id) => Forum::find_by_id(*id).count(conn).await?,
    };

    Ok(found > 0)
}
