// SeaORM entities for the content registry and the threaded comment store

pub mod comment;
pub mod comment_closure;
pub mod forum;
pub mod post;


pub mod prelude {
    // Re-export all entities for convenience
    pub use super::comment::{
        ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as Comment,
        Model as CommentModel,
    };
    pub use super::comment_closure::{
        ActiveModel as CommentClosureActiveModel, Column as CommentClosureColumn,
        Entity as CommentClosure, Model as CommentClosureModel,
    };
    pub use super::forum::{
        ActiveModel as ForumActiveModel, Column as ForumColumn, Entity as Forum,
        Model as ForumModel,
    };
    pub use super::post::{
        ActiveModel as PostActiveModel, Column as PostColumn, Entity as Post, Model as PostModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DatabaseTransaction,
        DbConn,
        // Common result types
        DbErr,

        // Core traits
        EntityTrait,
        ModelTrait,
        NotSet,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        Related,
        RelationTrait,
        // Active model helpers
        Set,
        TransactionTrait,
    };
}
