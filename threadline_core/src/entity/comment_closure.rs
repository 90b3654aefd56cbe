use crate::ids::CommentId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One reachability fact of the reply relation: `descendant_id` is `depth`
/// replies below `ancestor_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment_closure")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ancestor_id: CommentId,
    #[sea_orm(primary_key, auto_increment = false)]
    pub descendant_id: CommentId,
    pub depth: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::AncestorId",
        to = "super::comment::Column::Id"
    )]
    Ancestor,
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::DescendantId",
        to = "super::comment::Column::Id"
    )]
    Descendant,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Descendant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_self_path(&self) -> bool {
        self.ancestor_id == self.descendant_id && self.depth == 0
    }

    pub fn is_direct_reply(&self) -> bool {
        self.depth == 1
    }
}
