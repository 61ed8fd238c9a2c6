//! Custom tab entity - a user-defined folder of links.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Custom tab entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_tab")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owner.
    pub user_id: i32,

    /// Tab name, unique per user.
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::link_tab::Entity")]
    LinkTabs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::link_tab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkTabs.def()
    }
}

impl Related<super::link::Entity> for Entity {
    fn to() -> RelationDef {
        super::link_tab::Relation::Link.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::link_tab::Relation::CustomTab.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
