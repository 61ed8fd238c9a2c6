//! Link-tab membership (many-to-many join of link and custom tab).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "link_tab")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub link_id: i32,

    pub tab_id: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::link::Entity",
        from = "Column::LinkId",
        to = "super::link::Column::Id",
        on_delete = "Cascade"
    )]
    Link,
    #[sea_orm(
        belongs_to = "super::custom_tab::Entity",
        from = "Column::TabId",
        to = "super::custom_tab::Column::Id",
        on_delete = "Cascade"
    )]
    CustomTab,
}

impl Related<super::link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Link.def()
    }
}

impl Related<super::custom_tab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomTab.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
