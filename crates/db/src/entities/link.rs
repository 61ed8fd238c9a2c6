//! Link entity - a saved short-form video (or other) URL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Link entity.
///
/// `url` is deliberately not unique: the same URL may be saved by several
/// users, or twice by one user when forced. It doubles as the cache key for
/// reusing classifier output.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    /// Platform tag (`tiktok`, `youtube`, ...).
    pub platform: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail_url: Option<String>,

    pub category: String,

    /// Duration in seconds, when the classifier reported one.
    #[sea_orm(nullable)]
    pub duration: Option<i32>,

    /// Owner.
    pub user_id: i32,

    pub created_at: DateTimeWithTimeZone,

    pub last_viewed: DateTimeWithTimeZone,

    /// Classifier output (`{title, category, tags, duration}`), reused by
    /// later submissions of the same URL.
    #[sea_orm(nullable)]
    pub metadata: Option<Json>,
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
    #[sea_orm(has_many = "super::tag::Entity")]
    Tags,
    #[sea_orm(has_many = "super::link_tab::Entity")]
    LinkTabs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::link_tab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkTabs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
