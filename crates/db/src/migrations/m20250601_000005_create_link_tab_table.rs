//! Create link_tab table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000002_create_link_table::Link;
use super::m20250601_000004_create_custom_tab_table::CustomTab;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LinkTab::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkTab::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LinkTab::LinkId).integer().not_null())
                    .col(ColumnDef::new(LinkTab::TabId).integer().not_null())
                    .col(
                        ColumnDef::new(LinkTab::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_tab_link")
                            .from(LinkTab::Table, LinkTab::LinkId)
                            .to(Link::Table, Link::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_tab_tab")
                            .from(LinkTab::Table, LinkTab::TabId)
                            .to(CustomTab::Table, CustomTab::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (link_id, tab_id) - a link is in a tab at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_link_tab_unique")
                    .table(LinkTab::Table)
                    .col(LinkTab::LinkId)
                    .col(LinkTab::TabId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: tab_id (links in a tab)
        manager
            .create_index(
                Index::create()
                    .name("idx_link_tab_tab_id")
                    .table(LinkTab::Table)
                    .col(LinkTab::TabId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkTab::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LinkTab {
    Table,
    Id,
    LinkId,
    TabId,
    CreatedAt,
}
