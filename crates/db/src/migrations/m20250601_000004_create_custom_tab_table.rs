//! Create custom_tab table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomTab::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomTab::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomTab::UserId).integer().not_null())
                    .col(ColumnDef::new(CustomTab::Name).string_len(64).not_null())
                    .col(ColumnDef::new(CustomTab::Description).text())
                    .col(
                        ColumnDef::new(CustomTab::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_custom_tab_user")
                            .from(CustomTab::Table, CustomTab::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, name)
        manager
            .create_index(
                Index::create()
                    .name("idx_custom_tab_user_id_name")
                    .table(CustomTab::Table)
                    .col(CustomTab::UserId)
                    .col(CustomTab::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomTab::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CustomTab {
    Table,
    Id,
    UserId,
    Name,
    Description,
    CreatedAt,
}
