//! Create link table migration.

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
                    .table(Link::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Link::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Link::Url).text().not_null())
                    .col(ColumnDef::new(Link::Title).text().not_null())
                    .col(ColumnDef::new(Link::Platform).string_len(32).not_null())
                    .col(ColumnDef::new(Link::ThumbnailUrl).text())
                    .col(
                        ColumnDef::new(Link::Category)
                            .string_len(64)
                            .not_null()
                            .default("Uncategorized"),
                    )
                    .col(ColumnDef::new(Link::Duration).integer())
                    .col(ColumnDef::new(Link::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Link::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Link::LastViewed)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Link::Metadata).json_binary())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_user")
                            .from(Link::Table, Link::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: url (cache lookup across users)
        manager
            .create_index(
                Index::create()
                    .name("idx_link_url")
                    .table(Link::Table)
                    .col(Link::Url)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, url) - duplicate check, not unique on purpose
        manager
            .create_index(
                Index::create()
                    .name("idx_link_user_id_url")
                    .table(Link::Table)
                    .col(Link::UserId)
                    .col(Link::Url)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, last_viewed) - recent list
        manager
            .create_index(
                Index::create()
                    .name("idx_link_user_id_last_viewed")
                    .table(Link::Table)
                    .col(Link::UserId)
                    .col(Link::LastViewed)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, platform)
        manager
            .create_index(
                Index::create()
                    .name("idx_link_user_id_platform")
                    .table(Link::Table)
                    .col(Link::UserId)
                    .col(Link::Platform)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Link {
    Table,
    Id,
    Url,
    Title,
    Platform,
    ThumbnailUrl,
    Category,
    Duration,
    UserId,
    CreatedAt,
    LastViewed,
    Metadata,
}
