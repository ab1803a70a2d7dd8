//! Create reservations table
//!
//! Ids use AUTOINCREMENT so a deleted id is never handed out again.
//! The theme FK must keep the default NO ACTION: SQLite reports RESTRICT
//! as code 1811, which is not classified as a FK violation.
//! The per-theme slot index is always present; the stricter global
//! index is installed by the repository provider when configured.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_themes::Themes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::Date).date().not_null())
                    .col(ColumnDef::new(Reservations::Time).time().not_null())
                    .col(ColumnDef::new(Reservations::Name).string().not_null())
                    .col(ColumnDef::new(Reservations::ThemeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_theme")
                            .from(Reservations::Table, Reservations::ThemeId)
                            .to(Themes::Table, Themes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_slot_theme")
                    .table(Reservations::Table)
                    .col(Reservations::Date)
                    .col(Reservations::Time)
                    .col(Reservations::ThemeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_theme")
                    .table(Reservations::Table)
                    .col(Reservations::ThemeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    Date,
    Time,
    Name,
    ThemeId,
}
