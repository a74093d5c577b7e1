//! Create park_dates table
//!
//! One row per calendar day the park may be visited.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkDates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkDates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkDates::Day).date().not_null().unique_key())
                    .col(
                        ColumnDef::new(ParkDates::IsOpen)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ParkDates::OpenHour).time())
                    .col(ColumnDef::new(ParkDates::CloseHour).time())
                    .col(ColumnDef::new(ParkDates::Notes).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkDates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkDates {
    Table,
    Id,
    Day,
    IsOpen,
    OpenHour,
    CloseHour,
    Notes,
}
