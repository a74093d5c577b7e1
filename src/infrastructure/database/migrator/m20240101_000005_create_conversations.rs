//! Create conversations table
//!
//! A customer/staff pair may hold at most one OPEN conversation, enforced
//! with a partial unique index.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Conversations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Conversations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Conversations::UserId).integer().not_null())
                    .col(ColumnDef::new(Conversations::AdminId).integer().not_null())
                    .col(ColumnDef::new(Conversations::Object).string().not_null())
                    .col(
                        ColumnDef::new(Conversations::Status)
                            .string()
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(
                        ColumnDef::new(Conversations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Conversations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversations_user")
                            .from(Conversations::Table, Conversations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversations_admin")
                            .from(Conversations::Table, Conversations::AdminId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conversations_admin_status")
                    .table(Conversations::Table)
                    .col(Conversations::AdminId)
                    .col(Conversations::Status)
                    .to_owned(),
            )
            .await?;

        // sea-query has no portable partial index builder.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_conversations_open_pair \
                 ON conversations (user_id, admin_id) WHERE status = 'OPEN'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Conversations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Conversations {
    Table,
    Id,
    UserId,
    AdminId,
    Object,
    Status,
    CreatedAt,
    UpdatedAt,
}
