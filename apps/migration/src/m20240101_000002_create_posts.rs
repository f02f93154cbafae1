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
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Description).text().not_null())
                    .col(ColumnDef::new(Posts::Location).string().null())
                    .col(ColumnDef::new(Posts::Mood).integer().not_null())
                    .col(ColumnDef::new(Posts::Temperature).double().not_null())
                    .col(ColumnDef::new(Posts::PhotoUrl).string().not_null().default(""))
                    .col(ColumnDef::new(Posts::IsPublic).boolean().not_null())
                    .col(ColumnDef::new(Posts::IsApproved).boolean().not_null())
                    .col(ColumnDef::new(Posts::CreatedOn).date().not_null())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One post per owner per calendar day.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_user_day")
                    .table(Posts::Table)
                    .col(Posts::UserId)
                    .col(Posts::CreatedOn)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_visibility")
                    .table(Posts::Table)
                    .col(Posts::IsPublic)
                    .col(Posts::IsApproved)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    UserId,
    Description,
    Location,
    Mood,
    Temperature,
    PhotoUrl,
    IsPublic,
    IsApproved,
    CreatedOn,
    CreatedAt,
    UpdatedAt,
}
