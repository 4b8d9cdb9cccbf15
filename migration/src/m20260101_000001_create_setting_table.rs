use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Setting::Table)
                    .if_not_exists()
                    .col(pk_auto(Setting::Id))
                    .col(string(Setting::Scope))
                    .col(string(Setting::Name))
                    .col(text(Setting::Value))
                    .col(timestamp(Setting::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // One value per (scope, name)
        manager
            .create_index(
                Index::create()
                    .name("idx_setting_scope_name")
                    .table(Setting::Table)
                    .col(Setting::Scope)
                    .col(Setting::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_setting_scope_name")
                    .table(Setting::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Setting::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Setting {
    Table,
    Id,
    Scope,
    Name,
    Value,
    UpdatedAt,
}
