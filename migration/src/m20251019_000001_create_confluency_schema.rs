use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Microplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Microplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Microplates::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Microplates::Rows)
                            .integer()
                            .not_null()
                            .default(2)
                            .check(Expr::col(Microplates::Rows).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Microplates::Columns)
                            .integer()
                            .not_null()
                            .default(3)
                            .check(Expr::col(Microplates::Columns).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Microplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Bounds are validated by the API as well; these checks guard direct writes
        manager
            .create_table(
                Table::create()
                    .table(Measurements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Measurements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Measurements::MicroplateId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Measurements::Row)
                            .integer()
                            .not_null()
                            .check(Expr::col(Measurements::Row).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Measurements::Column)
                            .integer()
                            .not_null()
                            .check(Expr::col(Measurements::Column).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Measurements::ConfluencyPercentage)
                            .double()
                            .not_null()
                            .check(Expr::col(Measurements::ConfluencyPercentage).between(0, 100)),
                    )
                    .col(
                        ColumnDef::new(Measurements::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_measurements_microplate_id")
                            .from(Measurements::Table, Measurements::MicroplateId)
                            .to(Microplates::Table, Microplates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves both the latest-per-well and the well history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_measurements_well_timestamp")
                    .table(Measurements::Table)
                    .col(Measurements::MicroplateId)
                    .col(Measurements::Row)
                    .col(Measurements::Column)
                    .col(Measurements::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Measurements::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(Microplates::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Microplates {
    Table,
    Id,
    Name,
    Rows,
    Columns,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Measurements {
    Table,
    Id,
    MicroplateId,
    Row,
    Column,
    ConfluencyPercentage,
    Timestamp,
}
