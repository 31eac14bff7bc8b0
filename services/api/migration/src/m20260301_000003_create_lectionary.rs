use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReadingDays::Table)
                    .if_not_exists()
                    .col(serial(ReadingDays::Id))
                    .col(ColumnDef::new(ReadingDays::Date).date().not_null())
                    .col(ColumnDef::new(ReadingDays::Name).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(serial(Questions::Id))
                    .col(ColumnDef::new(Questions::ReadingDayId).integer().not_null())
                    .col(ColumnDef::new(Questions::Seq).integer().not_null())
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::ReadingDayId)
                            .to(ReadingDays::Table, ReadingDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Readings::Table)
                    .if_not_exists()
                    .col(serial(Readings::Id))
                    .col(ColumnDef::new(Readings::ReadingDayId).integer().not_null())
                    .col(ColumnDef::new(Readings::Seq).integer().not_null())
                    .col(ColumnDef::new(Readings::StdRef).string())
                    .col(ColumnDef::new(Readings::OsisRef).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Readings::Table, Readings::ReadingDayId)
                            .to(ReadingDays::Table, ReadingDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Practices::Table)
                    .if_not_exists()
                    .col(serial(Practices::Id))
                    .col(ColumnDef::new(Practices::Title).string().not_null())
                    .col(ColumnDef::new(Practices::Summary).text())
                    .col(ColumnDef::new(Practices::Description).text())
                    .col(ColumnDef::new(Practices::InfoUrl).string())
                    .to_owned(),
            )
            .await?;

        // A direction hangs off either a whole reading day or a single reading.
        manager
            .create_table(
                Table::create()
                    .table(Directions::Table)
                    .if_not_exists()
                    .col(serial(Directions::Id))
                    .col(ColumnDef::new(Directions::ReadingDayId).integer())
                    .col(ColumnDef::new(Directions::ReadingId).integer())
                    .col(ColumnDef::new(Directions::PracticeId).integer())
                    .col(ColumnDef::new(Directions::Seq).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Directions::Table, Directions::ReadingDayId)
                            .to(ReadingDays::Table, ReadingDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Directions::Table, Directions::ReadingId)
                            .to(Readings::Table, Readings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Directions::Table, Directions::PracticeId)
                            .to(Practices::Table, Practices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Steps::Table)
                    .if_not_exists()
                    .col(serial(Steps::Id))
                    .col(ColumnDef::new(Steps::DirectionId).integer().not_null())
                    .col(ColumnDef::new(Steps::Seq).integer().not_null())
                    .col(ColumnDef::new(Steps::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Steps::Table, Steps::DirectionId)
                            .to(Directions::Table, Directions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Steps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Directions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Practices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Readings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReadingDays::Table).to_owned())
            .await
    }
}

fn serial<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[derive(Iden)]
enum ReadingDays {
    Table,
    Id,
    Date,
    Name,
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    ReadingDayId,
    Seq,
    Text,
}

#[derive(Iden)]
enum Readings {
    Table,
    Id,
    ReadingDayId,
    Seq,
    StdRef,
    OsisRef,
}

#[derive(Iden)]
enum Practices {
    Table,
    Id,
    Title,
    Summary,
    Description,
    InfoUrl,
}

#[derive(Iden)]
enum Directions {
    Table,
    Id,
    ReadingDayId,
    ReadingId,
    PracticeId,
    Seq,
}

#[derive(Iden)]
enum Steps {
    Table,
    Id,
    DirectionId,
    Seq,
    Description,
}
