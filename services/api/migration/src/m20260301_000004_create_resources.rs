use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResourceTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResourceTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResourceTypes::Title).string().not_null())
                    .col(ColumnDef::new(ResourceTypes::Icon).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Resources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Resources::UserId).integer())
                    .col(ColumnDef::new(Resources::Caption).text().not_null())
                    .col(ColumnDef::new(Resources::CopyrightYear).string())
                    .col(ColumnDef::new(Resources::CopyrightOwner).string())
                    .col(ColumnDef::new(Resources::Details).json_binary())
                    .col(ColumnDef::new(Resources::ResourceTypeId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Resources::Table, Resources::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Resources::Table, Resources::ResourceTypeId)
                            .to(ResourceTypes::Table, ResourceTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StepResources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StepResources::StepId).integer().not_null())
                    .col(ColumnDef::new(StepResources::ResourceId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(StepResources::StepId)
                            .col(StepResources::ResourceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StepResources::Table, StepResources::StepId)
                            .to(Steps::Table, Steps::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StepResources::Table, StepResources::ResourceId)
                            .to(Resources::Table, Resources::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Title).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ResourceTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ResourceTags::ResourceId).uuid().not_null())
                    .col(ColumnDef::new(ResourceTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ResourceTags::ResourceId)
                            .col(ResourceTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ResourceTags::Table, ResourceTags::ResourceId)
                            .to(Resources::Table, Resources::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ResourceTags::Table, ResourceTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResourceTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StepResources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ResourceTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ResourceTypes {
    Table,
    Id,
    Title,
    Icon,
}

#[derive(Iden)]
enum Resources {
    Table,
    Id,
    UserId,
    Caption,
    CopyrightYear,
    CopyrightOwner,
    Details,
    ResourceTypeId,
}

#[derive(Iden)]
enum StepResources {
    Table,
    StepId,
    ResourceId,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Title,
}

#[derive(Iden)]
enum ResourceTags {
    Table,
    ResourceId,
    TagId,
}

#[derive(Iden)]
enum Steps {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
