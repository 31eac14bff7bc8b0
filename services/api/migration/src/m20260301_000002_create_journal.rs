use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(JournalEntries::Title).string().not_null())
                    .col(ColumnDef::new(JournalEntries::Entry).text().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalEntries::Table, JournalEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_user_updated")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::UserId)
                    .col(JournalEntries::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserTags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserTags::UserId).integer().not_null())
                    .col(ColumnDef::new(UserTags::Tag).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserTags::Table, UserTags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("uq_user_tags_user_tag")
                            .unique()
                            .col(UserTags::UserId)
                            .col(UserTags::Tag),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntryTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntryTags::JournalEntryId).integer().not_null())
                    .col(ColumnDef::new(JournalEntryTags::UserTagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(JournalEntryTags::JournalEntryId)
                            .col(JournalEntryTags::UserTagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalEntryTags::Table, JournalEntryTags::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalEntryTags::Table, JournalEntryTags::UserTagId)
                            .to(UserTags::Table, UserTags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalEntryTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum JournalEntries {
    Table,
    Id,
    UserId,
    Title,
    Entry,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserTags {
    Table,
    Id,
    UserId,
    Tag,
}

#[derive(Iden)]
enum JournalEntryTags {
    Table,
    JournalEntryId,
    UserTagId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
