use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "journal_entry_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub journal_entry_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id",
        on_delete = "Cascade"
    )]
    JournalEntry,
    #[sea_orm(
        belongs_to = "super::user_tags::Entity",
        from = "Column::UserTagId",
        to = "super::user_tags::Column::Id",
        on_delete = "Cascade"
    )]
    UserTag,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl Related<super::user_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
