use sea_orm::entity::prelude::*;

/// Free-form tag a user attaches to their own journal entries.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub tag: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::journal_entry_tags::Entity")]
    JournalEntryTags,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::journal_entry_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
