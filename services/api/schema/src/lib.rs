//! sea-orm entities for the identity and journal tables.

pub mod journal_entries;
pub mod journal_entry_tags;
pub mod permissions;
pub mod user_permissions;
pub mod user_tags;
pub mod users;
pub mod versions;
