//! Models for the lectionary content tables.

use crate::error::ValidationError;
use crate::registry::{ColumnType as C, ModelDef, Registry, Table};

pub fn registry() -> Result<Registry, ValidationError> {
    Registry::new(vec![
        ModelDef::new("version", Table::serial("versions"))
            .column("code", C::Text)
            .column("title", C::Text),
        ModelDef::new("permission", Table::serial("permissions")).column("title", C::Text),
        ModelDef::new("group", Table::serial("groups")).column("name", C::Text),
        ModelDef::new("reading_day", Table::serial("reading_days"))
            .column("date", C::Date)
            .column("name", C::Text)
            .has_many("questions", "question", "reading_day_id")
            .has_many("readings", "reading", "reading_day_id")
            .has_many("directions", "direction", "reading_day_id"),
        ModelDef::new("question", Table::serial("questions"))
            .column("seq", C::Integer)
            .column("text", C::Text),
        ModelDef::new("reading", Table::serial("readings"))
            .column("seq", C::Integer)
            .column("std_ref", C::Text)
            .column("osis_ref", C::Text)
            .has_many("directions", "direction", "reading_id"),
        ModelDef::new("practice", Table::serial("practices"))
            .column("title", C::Text)
            .column("summary", C::Text)
            .column("description", C::Text)
            .column("info_url", C::Text),
        ModelDef::new("direction", Table::serial("directions"))
            .column("seq", C::Integer)
            .belongs_to("practice", "practice", "practice_id")
            .has_many("steps", "step", "direction_id"),
        ModelDef::new("step", Table::serial("steps"))
            .column("seq", C::Integer)
            .column("description", C::Text)
            .many_to_many("resources", "resource", "step_resources", "step_id", "resource_id"),
        ModelDef::new("resource_type", Table::serial("resource_types"))
            .column("title", C::Text)
            .column("icon", C::Text),
        ModelDef::new("resource", Table::uuid("resources"))
            .column("caption", C::Text)
            .column("copyright_year", C::Text)
            .column("copyright_owner", C::Text)
            .column("details", C::Json)
            .belongs_to("type", "resource_type", "resource_type_id")
            .many_to_many("tags", "tag", "resource_tags", "resource_id", "tag_id"),
        ModelDef::new("tag", Table::serial("tags")).column("title", C::Text),
    ])
}
