use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CriterionClass, CurationColumn, TagSet};

/// Schema of one resource lookup table, resolved once at load time from its
/// `_lookup_`/`_curation_` headers.
///
/// `criterion` is the class the table applies to (the prefix shared by its
/// lookup columns); `lookup_fields` are the instance field names joined on;
/// `tag_fields` are the names of the set-valued curation outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub criterion: CriterionClass,
    pub lookup_fields: Vec<String>,
    pub tag_fields: Vec<String>,
}

/// One row of a resource lookup table.
///
/// `keys` holds the already-normalized lookup values per lookup field;
/// `tags` holds one tag set per curation column. `move_to` redirects the
/// curation output to another criterion's namespace, keeping the tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRow {
    pub keys: BTreeMap<String, String>,
    pub tags: BTreeMap<CurationColumn, TagSet>,
    pub move_to: Option<CriterionClass>,
}

/// A named resource lookup table. Immutable once loaded; the curation engine
/// never writes back into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTable {
    pub name: String,
    pub schema: ResourceSchema,
    pub rows: Vec<ResourceRow>,
}
