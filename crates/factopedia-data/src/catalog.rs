//! The catalog: every typed record of one payload, keyed by name.
//!
//! Records refer to each other by name only. Derived properties take the
//! catalog and resolve names when asked; an unknown name is a
//! [`CatalogError::MissingReference`] at that point, never at build time.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::entity::{Entity, HAND_CRAFTING};
use crate::hierarchy::{ENTITY_TYPES, ITEM_TYPES};
use crate::item::Item;
use crate::loader::DataLoadError;
use crate::locale::LocaleTable;
use crate::recipe::Recipe;
use crate::record::{display_order, Group, Record, RecordBase, Subgroup};
use crate::schema::Payload;
use crate::tech::Tech;

const GROUP_TABLE: &str = "item-group";
const SUBGROUP_TABLE: &str = "item-subgroup";
const RECIPE_TABLE: &str = "recipe";
const TECH_TABLE: &str = "technology";

// ===========================================================================
// Errors
// ===========================================================================

/// A by-name reference that could not be followed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No record of that kind has the name.
    #[error("no {kind} named '{name}'")]
    MissingReference { kind: &'static str, name: String },

    /// The record lacks a raw field the derived property needs.
    #[error("{kind} '{name}' has no '{field}'")]
    MissingField {
        kind: String,
        name: String,
        field: &'static str,
    },
}

fn require<'c, V>(
    table: &'c BTreeMap<String, V>,
    kind: &'static str,
    name: &str,
) -> Result<&'c V, CatalogError> {
    table.get(name).ok_or_else(|| CatalogError::MissingReference {
        kind,
        name: name.to_string(),
    })
}

// ===========================================================================
// Catalog
// ===========================================================================

/// Immutable object graph built from one payload.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: BTreeMap<String, Item>,
    entities: BTreeMap<String, Entity>,
    recipes: BTreeMap<String, Recipe>,
    groups: BTreeMap<String, Group>,
    subgroups: BTreeMap<String, Subgroup>,
    techs: BTreeMap<String, Tech>,
    locale: LocaleTable,
    mod_versions: BTreeMap<String, Option<String>>,
    character: Entity,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, DataLoadError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, DataLoadError> {
        Self::from_value(serde_json::from_slice(json)?)
    }

    /// Build from a parsed payload. Anything but a JSON object is a
    /// [`DataLoadError::Json`] error.
    pub fn from_value(value: Value) -> Result<Self, DataLoadError> {
        if !value.is_object() {
            return Err(DataLoadError::Json(<serde_json::Error as serde::de::Error>::custom(
                "payload must be a JSON object",
            )));
        }
        Self::from_payload(serde_json::from_value(value)?)
    }

    /// Build every table from a payload.
    ///
    /// All item-like raw tables merge into one item table, and all
    /// entity-like tables into one entity table; a later table silently
    /// replaces an earlier record of the same name.
    pub fn from_payload(payload: Payload) -> Result<Self, DataLoadError> {
        let Payload {
            raw,
            locale,
            mod_versions,
        } = payload;
        let mut raw = raw.ok_or(DataLoadError::MissingSection { section: "raw" })?;
        if !raw.contains_key(RECIPE_TABLE) {
            return Err(DataLoadError::MissingSection {
                section: RECIPE_TABLE,
            });
        }

        let mut items = BTreeMap::new();
        for &table in ITEM_TYPES {
            for (name, fields) in take_table(&mut raw, table)? {
                let item = Item::from_base(RecordBase::from_raw(&name, table, fields));
                if items.insert(name.clone(), item).is_some() {
                    tracing::debug!(%name, table, "item replaced by a later table");
                }
            }
        }

        let mut entities = BTreeMap::new();
        for &(table, class) in ENTITY_TYPES {
            for (name, fields) in take_table(&mut raw, table)? {
                let entity = Entity::from_base(RecordBase::from_raw(&name, table, fields), class);
                if entities.insert(name.clone(), entity).is_some() {
                    tracing::debug!(%name, table, "entity replaced by a later table");
                }
            }
        }

        let groups = take_table(&mut raw, GROUP_TABLE)?
            .into_iter()
            .map(|(name, fields)| {
                let group = Group::from_base(RecordBase::from_raw(&name, GROUP_TABLE, fields));
                (name, group)
            })
            .collect();

        let subgroups = take_table(&mut raw, SUBGROUP_TABLE)?
            .into_iter()
            .map(|(name, fields)| {
                let subgroup =
                    Subgroup::from_base(RecordBase::from_raw(&name, SUBGROUP_TABLE, fields));
                (name, subgroup)
            })
            .collect();

        let recipes = take_table(&mut raw, RECIPE_TABLE)?
            .into_iter()
            .map(|(name, fields)| {
                Recipe::from_raw(&name, RECIPE_TABLE, fields)
                    .map(|recipe| (name.clone(), recipe))
                    .map_err(|detail| malformed(RECIPE_TABLE, &name, detail))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let techs = take_table(&mut raw, TECH_TABLE)?
            .into_iter()
            .map(|(name, fields)| {
                Tech::from_raw(&name, TECH_TABLE, fields)
                    .map(|tech| (name.clone(), tech))
                    .map_err(|detail| malformed(TECH_TABLE, &name, detail))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let catalog = Self {
            items,
            entities,
            recipes,
            groups,
            subgroups,
            techs,
            locale,
            mod_versions,
            character: Entity::character(),
        };
        tracing::info!(
            items = catalog.items.len(),
            entities = catalog.entities.len(),
            recipes = catalog.recipes.len(),
            techs = catalog.techs.len(),
            languages = catalog.locale.languages().count(),
            "catalog built"
        );
        Ok(catalog)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn subgroup(&self, name: &str) -> Option<&Subgroup> {
        self.subgroups.get(name)
    }

    pub fn tech(&self, name: &str) -> Option<&Tech> {
        self.techs.get(name)
    }

    pub fn require_item(&self, name: &str) -> Result<&Item, CatalogError> {
        require(&self.items, "item", name)
    }

    pub fn require_entity(&self, name: &str) -> Result<&Entity, CatalogError> {
        require(&self.entities, "entity", name)
    }

    pub fn require_recipe(&self, name: &str) -> Result<&Recipe, CatalogError> {
        require(&self.recipes, "recipe", name)
    }

    pub fn require_group(&self, name: &str) -> Result<&Group, CatalogError> {
        require(&self.groups, "item group", name)
    }

    pub fn require_subgroup(&self, name: &str) -> Result<&Subgroup, CatalogError> {
        require(&self.subgroups, "item subgroup", name)
    }

    pub fn require_tech(&self, name: &str) -> Result<&Tech, CatalogError> {
        require(&self.techs, "technology", name)
    }

    // -----------------------------------------------------------------------
    // Tables (ascending by name)
    // -----------------------------------------------------------------------

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn subgroups(&self) -> impl Iterator<Item = &Subgroup> {
        self.subgroups.values()
    }

    pub fn techs(&self) -> impl Iterator<Item = &Tech> {
        self.techs.values()
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    /// Groups in display order.
    pub fn groups_sorted(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by(|a, b| display_order(&a.order, a.name(), &b.order, b.name()));
        groups
    }

    /// Every entity that can craft recipes of `category`. The character
    /// leads the list for hand-craftable recipes.
    pub fn crafting_machines_for(&self, category: &str) -> Vec<&Entity> {
        let character = (category == HAND_CRAFTING).then_some(&self.character);
        character
            .into_iter()
            .chain(self.entities.values().filter(|e| {
                e.crafting_machine().is_some_and(|m| m.can_craft(category))
            }))
            .collect()
    }

    /// Recipes of one crafting category, ascending by name.
    pub fn recipes_in_category<'c>(
        &'c self,
        category: &'c str,
    ) -> impl Iterator<Item = &'c Recipe> {
        self.recipes
            .values()
            .filter(move |r| r.crafting_category == category)
    }

    /// The implicit hand-crafting entity.
    pub fn character(&self) -> &Entity {
        &self.character
    }

    pub fn locale(&self) -> &LocaleTable {
        &self.locale
    }

    /// Look up and expand a locale key; `""` when unknown.
    pub fn localize(&self, language: &str, key: &str) -> String {
        self.locale.localize(language, key)
    }

    /// Evaluate a localised-string value.
    pub fn localize_array(&self, language: &str, value: &Value) -> String {
        self.locale.localize_array(language, value)
    }

    /// Versions of the mods the payload was dumped with.
    pub fn mod_versions(&self) -> &BTreeMap<String, Option<String>> {
        &self.mod_versions
    }
}

/// Remove one raw table from the payload. Absent tables and empty Lua
/// tables serialized as `[]` are both empty.
fn take_table(
    raw: &mut Map<String, Value>,
    table: &str,
) -> Result<Vec<(String, Map<String, Value>)>, DataLoadError> {
    let records = match raw.remove(table) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(list)) if list.is_empty() => return Ok(Vec::new()),
        Some(Value::Object(records)) => records,
        Some(other) => {
            return Err(malformed(
                table,
                "",
                format!("expected a table of records, got {other}"),
            ));
        }
    };
    records
        .into_iter()
        .map(|(name, value)| match value {
            Value::Object(fields) => Ok((name, fields)),
            other => Err(malformed(table, &name, format!("expected an object, got {other}"))),
        })
        .collect()
}

fn malformed(kind: &str, name: &str, detail: String) -> DataLoadError {
    DataLoadError::MalformedRecord {
        kind: kind.to_string(),
        name: name.to_string(),
        detail,
    }
}
