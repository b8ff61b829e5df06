//! Technologies.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::catalog::{Catalog, CatalogError};
use crate::item::{item_list, ItemWithCount};
use crate::recipe::{merge_difficulty, Recipe};
use crate::record::{Record, RecordBase};

/// A researchable technology.
#[derive(Debug, Clone)]
pub struct Tech {
    base: RecordBase,
    /// Names of the techs that must be researched first. Never contains the
    /// tech's own name.
    pub prerequisites: BTreeSet<String>,
    /// Disabled techs exist in the data but can't be researched.
    pub enabled: bool,
    /// Seconds per research unit.
    pub time: Option<f64>,
    /// Science packs consumed per research unit.
    pub ingredients: Vec<ItemWithCount>,
    /// Recipes unlocked on completion, in effect order.
    pub unlocked_recipes: Vec<String>,
}

impl Tech {
    pub(crate) fn from_raw(
        key: &str,
        table: &str,
        raw: Map<String, Value>,
    ) -> Result<Self, String> {
        let base = RecordBase::from_raw(key, table, merge_difficulty(raw, "normal"));
        let fields = base.raw();

        let mut prerequisites: BTreeSet<String> =
            fields.string_list("prerequisites").into_iter().collect();
        if prerequisites.remove(key) {
            tracing::warn!(tech = key, "dropping self-prerequisite");
        }

        let enabled = fields.get("enabled") != Some(&Value::Bool(false));

        let unit = fields.object("unit");
        let time = unit.and_then(|u| u.f64("time"));
        let ingredients = match unit.and_then(|u| u.list("ingredients")) {
            Some(values) => item_list(values)?,
            None => Vec::new(),
        };

        let unlocked_recipes = fields
            .list("effects")
            .unwrap_or_default()
            .iter()
            .filter(|e| e.get("type").and_then(Value::as_str) == Some("unlock-recipe"))
            .filter_map(|e| e.get("recipe").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        Ok(Self {
            base,
            prerequisites,
            enabled,
            time,
            ingredients,
            unlocked_recipes,
        })
    }

    pub fn prerequisite_techs<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Tech>, CatalogError> {
        self.prerequisites
            .iter()
            .map(|p| catalog.require_tech(p))
            .collect()
    }

    pub fn recipes<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Recipe>, CatalogError> {
        self.unlocked_recipes
            .iter()
            .map(|r| catalog.require_recipe(r))
            .collect()
    }
}

impl Record for Tech {
    fn base(&self) -> &RecordBase {
        &self.base
    }
}
