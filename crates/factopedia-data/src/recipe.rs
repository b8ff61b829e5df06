//! Recipes.

use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::entity::{Entity, HAND_CRAFTING};
use crate::item::{item_list, ItemWithCount};
use crate::record::{Record, RecordBase};

/// Crafting time when a recipe doesn't give `energy_required`.
pub const DEFAULT_RECIPE_TIME: f64 = 0.5;

/// A recipe with its ingredient and product lists normalized.
#[derive(Debug, Clone)]
pub struct Recipe {
    base: RecordBase,
    pub ingredients: Vec<ItemWithCount>,
    pub products: Vec<ItemWithCount>,
    /// Crafting time in seconds at speed 1.
    pub time: f64,
    pub crafting_category: String,
    pub hidden: bool,
}

impl Recipe {
    /// Build from a raw recipe record.
    ///
    /// A legacy `normal` difficulty block is merged over the top-level
    /// fields first. Products come from `results` when present, otherwise
    /// from `result` + `result_count`.
    pub(crate) fn from_raw(
        key: &str,
        table: &str,
        raw: Map<String, Value>,
    ) -> Result<Self, String> {
        let base = RecordBase::from_raw(key, table, merge_difficulty(raw, "normal"));
        let fields = base.raw();

        let ingredients = match fields.list("ingredients") {
            Some(values) => item_list(values)?,
            None => Vec::new(),
        };

        let products = if let Some(values) = fields.list("results") {
            item_list(values)?
        } else if let Some(result) = fields.str("result").filter(|r| !r.is_empty()) {
            vec![ItemWithCount::new(result, fields.f64_or("result_count", 1.0))]
        } else {
            Vec::new()
        };

        let time = fields.f64_or("energy_required", DEFAULT_RECIPE_TIME);
        let crafting_category = fields
            .str("category")
            .filter(|c| !c.is_empty())
            .unwrap_or(HAND_CRAFTING)
            .to_string();
        let hidden = fields.flag("hidden");

        Ok(Self {
            base,
            ingredients,
            products,
            time,
            crafting_category,
            hidden,
        })
    }

    /// Name of the item that best represents this recipe: the explicit
    /// `result`, then `main_product`, then the sole product, then the
    /// recipe's own name.
    pub fn main_product_name(&self) -> &str {
        let raw = self.base.raw();
        if let Some(result) = raw.str("result").filter(|r| !r.is_empty()) {
            return result;
        }
        if let Some(main) = raw.str("main_product").filter(|m| !m.is_empty()) {
            return main;
        }
        match self.products.as_slice() {
            [only] => only.name.as_str(),
            _ => self.name(),
        }
    }

    /// Every machine able to run this recipe with the time it takes there.
    /// The character comes first when the category is hand-craftable.
    pub fn crafted_in<'c>(&self, catalog: &'c Catalog) -> Vec<(&'c Entity, f64)> {
        catalog
            .crafting_machines_for(&self.crafting_category)
            .into_iter()
            .filter_map(|entity| {
                let speed = entity.crafting_machine()?.crafting_speed;
                Some((entity, self.time / speed))
            })
            .collect()
    }
}

impl Record for Recipe {
    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn fallback<'c>(&'c self, catalog: &'c Catalog) -> Option<&'c dyn Record> {
        catalog
            .item(self.main_product_name())
            .map(|item| item as &dyn Record)
    }
}

/// Overlay the fields of a nested difficulty block onto the record.
pub(crate) fn merge_difficulty(mut raw: Map<String, Value>, block: &str) -> Map<String, Value> {
    if let Some(Value::Object(variant)) = raw.remove(block) {
        raw.extend(variant);
    }
    raw
}
