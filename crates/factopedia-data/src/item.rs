//! Items (including fluids) and counted item references.

use serde_json::Value;

use crate::catalog::{Catalog, CatalogError};
use crate::entity::Entity;
use crate::quantity::format_quantity;
use crate::raw::{value_as_f64, RawRecord};
use crate::record::{Record, RecordBase, Subgroup};
use crate::recipe::Recipe;

/// Raw fields naming the entity an item places, in lookup order.
const PLACE_RESULT_FIELDS: [&str; 2] = ["place_result", "placed_as_equipment_result"];

// ===========================================================================
// Item
// ===========================================================================

/// An item or fluid.
#[derive(Debug, Clone)]
pub struct Item {
    base: RecordBase,
    /// Sort key within the subgroup; compared lexicographically.
    pub order: String,
    pub hidden: bool,
}

impl Item {
    pub(crate) fn from_base(base: RecordBase) -> Self {
        let raw = base.raw();
        let order = raw.str_or_empty("order");
        let hidden = raw.flag("hidden");
        Self {
            base,
            order,
            hidden,
        }
    }

    pub fn is_fluid(&self) -> bool {
        self.kind() == "fluid"
    }

    /// Name of the subgroup the item is filed under. Fluids always use the
    /// `fluid` subgroup regardless of what they declare.
    pub fn subgroup_name(&self) -> Option<&str> {
        if self.is_fluid() {
            return Some("fluid");
        }
        self.base.raw().str("subgroup").filter(|s| !s.is_empty())
    }

    pub fn subgroup<'c>(&self, catalog: &'c Catalog) -> Result<&'c Subgroup, CatalogError> {
        let name = self.subgroup_name().ok_or_else(|| CatalogError::MissingField {
            kind: self.kind().to_string(),
            name: self.name().to_string(),
            field: "subgroup",
        })?;
        catalog.require_subgroup(name)
    }

    /// The entity this item places in the world, if it places one.
    ///
    /// The first of `place_result` / `placed_as_equipment_result` present on
    /// the raw record decides; a name that isn't in the entity table is an
    /// error.
    pub fn placement_result<'c>(
        &self,
        catalog: &'c Catalog,
    ) -> Result<Option<&'c Entity>, CatalogError> {
        let raw = self.base.raw();
        let Some(name) = PLACE_RESULT_FIELDS
            .iter()
            .find_map(|field| raw.str(field).filter(|n| !n.is_empty()))
        else {
            return Ok(None);
        };
        catalog.require_entity(name).map(Some)
    }

    /// Recipes consuming this item, ascending by recipe name.
    pub fn used_in<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Recipe> {
        catalog
            .recipes()
            .filter(|r| r.ingredients.iter().any(|i| i.name == self.name()))
            .collect()
    }

    /// Recipes producing this item, ascending by recipe name.
    pub fn produced_in<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Recipe> {
        catalog
            .recipes()
            .filter(|r| r.products.iter().any(|p| p.name == self.name()))
            .collect()
    }
}

impl Record for Item {
    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn fallback<'c>(&'c self, catalog: &'c Catalog) -> Option<&'c dyn Record> {
        match self.placement_result(catalog) {
            Ok(Some(entity)) => Some(entity as &dyn Record),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(item = self.name(), %err, "placement result not in catalog");
                None
            }
        }
    }
}

// ===========================================================================
// ItemWithCount
// ===========================================================================

/// An ingredient or product: an item name with a (possibly ranged,
/// possibly probabilistic) amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithCount {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// Chance of the amount being produced, in `(0, 1]`.
    pub probability: f64,
}

impl ItemWithCount {
    /// A fixed, certain amount.
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            min: amount,
            max: amount,
            probability: 1.0,
        }
    }

    /// Parse either the positional `[name, amount]` form or the object form
    /// with `amount` or `amount_min`/`amount_max` and optional `probability`.
    pub fn from_raw(value: &Value) -> Result<Self, String> {
        let parsed = match value {
            Value::Array(pair) => {
                let name = match pair.first() {
                    Some(Value::String(s)) => s.clone(),
                    _ => return Err(format!("expected [name, amount], got {value}")),
                };
                let amount = pair
                    .get(1)
                    .and_then(value_as_f64)
                    .ok_or_else(|| format!("missing amount for '{name}'"))?;
                Self::new(name, amount)
            }
            Value::Object(map) => {
                let raw = RawRecord::new(map);
                let name = raw
                    .str("name")
                    .ok_or_else(|| format!("entry without a name: {value}"))?
                    .to_string();
                let (min, max) = if let Some(amount) = raw.f64("amount") {
                    (amount, amount)
                } else {
                    match (raw.f64("amount_min"), raw.f64("amount_max")) {
                        (Some(min), Some(max)) => (min, max),
                        _ => return Err(format!("no amount given for '{name}'")),
                    }
                };
                let probability = match raw.get("probability") {
                    Some(p) => value_as_f64(p)
                        .ok_or_else(|| format!("bad probability for '{name}': {p}"))?,
                    None => 1.0,
                };
                Self {
                    name,
                    min,
                    max,
                    probability,
                }
            }
            _ => return Err(format!("unrecognised item entry: {value}")),
        };

        if parsed.min < 0.0 || parsed.min > parsed.max {
            return Err(format!(
                "invalid amount range {}..{} for '{}'",
                parsed.min, parsed.max, parsed.name
            ));
        }
        if !(parsed.probability > 0.0 && parsed.probability <= 1.0) {
            return Err(format!(
                "probability {} for '{}' is outside (0, 1]",
                parsed.probability, parsed.name
            ));
        }
        Ok(parsed)
    }

    pub fn item<'c>(&self, catalog: &'c Catalog) -> Result<&'c Item, CatalogError> {
        catalog.require_item(&self.name)
    }

    pub fn localized_title(
        &self,
        catalog: &Catalog,
        language: &str,
    ) -> Result<String, CatalogError> {
        Ok(self.item(catalog)?.localized_title(catalog, language))
    }

    /// Display string such as `2x`, `1–3x` or `25.00% 2–4x`.
    pub fn quantity(&self) -> String {
        format_quantity(self.min, self.max, self.probability)
    }
}

/// Parse a raw ingredient or result list.
pub(crate) fn item_list(values: &[Value]) -> Result<Vec<ItemWithCount>, String> {
    values.iter().map(ItemWithCount::from_raw).collect()
}
