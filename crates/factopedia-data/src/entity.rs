//! World entities and their type-specific variants.

use serde_json::{Map, Value, json};
use std::collections::BTreeSet;

use crate::catalog::{Catalog, CatalogError};
use crate::hierarchy::EntityClass;
use crate::item::Item;
use crate::raw::RawRecord;
use crate::record::{Record, RecordBase};

/// Crafting category the player character can always craft.
pub const HAND_CRAFTING: &str = "crafting";

// ===========================================================================
// Variants
// ===========================================================================

/// Type-specific data of an entity, chosen from its raw type.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityVariant {
    Generic,
    CraftingMachine(CraftingMachine),
    Turret(Turret),
    Lab(Lab),
    MiningDrill,
    /// A rocket silo crafts like an assembling machine.
    RocketSilo(CraftingMachine),
}

/// Anything that runs recipes.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftingMachine {
    pub crafting_categories: BTreeSet<String>,
    /// Recipe time multiplier, always positive.
    pub crafting_speed: f64,
}

impl CraftingMachine {
    fn from_raw(raw: RawRecord<'_>) -> Self {
        Self {
            crafting_categories: raw.string_list("crafting_categories").into_iter().collect(),
            crafting_speed: raw.f64_or("crafting_speed", 1.0),
        }
    }

    pub fn can_craft(&self, category: &str) -> bool {
        self.crafting_categories.contains(category)
    }
}

/// Where a turret's ammunition comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AmmoSource {
    /// A stream attack fed by the listed fluids.
    Stream { fluids: Vec<String> },
    /// A discrete attack accepting any ammo item of these categories.
    Categories(Vec<String>),
    /// Attack parameters that name no ammunition.
    Unspecified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turret {
    /// `None` when the raw record has no `attack_parameters`.
    pub ammo: Option<AmmoSource>,
}

impl Turret {
    fn from_raw(raw: RawRecord<'_>) -> Self {
        let ammo = raw.object("attack_parameters").map(|attack| {
            if attack.str("type") == Some("stream") {
                let fluids = attack
                    .list("fluids")
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|f| f.get("type").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
                AmmoSource::Stream { fluids }
            } else if let Some(ammo_type) = attack.object("ammo_type") {
                AmmoSource::Categories(ammo_type.string_list("category"))
            } else if attack.contains("ammo_categories") {
                AmmoSource::Categories(attack.string_list("ammo_categories"))
            } else if attack.contains("ammo_category") {
                AmmoSource::Categories(attack.string_list("ammo_category"))
            } else {
                AmmoSource::Unspecified
            }
        });
        Self { ammo }
    }

    /// Ammunition grouped by category: `(category label, ammo items)`.
    ///
    /// Stream turrets list their fluids under the localized `fluid` ammo
    /// category. Discrete turrets list every `ammo` item whose (single)
    /// ammo type matches each category. Labels fall back to the raw category
    /// name when unlocalized.
    pub fn ammo_categories<'c>(
        &self,
        entity: &Entity,
        catalog: &'c Catalog,
        language: &str,
    ) -> Result<Vec<(String, Vec<&'c Item>)>, CatalogError> {
        let ammo = self.ammo.as_ref().ok_or_else(|| CatalogError::MissingField {
            kind: entity.kind().to_string(),
            name: entity.name().to_string(),
            field: "attack_parameters",
        })?;

        match ammo {
            AmmoSource::Stream { fluids } => {
                let items = fluids
                    .iter()
                    .map(|f| catalog.require_item(f))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(vec![(category_label(catalog, language, "fluid"), items)])
            }
            AmmoSource::Categories(categories) => Ok(categories
                .iter()
                .map(|category| {
                    let items = catalog
                        .items()
                        .filter(|item| {
                            item.kind() == "ammo" && ammo_category(item) == Some(category.as_str())
                        })
                        .collect();
                    (category_label(catalog, language, category), items)
                })
                .collect()),
            AmmoSource::Unspecified => Ok(Vec::new()),
        }
    }
}

fn category_label(catalog: &Catalog, language: &str, category: &str) -> String {
    let label = catalog.localize(language, &format!("ammo-category-name.{category}"));
    if label.is_empty() {
        category.to_string()
    } else {
        label
    }
}

/// The category of an ammo item with a single ammo type. Items with
/// per-target ammo type lists have none.
fn ammo_category(item: &Item) -> Option<&str> {
    item.raw().object("ammo_type")?.str("category")
}

/// A research building.
#[derive(Debug, Clone, PartialEq)]
pub struct Lab {
    pub researching_speed: f64,
    /// Names of the science packs the lab accepts.
    pub inputs: Vec<String>,
}

impl Lab {
    fn from_raw(raw: RawRecord<'_>) -> Self {
        Self {
            researching_speed: raw.f64_or("researching_speed", 1.0),
            inputs: raw.string_list("inputs"),
        }
    }

    pub fn input_items<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Item>, CatalogError> {
        self.inputs.iter().map(|i| catalog.require_item(i)).collect()
    }
}

// ===========================================================================
// Entity
// ===========================================================================

/// A world object (building, unit, tree, projectile, ...).
#[derive(Debug, Clone)]
pub struct Entity {
    base: RecordBase,
    pub variant: EntityVariant,
}

impl Entity {
    pub(crate) fn from_base(base: RecordBase, class: EntityClass) -> Self {
        let raw = base.raw();
        let variant = match class {
            EntityClass::Generic => EntityVariant::Generic,
            EntityClass::CraftingMachine => {
                EntityVariant::CraftingMachine(CraftingMachine::from_raw(raw))
            }
            EntityClass::Turret => EntityVariant::Turret(Turret::from_raw(raw)),
            EntityClass::Lab => EntityVariant::Lab(Lab::from_raw(raw)),
            EntityClass::MiningDrill => EntityVariant::MiningDrill,
            EntityClass::RocketSilo => EntityVariant::RocketSilo(CraftingMachine::from_raw(raw)),
        };
        Self { base, variant }
    }

    /// The player character as a hand-crafting machine. It is not part of
    /// the raw data; every catalog carries one.
    pub(crate) fn character() -> Self {
        let raw: Map<String, Value> = match json!({
            "name": "character",
            "type": "character",
            "crafting_categories": [HAND_CRAFTING],
            "crafting_speed": 1,
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let base = RecordBase::from_raw("character", "character", raw);
        Self::from_base(base, EntityClass::CraftingMachine)
    }

    /// Crafting data for assembling machines, furnaces, rocket silos and
    /// the character.
    pub fn crafting_machine(&self) -> Option<&CraftingMachine> {
        match &self.variant {
            EntityVariant::CraftingMachine(m) | EntityVariant::RocketSilo(m) => Some(m),
            _ => None,
        }
    }

    pub fn crafting_categories(&self) -> Option<&BTreeSet<String>> {
        self.crafting_machine().map(|m| &m.crafting_categories)
    }

    pub fn as_turret(&self) -> Option<&Turret> {
        match &self.variant {
            EntityVariant::Turret(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_lab(&self) -> Option<&Lab> {
        match &self.variant {
            EntityVariant::Lab(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_mining_drill(&self) -> bool {
        matches!(self.variant, EntityVariant::MiningDrill)
    }

    pub fn is_rocket_silo(&self) -> bool {
        matches!(self.variant, EntityVariant::RocketSilo(_))
    }

    /// Ammunition by category for turrets; `None` for anything else.
    pub fn ammo_categories<'c>(
        &self,
        catalog: &'c Catalog,
        language: &str,
    ) -> Option<Result<Vec<(String, Vec<&'c Item>)>, CatalogError>> {
        self.as_turret()
            .map(|turret| turret.ammo_categories(self, catalog, language))
    }
}

impl Record for Entity {
    fn base(&self) -> &RecordBase {
        &self.base
    }
}
