//! Static prototype type tables.
//!
//! Three tables live here:
//!
//! - the supertype of every concrete prototype type, walked by the
//!   localization resolver when a `<type>-name.<name>` key is missing;
//! - the raw tables that are merged into the catalog's item table;
//! - the raw tables that are merged into the entity table, each tagged with
//!   the [`EntityClass`] used to construct its records.

// ===========================================================================
// Supertypes
// ===========================================================================

/// Return the declared supertype of a prototype type, or `None` for a root
/// type (and for any type the table doesn't know).
pub fn supertype(type_name: &str) -> Option<&'static str> {
    let parent = match type_name {
        // -- Items --
        "ammo" | "capsule" | "gun" | "item-with-entity-data" | "item-with-label" | "module"
        | "rail-planner" | "spidertron-remote" | "tool" => "item",
        "item-with-inventory" | "item-with-tags" | "selection-tool" => "item-with-label",
        "blueprint-book" => "item-with-inventory",
        "blueprint" | "copy-paste-tool" | "deconstruction-item" | "upgrade-item" => {
            "selection-tool"
        }
        "armor" | "mining-tool" | "repair-tool" => "tool",

        // -- Equipment --
        "active-defense-equipment" | "battery-equipment" | "belt-immunity-equipment"
        | "energy-shield-equipment" | "generator-equipment" | "movement-bonus-equipment"
        | "night-vision-equipment" | "roboport-equipment" | "solar-panel-equipment" => {
            "equipment"
        }

        // -- Entities without health --
        "arrow" | "artillery-flare" | "artillery-projectile" | "beam" | "character-corpse"
        | "cliff" | "corpse" | "deconstructible-tile-proxy" | "entity-ghost" | "explosion"
        | "fire" | "flying-text" | "highlight-box" | "item-entity" | "item-request-proxy"
        | "particle" | "particle-source" | "projectile" | "resource" | "rocket-silo-rocket"
        | "rocket-silo-rocket-shadow" | "smoke" | "speech-bubble" | "sticker" | "stream"
        | "tile-ghost" | "entity-with-health" => "entity",
        "rail-remnants" => "corpse",
        "flame-thrower-explosion" => "explosion",
        "smoke-with-trigger" => "smoke",
        "leaf-particle" => "particle",

        // -- Entities with health --
        "fish" | "simple-entity" | "spider-leg" | "tree" | "entity-with-owner" => {
            "entity-with-health"
        }

        // -- Owned entities --
        "accumulator" | "artillery-turret" | "beacon" | "boiler" | "burner-generator"
        | "character" | "combinator" | "constant-combinator" | "container"
        | "crafting-machine" | "electric-energy-interface" | "electric-pole" | "flying-robot"
        | "gate" | "generator" | "heat-interface" | "heat-pipe" | "inserter" | "lab"
        | "lamp" | "land-mine" | "linked-container" | "market" | "mining-drill"
        | "offshore-pump" | "pipe" | "pipe-to-ground" | "player-port" | "power-switch"
        | "programmable-speaker" | "pump" | "radar" | "rail" | "rail-signal-base"
        | "reactor" | "roboport" | "simple-entity-with-owner" | "solar-panel"
        | "storage-tank" | "train-stop" | "transport-belt-connectable" | "turret" | "unit"
        | "unit-spawner" | "vehicle" | "wall" => "entity-with-owner",
        "arithmetic-combinator" | "decider-combinator" => "combinator",
        "logistic-container" => "container",
        "infinity-container" => "logistic-container",
        "assembling-machine" | "furnace" => "crafting-machine",
        "rocket-silo" => "assembling-machine",
        "combat-robot" | "robot-with-logistic-interface" => "flying-robot",
        "construction-robot" | "logistic-robot" => "robot-with-logistic-interface",
        "infinity-pipe" => "pipe",
        "curved-rail" | "straight-rail" => "rail",
        "rail-chain-signal" | "rail-signal" => "rail-signal-base",
        "simple-entity-with-force" => "simple-entity-with-owner",
        "linked-belt" | "loader-1x1" | "loader" | "splitter" | "transport-belt"
        | "underground-belt" => "transport-belt-connectable",
        "ammo-turret" | "electric-turret" | "fluid-turret" => "turret",
        "car" | "rolling-stock" | "spider-vehicle" => "vehicle",
        "artillery-wagon" | "cargo-wagon" | "fluid-wagon" | "locomotive" => "rolling-stock",

        _ => return None,
    };
    Some(parent)
}

/// Iterate a type followed by each of its supertypes, nearest first.
///
/// The chain ends at the first type without a declared supertype. An empty
/// type name yields nothing.
pub fn type_chain(type_name: &str) -> impl Iterator<Item = &str> {
    let first = (!type_name.is_empty()).then_some(type_name);
    std::iter::successors(first, |t| supertype(t))
}

// ===========================================================================
// Item-like tables
// ===========================================================================

/// Raw tables whose records are merged into the catalog's item table, in
/// merge order. A later table overwrites an earlier record of the same name.
pub const ITEM_TYPES: &[&str] = &[
    "item",
    "ammo",
    "capsule",
    "gun",
    "item-with-entity-data",
    "item-with-label",
    "item-with-inventory",
    "blueprint-book",
    "item-with-tags",
    "selection-tool",
    "blueprint",
    "copy-paste-tool",
    "deconstruction-item",
    "upgrade-item",
    "module",
    "rail-planner",
    "spidertron-remote",
    "tool",
    "armor",
    "mining-tool",
    "repair-tool",
    "fluid",
];

// ===========================================================================
// Entity-like tables
// ===========================================================================

/// Which record variant is built for a raw entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Generic,
    CraftingMachine,
    Turret,
    Lab,
    MiningDrill,
    RocketSilo,
}

/// Raw entity tables and the variant each one constructs.
pub const ENTITY_TYPES: &[(&str, EntityClass)] = &[
    ("arrow", EntityClass::Generic),
    ("artillery-flare", EntityClass::Generic),
    ("artillery-projectile", EntityClass::Generic),
    ("beam", EntityClass::Generic),
    ("character-corpse", EntityClass::Generic),
    ("cliff", EntityClass::Generic),
    ("corpse", EntityClass::Generic),
    ("rail-remnants", EntityClass::Generic),
    ("deconstructible-tile-proxy", EntityClass::Generic),
    ("entity-ghost", EntityClass::Generic),
    ("particle", EntityClass::Generic),
    ("leaf-particle", EntityClass::Generic),
    ("accumulator", EntityClass::Generic),
    ("artillery-turret", EntityClass::Generic),
    ("beacon", EntityClass::Generic),
    ("boiler", EntityClass::Generic),
    ("burner-generator", EntityClass::Generic),
    ("character", EntityClass::Generic),
    ("arithmetic-combinator", EntityClass::Generic),
    ("decider-combinator", EntityClass::Generic),
    ("constant-combinator", EntityClass::Generic),
    ("container", EntityClass::Generic),
    ("logistic-container", EntityClass::Generic),
    ("infinity-container", EntityClass::Generic),
    ("assembling-machine", EntityClass::CraftingMachine),
    ("rocket-silo", EntityClass::RocketSilo),
    ("furnace", EntityClass::CraftingMachine),
    ("electric-energy-interface", EntityClass::Generic),
    ("electric-pole", EntityClass::Generic),
    ("unit-spawner", EntityClass::Generic),
    ("combat-robot", EntityClass::Generic),
    ("construction-robot", EntityClass::Generic),
    ("logistic-robot", EntityClass::Generic),
    ("gate", EntityClass::Generic),
    ("generator", EntityClass::Generic),
    ("heat-interface", EntityClass::Generic),
    ("heat-pipe", EntityClass::Generic),
    ("inserter", EntityClass::Generic),
    ("lab", EntityClass::Lab),
    ("lamp", EntityClass::Generic),
    ("land-mine", EntityClass::Generic),
    ("linked-container", EntityClass::Generic),
    ("market", EntityClass::Generic),
    ("mining-drill", EntityClass::MiningDrill),
    ("offshore-pump", EntityClass::Generic),
    ("pipe", EntityClass::Generic),
    ("infinity-pipe", EntityClass::Generic),
    ("pipe-to-ground", EntityClass::Generic),
    ("player-port", EntityClass::Generic),
    ("power-switch", EntityClass::Generic),
    ("programmable-speaker", EntityClass::Generic),
    ("pump", EntityClass::Generic),
    ("radar", EntityClass::Generic),
    ("curved-rail", EntityClass::Generic),
    ("straight-rail", EntityClass::Generic),
    ("rail-chain-signal", EntityClass::Generic),
    ("rail-signal", EntityClass::Generic),
    ("reactor", EntityClass::Generic),
    ("roboport", EntityClass::Generic),
    ("simple-entity-with-owner", EntityClass::Generic),
    ("simple-entity-with-force", EntityClass::Generic),
    ("solar-panel", EntityClass::Generic),
    ("storage-tank", EntityClass::Generic),
    ("train-stop", EntityClass::Generic),
    ("linked-belt", EntityClass::Generic),
    ("loader-1x1", EntityClass::Generic),
    ("loader", EntityClass::Generic),
    ("splitter", EntityClass::Generic),
    ("transport-belt", EntityClass::Generic),
    ("underground-belt", EntityClass::Generic),
    ("turret", EntityClass::Turret),
    ("ammo-turret", EntityClass::Turret),
    ("electric-turret", EntityClass::Turret),
    ("fluid-turret", EntityClass::Turret),
    ("unit", EntityClass::Generic),
    ("car", EntityClass::Generic),
    ("artillery-wagon", EntityClass::Generic),
    ("cargo-wagon", EntityClass::Generic),
    ("fluid-wagon", EntityClass::Generic),
    ("locomotive", EntityClass::Generic),
    ("spider-vehicle", EntityClass::Generic),
    ("wall", EntityClass::Generic),
    ("fish", EntityClass::Generic),
    ("simple-entity", EntityClass::Generic),
    ("spider-leg", EntityClass::Generic),
    ("tree", EntityClass::Generic),
    ("explosion", EntityClass::Generic),
    ("flame-thrower-explosion", EntityClass::Generic),
    ("fire", EntityClass::Generic),
    ("stream", EntityClass::Generic),
    ("flying-text", EntityClass::Generic),
    ("highlight-box", EntityClass::Generic),
    ("item-entity", EntityClass::Generic),
    ("item-request-proxy", EntityClass::Generic),
    ("particle-source", EntityClass::Generic),
    ("projectile", EntityClass::Generic),
    ("resource", EntityClass::Generic),
    ("rocket-silo-rocket", EntityClass::Generic),
    ("rocket-silo-rocket-shadow", EntityClass::Generic),
    ("smoke-with-trigger", EntityClass::Generic),
    ("speech-bubble", EntityClass::Generic),
    ("sticker", EntityClass::Generic),
    ("tile-ghost", EntityClass::Generic),
];

/// Look up the record variant for a raw entity table.
///
/// Types missing from [`ENTITY_TYPES`] fall back to their nearest registered
/// supertype, and finally to [`EntityClass::Generic`].
pub fn entity_class(type_name: &str) -> EntityClass {
    type_chain(type_name)
        .find_map(|t| {
            ENTITY_TYPES
                .iter()
                .find(|(name, _)| *name == t)
                .map(|(_, class)| *class)
        })
        .unwrap_or(EntityClass::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_chain_walks_to_root() {
        let chain: Vec<&str> = type_chain("rocket-silo").collect();
        assert_eq!(
            chain,
            vec![
                "rocket-silo",
                "assembling-machine",
                "crafting-machine",
                "entity-with-owner",
                "entity-with-health",
                "entity",
            ]
        );
    }

    #[test]
    fn root_types_have_no_supertype() {
        assert_eq!(supertype("item"), None);
        assert_eq!(supertype("fluid"), None);
        assert_eq!(supertype("entity"), None);
        assert_eq!(supertype("recipe"), None);
        assert_eq!(supertype("technology"), None);
    }

    #[test]
    fn empty_type_has_empty_chain() {
        assert_eq!(type_chain("").count(), 0);
    }

    #[test]
    fn selection_tools_chain_through_item_with_label() {
        let chain: Vec<&str> = type_chain("blueprint").collect();
        assert_eq!(
            chain,
            vec!["blueprint", "selection-tool", "item-with-label", "item"]
        );
    }

    #[test]
    fn entity_class_for_registered_types() {
        assert_eq!(entity_class("assembling-machine"), EntityClass::CraftingMachine);
        assert_eq!(entity_class("furnace"), EntityClass::CraftingMachine);
        assert_eq!(entity_class("fluid-turret"), EntityClass::Turret);
        assert_eq!(entity_class("lab"), EntityClass::Lab);
        assert_eq!(entity_class("mining-drill"), EntityClass::MiningDrill);
        assert_eq!(entity_class("rocket-silo"), EntityClass::RocketSilo);
        assert_eq!(entity_class("inserter"), EntityClass::Generic);
    }

    #[test]
    fn unknown_type_is_generic() {
        assert_eq!(entity_class("modded-thing"), EntityClass::Generic);
    }

    #[test]
    fn every_item_type_chains_to_a_root() {
        for t in ITEM_TYPES {
            let root = type_chain(t).last().unwrap();
            assert!(root == "item" || root == "fluid", "{t} ends at {root}");
        }
    }

    #[test]
    fn every_entity_type_chains_to_entity() {
        for (t, _) in ENTITY_TYPES {
            assert_eq!(type_chain(t).last(), Some("entity"), "{t}");
        }
    }
}
