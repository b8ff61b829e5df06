//! Typed, cross-referenced catalog of a game data dump.
//!
//! A payload (raw prototype tables plus per-language locale strings) is
//! turned into a [`Catalog`] once; records are then queried by name and
//! localized on demand.

pub mod catalog;
pub mod config;
pub mod entity;
pub mod hierarchy;
pub mod item;
pub mod loader;
pub mod locale;
pub mod localize;
pub mod quantity;
pub mod raw;
pub mod recipe;
pub mod record;
pub mod schema;
pub mod tech;

pub use catalog::{Catalog, CatalogError};
pub use config::DataConfig;
pub use entity::{AmmoSource, CraftingMachine, Entity, EntityVariant, Lab, Turret};
pub use item::{Item, ItemWithCount};
pub use loader::{load_catalog, DataLoadError};
pub use locale::LocaleTable;
pub use quantity::format_quantity;
pub use recipe::Recipe;
pub use record::{Group, Record, RecordBase, Subgroup};
pub use schema::Payload;
pub use tech::Tech;
