//! Serde shape of a raw data payload.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::locale::LocaleTable;

/// One dumped dataset: the raw prototype tables, the locale strings and the
/// versions of the mods that produced it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    /// Prototype tables keyed by type name, then by record name.
    #[serde(default)]
    pub raw: Option<Map<String, Value>>,
    #[serde(default)]
    pub locale: LocaleTable,
    /// Mod name to version; `null` for mods without a version string.
    #[serde(default)]
    pub mod_versions: BTreeMap<String, Option<String>>,
}
