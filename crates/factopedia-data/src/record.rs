//! Fields and behaviour shared by every catalog record, plus the item group
//! and subgroup containers.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::catalog::{Catalog, CatalogError};
use crate::item::Item;
use crate::raw::RawRecord;

// ===========================================================================
// Shared record fields
// ===========================================================================

/// Name, type tag, flags and the untouched raw JSON of a record.
#[derive(Debug, Clone)]
pub struct RecordBase {
    pub name: String,
    /// Prototype type tag, e.g. `"item"`, `"assembling-machine"`.
    pub kind: String,
    pub flags: BTreeSet<String>,
    raw: Map<String, Value>,
}

impl RecordBase {
    /// Build from a raw table entry. The table key is the record's name; the
    /// type tag is the raw `type` field, or the table the record came from.
    pub(crate) fn from_raw(key: &str, table: &str, raw: Map<String, Value>) -> Self {
        let fields = RawRecord::new(&raw);
        if let Some(declared) = fields.str("name")
            && declared != key
        {
            tracing::debug!(key, declared, table, "record name differs from its table key");
        }
        let kind = fields
            .str("type")
            .filter(|t| !t.is_empty())
            .unwrap_or(table)
            .to_string();
        let flags = fields.string_list("flags").into_iter().collect();
        Self {
            name: key.to_string(),
            kind,
            flags,
            raw,
        }
    }

    pub fn raw(&self) -> RawRecord<'_> {
        RawRecord::new(&self.raw)
    }
}

// ===========================================================================
// Record trait
// ===========================================================================

/// Any named, typed entry in the [`Catalog`].
pub trait Record {
    fn base(&self) -> &RecordBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn kind(&self) -> &str {
        &self.base().kind
    }

    fn flags(&self) -> &BTreeSet<String> {
        &self.base().flags
    }

    fn raw(&self) -> RawRecord<'_> {
        self.base().raw()
    }

    /// Another record to consult when this one has no localization.
    fn fallback<'c>(&'c self, _catalog: &'c Catalog) -> Option<&'c dyn Record> {
        None
    }

    /// Human-readable title; the raw name when nothing localizes.
    fn localized_title(&self, catalog: &Catalog, language: &str) -> String
    where
        Self: Sized,
    {
        catalog.localized_title(language, self)
    }

    /// Human-readable description; empty when nothing localizes.
    fn description(&self, catalog: &Catalog, language: &str) -> String
    where
        Self: Sized,
    {
        catalog.description(language, self)
    }
}

// ===========================================================================
// Groups
// ===========================================================================

/// A top-level item group (an inventory tab).
#[derive(Debug, Clone)]
pub struct Group {
    base: RecordBase,
    pub order: String,
}

impl Group {
    pub(crate) fn from_base(base: RecordBase) -> Self {
        let order = base.raw().str_or_empty("order");
        Self { base, order }
    }

    /// Subgroups belonging to this group in display order.
    pub fn subgroups<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Subgroup> {
        let mut subgroups: Vec<&Subgroup> = catalog
            .subgroups()
            .filter(|s| s.group_name() == Some(self.name()))
            .collect();
        subgroups.sort_by(|a, b| display_order(&a.order, a.name(), &b.order, b.name()));
        subgroups
    }
}

impl Record for Group {
    fn base(&self) -> &RecordBase {
        &self.base
    }
}

/// A row inside an item group.
#[derive(Debug, Clone)]
pub struct Subgroup {
    base: RecordBase,
    pub order: String,
}

impl Subgroup {
    pub(crate) fn from_base(base: RecordBase) -> Self {
        let order = base.raw().str_or_empty("order");
        Self { base, order }
    }

    pub fn group_name(&self) -> Option<&str> {
        self.base.raw().str("group")
    }

    /// The group this subgroup belongs to.
    pub fn group<'c>(&self, catalog: &'c Catalog) -> Result<&'c Group, CatalogError> {
        let name = self.group_name().ok_or_else(|| CatalogError::MissingField {
            kind: self.kind().to_string(),
            name: self.name().to_string(),
            field: "group",
        })?;
        catalog.require_group(name)
    }

    /// Items filed under this subgroup in display order.
    pub fn items<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Item> {
        let mut items: Vec<&Item> = catalog
            .items()
            .filter(|i| i.subgroup_name() == Some(self.name()))
            .collect();
        items.sort_by(|a, b| display_order(&a.order, a.name(), &b.order, b.name()));
        items
    }
}

impl Record for Subgroup {
    fn base(&self) -> &RecordBase {
        &self.base
    }
}

/// Order strings compare lexicographically; ties break on name.
pub(crate) fn display_order(
    order_a: &str,
    name_a: &str,
    order_b: &str,
    name_b: &str,
) -> std::cmp::Ordering {
    order_a.cmp(order_b).then_with(|| name_a.cmp(name_b))
}
