//! Per-language locale tables and template expansion.
//!
//! A locale table maps a language code to a flat table of dotted keys
//! (`item-name.iron-plate`) whose values are either plain strings or
//! localised-string arrays (`["item-name.foo", ...]`).
//!
//! Two expansion passes exist:
//!
//! - [`LocaleTable::localize`] looks a key up and substitutes the first
//!   `__ENTITY__x__` and the first `__ITEM__x__` token with the localized
//!   `entity-name.x` / `item-name.x`.
//! - [`LocaleTable::localize_array`] evaluates a localised-string value:
//!   a key followed by parameters referenced as `__1__`, `__2__`, ..., or a
//!   concatenation list when the first element is empty.
//!
//! A miss is the empty string. Both passes are bounded by nesting depth
//! ([`MAX_EXPANSION_DEPTH`]) and by total work ([`MAX_EXPANSION_STEPS`]), so
//! self-referential data terminates quickly.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::raw::{is_truthy, number_to_string};

/// Maximum nesting of key lookups and array evaluations.
pub const MAX_EXPANSION_DEPTH: usize = 32;

/// Maximum key lookups and array evaluations for one top-level expansion.
pub const MAX_EXPANSION_STEPS: usize = 4096;

/// Locale strings for every loaded language.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LocaleTable {
    languages: BTreeMap<String, BTreeMap<String, Value>>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, language: &str, key: &str, value: impl Into<Value>) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Language codes present in the table.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// The unexpanded value stored for a key.
    pub fn raw_entry(&self, language: &str, key: &str) -> Option<&Value> {
        self.languages.get(language)?.get(key)
    }

    pub fn contains(&self, language: &str, key: &str) -> bool {
        self.raw_entry(language, key).is_some()
    }

    /// Number of entries for a language.
    pub fn len(&self, language: &str) -> usize {
        self.languages.get(language).map_or(0, BTreeMap::len)
    }

    /// Look up a key and expand it. Returns `""` when neither the key nor a
    /// numbered variant of it (`<base>-<digits>`) is known.
    pub fn localize(&self, language: &str, key: &str) -> String {
        Expansion::new(self, language).localize(key, 0)
    }

    /// Evaluate a localised-string value: strings pass through, numbers are
    /// stringified and arrays are expanded.
    pub fn localize_array(&self, language: &str, value: &Value) -> String {
        Expansion::new(self, language).localize_array(value, 0)
    }
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// One top-level expansion. Every key lookup and array evaluation spends a
/// step; once [`MAX_EXPANSION_STEPS`] are spent the rest expands to `""`.
struct Expansion<'a> {
    locale: &'a LocaleTable,
    language: &'a str,
    steps: usize,
}

impl<'a> Expansion<'a> {
    fn new(locale: &'a LocaleTable, language: &'a str) -> Self {
        Self {
            locale,
            language,
            steps: 0,
        }
    }

    /// Spend one step. False once the depth or step budget is exhausted.
    fn step(&mut self, depth: usize) -> bool {
        if depth > MAX_EXPANSION_DEPTH {
            tracing::warn!(language = self.language, "locale expansion too deep, giving up");
            return false;
        }
        if self.steps >= MAX_EXPANSION_STEPS {
            if self.steps == MAX_EXPANSION_STEPS {
                tracing::warn!(language = self.language, "locale expansion budget spent, giving up");
                self.steps += 1;
            }
            return false;
        }
        self.steps += 1;
        true
    }

    fn localize(&mut self, key: &str, depth: usize) -> String {
        if !self.step(depth) {
            return String::new();
        }
        let locale = self.locale;
        let Some(table) = locale.languages.get(self.language) else {
            return String::new();
        };

        let localized = if let Some(value) = table.get(key) {
            self.entry_text(value, depth)
        } else if let Some((base, number)) = numbered_variant(key)
            && let Some(value) = table.get(base)
        {
            format!("{} {number}", self.entry_text(value, depth))
        } else {
            return String::new();
        };

        let localized = self.expand_first(&localized, "ENTITY", "entity-name", depth);
        self.expand_first(&localized, "ITEM", "item-name", depth)
    }

    fn entry_text(&mut self, value: &Value, depth: usize) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_to_string(n),
            Value::Array(_) => self.localize_array(value, depth + 1),
            _ => String::new(),
        }
    }

    /// Replace the first `__TAG__name__` token with `<section>.name`.
    fn expand_first(&mut self, text: &str, tag: &str, section: &str, depth: usize) -> String {
        let Some((range, name)) = find_token(text, tag) else {
            return text.to_string();
        };
        let replacement = self.localize(&format!("{section}.{name}"), depth + 1);
        let mut out = String::with_capacity(text.len() + replacement.len());
        out.push_str(&text[..range.start]);
        out.push_str(&replacement);
        out.push_str(&text[range.end..]);
        out
    }

    fn localize_array(&mut self, value: &Value, depth: usize) -> String {
        if !self.step(depth) {
            return String::new();
        }
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_to_string(n),
            Value::Array(items) => match items.first() {
                Some(key) if is_truthy(key) => {
                    let key = match key {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => number_to_string(n),
                        _ => return String::new(),
                    };
                    let template = self.localize(&key, depth + 1);
                    substitute_parameters(&template, |n| {
                        items
                            .get(n)
                            .map(|param| self.localize_array(param, depth + 1))
                            .unwrap_or_default()
                    })
                }
                _ => items
                    .iter()
                    .map(|item| self.localize_array(item, depth + 1))
                    .collect(),
            },
            _ => String::new(),
        }
    }
}

/// Split `<base>-<digits>` into its parts.
fn numbered_variant(key: &str) -> Option<(&str, &str)> {
    let (base, number) = key.rsplit_once('-')?;
    (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())).then_some((base, number))
}

/// Find the first `__TAG__name__` token where `name` contains no underscore.
fn find_token<'t>(text: &'t str, tag: &str) -> Option<(Range<usize>, &'t str)> {
    let prefix = format!("__{tag}__");
    let mut from = 0;
    while let Some(offset) = text[from..].find(&prefix) {
        let start = from + offset;
        let name_start = start + prefix.len();
        let name_end = text[name_start..]
            .find('_')
            .map_or(text.len(), |i| name_start + i);
        if text[name_end..].starts_with("__") {
            return Some((start..name_end + 2, &text[name_start..name_end]));
        }
        from = start + 1;
    }
    None
}

/// Replace every `__n__` parameter reference, left to right. Substituted text
/// is not rescanned.
fn substitute_parameters(template: &str, mut param: impl FnMut(usize) -> String) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("__") {
        let after = &rest[start + 2..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with("__") {
            out.push_str(&rest[..start]);
            let index = after[..digits].parse().unwrap_or(usize::MAX);
            out.push_str(&param(index));
            rest = &after[digits + 2..];
        } else {
            out.push_str(&rest[..start + 1]);
            rest = &rest[start + 1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(entries: &[(&str, Value)]) -> LocaleTable {
        let mut locale = LocaleTable::new();
        for (key, value) in entries {
            locale.insert("en", key, value.clone());
        }
        locale
    }

    // -----------------------------------------------------------------------
    // Key lookup
    // -----------------------------------------------------------------------

    #[test]
    fn verbatim_key() {
        let locale = table(&[("item-name.foo", json!("Foo Widget"))]);
        assert_eq!(locale.localize("en", "item-name.foo"), "Foo Widget");
    }

    #[test]
    fn missing_key_is_empty() {
        let locale = table(&[("item-name.foo", json!("Foo Widget"))]);
        assert_eq!(locale.localize("en", "item-name.bar"), "");
    }

    #[test]
    fn missing_language_is_empty() {
        let locale = table(&[("item-name.foo", json!("Foo Widget"))]);
        assert_eq!(locale.localize("de", "item-name.foo"), "");
    }

    #[test]
    fn numbered_variant_appends_number() {
        let locale = table(&[("technology-name.mining-productivity", json!("Mining productivity"))]);
        assert_eq!(
            locale.localize("en", "technology-name.mining-productivity-3"),
            "Mining productivity 3"
        );
    }

    #[test]
    fn numbered_variant_needs_known_base() {
        let locale = table(&[]);
        assert_eq!(locale.localize("en", "technology-name.unknown-2"), "");
    }

    #[test]
    fn numbered_variant_parsing() {
        assert_eq!(numbered_variant("a-b-12"), Some(("a-b", "12")));
        assert_eq!(numbered_variant("a-b"), None);
        assert_eq!(numbered_variant("a-"), None);
        assert_eq!(numbered_variant("a12"), None);
    }

    // -----------------------------------------------------------------------
    // Token expansion
    // -----------------------------------------------------------------------

    #[test]
    fn entity_token_expands() {
        let locale = table(&[
            ("a", json!("__ENTITY__bar__")),
            ("entity-name.bar", json!("Bar")),
        ]);
        assert_eq!(locale.localize("en", "a"), "Bar");
    }

    #[test]
    fn item_token_expands_inside_text() {
        let locale = table(&[
            ("recipe-name.fill", json!("Fill __ITEM__water__ barrel")),
            ("item-name.water", json!("Water")),
        ]);
        assert_eq!(locale.localize("en", "recipe-name.fill"), "Fill Water barrel");
    }

    #[test]
    fn only_first_token_of_each_kind_expands() {
        let locale = table(&[
            ("a", json!("__ITEM__x__ and __ITEM__y__")),
            ("item-name.x", json!("X")),
            ("item-name.y", json!("Y")),
        ]);
        assert_eq!(locale.localize("en", "a"), "X and __ITEM__y__");
    }

    #[test]
    fn entity_and_item_tokens_both_expand() {
        let locale = table(&[
            ("a", json!("__ENTITY__e__ / __ITEM__i__")),
            ("entity-name.e", json!("E")),
            ("item-name.i", json!("I")),
        ]);
        assert_eq!(locale.localize("en", "a"), "E / I");
    }

    #[test]
    fn token_names_stop_at_underscore() {
        assert_eq!(find_token("x __ITEM__a_b__", "ITEM"), None);
        let (range, name) = find_token("__ITEM__a__ __ITEM__b__", "ITEM").unwrap();
        assert_eq!(range, 0..11);
        assert_eq!(name, "a");
    }

    #[test]
    fn self_referential_entry_terminates() {
        let locale = table(&[("entity-name.loop", json!("__ENTITY__loop__"))]);
        assert_eq!(locale.localize("en", "entity-name.loop"), "");
    }

    // -----------------------------------------------------------------------
    // Localised-string arrays
    // -----------------------------------------------------------------------

    #[test]
    fn array_plain_values() {
        let locale = LocaleTable::new();
        assert_eq!(locale.localize_array("en", &json!("text")), "text");
        assert_eq!(locale.localize_array("en", &json!(42)), "42");
    }

    #[test]
    fn array_with_parameters() {
        let locale = table(&[
            ("item-name.barrel", json!("__1__ barrel")),
            ("fluid-name.water", json!("Water")),
        ]);
        let value = json!(["item-name.barrel", ["fluid-name.water"]]);
        assert_eq!(locale.localize_array("en", &value), "Water barrel");
    }

    #[test]
    fn array_parameters_are_global() {
        let locale = table(&[("pair", json!("__1__ + __2__ = __1____2__"))]);
        let value = json!(["pair", "a", 7]);
        assert_eq!(locale.localize_array("en", &value), "a + 7 = a7");
    }

    #[test]
    fn array_with_empty_head_concatenates() {
        let locale = table(&[("item-name.gear", json!("Gear"))]);
        let value = json!(["", ["item-name.gear"], " x", 2]);
        assert_eq!(locale.localize_array("en", &value), "Gear x2");
    }

    #[test]
    fn array_out_of_range_parameter_is_empty() {
        let locale = table(&[("k", json!("[__3__]"))]);
        assert_eq!(locale.localize_array("en", &json!(["k", "a"])), "[]");
    }

    #[test]
    fn locale_entry_may_itself_be_an_array() {
        let locale = table(&[
            ("item-name.alias", json!(["item-name.real"])),
            ("item-name.real", json!("Real")),
        ]);
        assert_eq!(locale.localize("en", "item-name.alias"), "Real");
    }

    #[test]
    fn self_referential_array_terminates() {
        let locale = table(&[("k", json!("<__1__>"))]);
        let mut value = json!("end");
        for _ in 0..100 {
            value = json!(["k", value]);
        }
        let out = locale.localize_array("en", &value);
        assert!(out.starts_with("<<"));
        assert!(!out.contains("end"));
    }

    #[test]
    fn wide_self_reference_stays_within_budget() {
        let wide = json!(["", ["a"], ["a"], ["a"], ["a"], ["a"], ["a"], ["a"], ["a"]]);
        let locale = table(&[("a", wide.clone()), ("item-name.b", json!("B"))]);
        let started = std::time::Instant::now();
        assert_eq!(locale.localize("en", "a"), "");
        assert_eq!(locale.localize_array("en", &wide), "");
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        // the budget is per call
        assert_eq!(locale.localize("en", "item-name.b"), "B");
    }

    #[test]
    fn deserializes_from_payload_shape() {
        let locale: LocaleTable = serde_json::from_value(json!({
            "en": {"item-name.foo": "Foo"},
            "de": {"item-name.foo": "Fuu"}
        }))
        .unwrap();
        assert_eq!(locale.languages().collect::<Vec<_>>(), vec!["de", "en"]);
        assert_eq!(locale.localize("de", "item-name.foo"), "Fuu");
        assert_eq!(locale.len("en"), 1);
        assert!(locale.contains("en", "item-name.foo"));
    }
}
