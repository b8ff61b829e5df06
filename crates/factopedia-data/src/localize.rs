//! Title and description resolution for records.
//!
//! For each record in the fallback chain, in order:
//!
//! 1. an explicit raw override (`localised_name` / `localised_description`),
//!    evaluated as a localised-string value;
//! 2. the locale key `<type>-<field>.<name>`, trying the record's type and
//!    then each supertype;
//! 3. the record's [`Record::fallback`] target, resolved the same way.

use crate::catalog::Catalog;
use crate::hierarchy::type_chain;
use crate::raw::is_truthy;
use crate::record::Record;

/// Maximum number of fallback hops followed from one record.
pub const MAX_FALLBACK_DEPTH: usize = 8;

impl Catalog {
    /// Resolve a localized string for `record`, or `None` on a miss. An
    /// empty result counts as a miss.
    pub fn localize_record<'c>(
        &'c self,
        language: &str,
        record: &'c dyn Record,
        raw_field: &str,
        locale_field: &str,
    ) -> Option<String> {
        let mut current = record;
        for _ in 0..=MAX_FALLBACK_DEPTH {
            if let Some(value) = current.raw().get(raw_field)
                && is_truthy(value)
            {
                let text = self.localize_array(language, value);
                return (!text.is_empty()).then_some(text);
            }

            for kind in type_chain(current.kind()) {
                let key = format!("{kind}-{locale_field}.{}", current.name());
                let text = self.localize(language, &key);
                if !text.is_empty() {
                    return Some(text);
                }
            }

            match current.fallback(self) {
                Some(next) if !(next.kind() == current.kind() && next.name() == current.name()) => {
                    current = next;
                }
                _ => return None,
            }
        }
        tracing::warn!(
            kind = record.kind(),
            name = record.name(),
            "localization fallback chain too long"
        );
        None
    }

    /// A record's display title, or its raw name when nothing localizes.
    pub fn localized_title(&self, language: &str, record: &dyn Record) -> String {
        self.localize_record(language, record, "localised_name", "name")
            .unwrap_or_else(|| record.name().to_string())
    }

    /// A record's description, or `""` when nothing localizes.
    pub fn description(&self, language: &str, record: &dyn Record) -> String {
        self.localize_record(language, record, "localised_description", "description")
            .unwrap_or_default()
    }
}
