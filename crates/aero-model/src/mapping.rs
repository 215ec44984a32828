//! Canonical-value mapping tables.
//!
//! Raw textual variants (e.g. `PASSPORT`, `ECON`) are looked up by their
//! trimmed, upper-cased form and mapped to one fixed domain code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw variant to canonical code lookup for one category field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CanonicalMapping {
    entries: BTreeMap<String, String>,
}

impl CanonicalMapping {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(raw, canonical)| (lookup_key(raw.as_ref()), lookup_key(canonical.as_ref())))
            .filter(|(raw, _)| !raw.is_empty())
            .collect();
        Self { entries }
    }

    /// Canonical code for `raw`, if the variant is known.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.entries.get(&lookup_key(raw)).map(String::as_str)
    }

    /// Canonical code for `raw`; unknown variants pass through upper-cased.
    pub fn canonicalize(&self, raw: &str) -> String {
        self.resolve(raw)
            .map_or_else(|| lookup_key(raw), ToString::to_string)
    }

    pub fn is_known(&self, raw: &str) -> bool {
        self.resolve(raw).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(raw, canonical)| (raw.as_str(), canonical.as_str()))
    }
}

impl From<BTreeMap<String, String>> for CanonicalMapping {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self::from_pairs(entries)
    }
}

impl From<CanonicalMapping> for BTreeMap<String, String> {
    fn from(mapping: CanonicalMapping) -> Self {
        mapping.entries
    }
}

fn lookup_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The three category tables a run canonicalizes against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingTables {
    pub document_type: CanonicalMapping,
    pub booking_status: CanonicalMapping,
    pub fare_class: CanonicalMapping,
}

impl Default for MappingTables {
    fn default() -> Self {
        Self {
            document_type: CanonicalMapping::from_pairs([
                ("PASSPORT_RF", "PASSPORT_RF"),
                ("INTERNATIONAL_PASSPORT", "INTERNATIONAL_PASSPORT"),
                ("BIRTH_CERTIFICATE", "BIRTH_CERTIFICATE"),
                ("MILITARY_ID", "MILITARY_ID"),
                ("SEAMAN_ID", "SEAMAN_ID"),
                ("PASSPORT", "INTERNATIONAL_PASSPORT"),
                ("PASSPORT_INTERNATIONAL", "INTERNATIONAL_PASSPORT"),
            ]),
            booking_status: CanonicalMapping::from_pairs(
                ["PENDING", "CONFIRMED", "PAID", "CANCELLED", "REFUNDED", "EXPIRED"]
                    .map(|code| (code, code)),
            ),
            fare_class: CanonicalMapping::from_pairs([
                ("ECONOMY", "ECONOMY"),
                ("BUSINESS", "BUSINESS"),
                ("FIRST", "FIRST"),
                ("ECON", "ECONOMY"),
                ("BUS", "BUSINESS"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_variants_map_to_canonical_code() {
        let tables = MappingTables::default();
        assert_eq!(
            tables.document_type.canonicalize(" passport "),
            "INTERNATIONAL_PASSPORT"
        );
        assert_eq!(tables.fare_class.canonicalize("Econ"), "ECONOMY");
        assert_eq!(tables.booking_status.canonicalize("paid"), "PAID");
    }

    #[test]
    fn unknown_variants_pass_through_upper_cased() {
        let tables = MappingTables::default();
        assert_eq!(tables.fare_class.canonicalize("premium"), "PREMIUM");
        assert!(!tables.fare_class.is_known("premium"));
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let tables = MappingTables::default();
        let once = tables.document_type.canonicalize("passport");
        assert_eq!(tables.document_type.canonicalize(&once), once);
    }

    #[test]
    fn keys_are_normalized_when_deserialized() {
        let mapping: CanonicalMapping =
            serde_json::from_str(r#"{"econ ": "economy"}"#).expect("mapping");
        assert_eq!(mapping.resolve("ECON"), Some("ECONOMY"));
    }
}
