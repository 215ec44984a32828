//! Text cleaning applied before validation.

use aero_model::{CellValue, RawRecord};

/// Trims text; text that trims to empty becomes [`CellValue::Missing`].
///
/// Non-text values are returned unchanged. Cleaning a cleaned value returns
/// it unchanged.
pub fn clean_value(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                CellValue::Missing
            } else {
                CellValue::text(trimmed)
            }
        }
        CellValue::Float(value) if value.is_nan() => CellValue::Missing,
        other => other.clone(),
    }
}

/// Copy of `record` with every field in `fields` cleaned.
///
/// Fields not listed, and listed fields the record does not have, are left
/// alone.
pub fn clean_record(record: &RawRecord, fields: &[&str]) -> RawRecord {
    let mut cleaned = record.clone();
    for field in fields {
        if record.contains(field) {
            cleaned.set(*field, clean_value(record.get(field)));
        }
    }
    cleaned
}

/// Cleaned, rendered text of an optional field.
pub(crate) fn optional_text(record: &RawRecord, field: &str) -> Option<String> {
    record.get(field).render_non_empty()
}

/// Cleaned, rendered text of a field the validator already required.
pub(crate) fn required_text(record: &RawRecord, field: &str) -> Result<String, String> {
    optional_text(record, field).ok_or_else(|| format!("Missing required fields: {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(&CellValue::text("  Anna ")), CellValue::text("Anna"));
        assert_eq!(clean_value(&CellValue::text("   ")), CellValue::Missing);
        assert_eq!(clean_value(&CellValue::Integer(5)), CellValue::Integer(5));
        assert_eq!(clean_value(&CellValue::Float(f64::NAN)), CellValue::Missing);
    }

    #[test]
    fn test_clean_record_only_touches_listed_fields() {
        let record = RawRecord::from_pairs(2, [("a", " x "), ("b", " y ")]);
        let cleaned = clean_record(&record, &["a", "c"]);
        assert_eq!(cleaned.get("a"), &CellValue::text("x"));
        assert_eq!(cleaned.get("b"), &CellValue::text(" y "));
        assert!(!cleaned.contains("c"));
        assert_eq!(cleaned.index, 2);
    }
}
