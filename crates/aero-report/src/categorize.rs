//! Coarse grouping of error messages.

use std::collections::BTreeMap;

/// Category of messages without a `category: detail` shape.
pub const GENERAL_CATEGORY: &str = "General";

/// Text before the first `:`, or [`GENERAL_CATEGORY`].
pub fn error_category(message: &str) -> &str {
    match message.split_once(':') {
        Some((category, _)) => category.trim(),
        None => GENERAL_CATEGORY,
    }
}

/// Number of messages per category.
pub fn categorize_errors<'a, I>(messages: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut categories = BTreeMap::new();
    for message in messages {
        *categories
            .entry(error_category(message).to_string())
            .or_insert(0) += 1;
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_is_leading_token() {
        assert_eq!(
            error_category("Missing required fields: last_name"),
            "Missing required fields"
        );
        assert_eq!(
            error_category("Flight creation failed: AB123: integrity violation on flight: x"),
            "Flight creation failed"
        );
        assert_eq!(error_category("something odd"), GENERAL_CATEGORY);
    }

    #[test]
    fn test_categorize_counts() {
        let categories = categorize_errors([
            "Invalid format: email",
            "Invalid format: date_of_birth",
            "Unresolved reference: flight ZZ1 not found",
            "no colon here",
        ]);
        insta::assert_debug_snapshot!(categories, @r#"
        {
            "General": 1,
            "Invalid format": 2,
            "Unresolved reference": 1,
        }
        "#);
    }
}
