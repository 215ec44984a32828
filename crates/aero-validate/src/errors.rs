//! Per-row error accumulation.

/// Collects every reason a row fails, in check order.
///
/// Checks never short-circuit; the accept decision is taken once all checks
/// have run, from [`RowErrors::is_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowErrors {
    errors: Vec<String>,
}

impl RowErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Records `message` when `ok` is false.
    pub fn check(&mut self, ok: bool, message: impl FnOnce() -> String) {
        if !ok {
            self.errors.push(message());
        }
    }

    /// One entry naming every missing field, or nothing.
    pub fn missing_fields(&mut self, missing: &[&str]) {
        if !missing.is_empty() {
            self.push(format!("Missing required fields: {}", missing.join(", ")));
        }
    }

    pub fn invalid_format(&mut self, field: &str) {
        self.push(format!("Invalid format: {field}"));
    }

    pub fn invalid_value(&mut self, field: &str, requirement: &str) {
        self.push(format!("Invalid value: {field} {requirement}"));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<String> {
        self.errors
    }
}

impl From<RowErrors> for Vec<String> {
    fn from(errors: RowErrors) -> Self {
        errors.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_order() {
        let mut errors = RowErrors::new();
        errors.missing_fields(&[]);
        assert!(errors.is_empty());

        errors.missing_fields(&["last_name", "document_number"]);
        errors.invalid_format("email");
        errors.check(true, || "unreachable".to_string());
        errors.invalid_value("total_seats", "must be a positive integer");

        insta::assert_debug_snapshot!(errors.into_vec(), @r#"
        [
            "Missing required fields: last_name, document_number",
            "Invalid format: email",
            "Invalid value: total_seats must be a positive integer",
        ]
        "#);
    }
}
