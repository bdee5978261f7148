use serde::Serialize;
use std::collections::BTreeMap;

/// Per-field validation messages, keyed by request field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Length in characters, not bytes
    pub fn check_len(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            if min == max {
                self.insert(field, format!("must be exactly {} characters", min));
            } else {
                self.insert(field, format!("must be between {} and {} characters", min, max));
            }
        }
    }

    pub fn check_range(&mut self, field: &str, value: i32, min: i32, max: i32) {
        if value < min || value > max {
            self.insert(field, format!("must be between {} and {}", min, max));
        }
    }
}

/// Request bodies that carry field constraints
pub trait Validate {
    fn field_errors(&self) -> FieldErrors;

    fn validate(&self) -> Result<(), FieldErrors> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
