pub mod field;
pub mod schemas;

use std::collections::HashMap;

use crate::error::ApiError;

/// Field-path-keyed validation messages, the shape form controllers render
pub type FieldErrors = HashMap<String, String>;

/// A declarative validation schema over a form draft.
///
/// `check` collects every broken rule into a field error map; the provided
/// `validate` turns a non-empty map into the normalized validation error.
/// Validation failures never reach the network and never toast.
pub trait Schema {
    fn check(&self) -> FieldErrors;

    fn validate(&self) -> Result<(), ApiError> {
        let errors = self.check();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation("Please fix the highlighted fields.", errors))
        }
    }
}

/// Collector for schema rules; keeps the first message per field like the
/// form screens display it.
#[derive(Debug, Default)]
pub struct Rules {
    errors: FieldErrors,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Require `present`; on failure record `message` and report false so
    /// dependent rules can short-circuit
    pub fn require(&mut self, field: &str, present: bool, message: &str) -> bool {
        if !present {
            self.fail(field, message);
        }
        present
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}
