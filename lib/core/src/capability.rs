//! External capability contracts
//!
//! The pipeline consumes three capabilities: a structured data source, a
//! text-completion model, and an image-understanding model. Each is a trait
//! so adapters (SQL, HTTP model clients) stay outside the core and tests can
//! substitute scripted implementations.
//!
//! A failed capability call never aborts a resolution. Call sites collapse
//! failures to an empty intermediate value through [`or_empty`] /
//! [`fields_or_empty`], which log the failure and let the fallback chain
//! absorb it.

use ahash::AHashMap;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub type CapabilityResult<T> = std::result::Result<T, CapabilityError>;

#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Chat model error: {0}")]
    ChatModel(String),

    #[error("Vision model error: {0}")]
    VisionModel(String),
}

/// Typed field lookup returned by a structured data source.
///
/// Unknown or empty fields are simply absent, so "field missing" is a checked
/// case everywhere it is consumed. Adapters must not insert empty values.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    fields: AHashMap<String, String>,
}

impl FieldValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field value. Empty values are dropped so that presence
    /// always means a usable value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.fields.insert(name.into(), value);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Walk `names` in order and return the first present value.
    #[must_use]
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Structured data source keyed by product identifier.
#[async_trait]
pub trait FieldSource: Send + Sync {
    /// Fetch the requested fields for a product. Unknown field names are
    /// absent from the result; a missing product yields an empty result,
    /// not an error.
    async fn fetch_fields(
        &self,
        product_id: &str,
        field_names: &[&str],
    ) -> CapabilityResult<FieldValues>;
}

/// Text-completion model. Expected to return a short, single-line answer.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> CapabilityResult<String>;
}

/// Image-understanding model. Only invoked after the caller has checked that
/// the image exists and has a supported extension.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn describe(&self, image: &Path, question: &str) -> CapabilityResult<String>;
}

/// Collapse a capability answer to a trimmed string, logging the failure.
pub fn or_empty(outcome: CapabilityResult<String>, context: &str) -> String {
    match outcome {
        Ok(answer) => answer.trim().to_string(),
        Err(err) => {
            warn!("{context} unavailable: {err}");
            String::new()
        }
    }
}

/// Collapse a field fetch to an empty lookup, logging the failure.
pub fn fields_or_empty(outcome: CapabilityResult<FieldValues>, context: &str) -> FieldValues {
    match outcome {
        Ok(fields) => fields,
        Err(err) => {
            warn!("{context} unavailable: {err}");
            FieldValues::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_dropped() {
        let mut fields = FieldValues::new();
        fields.insert("upper", "牛皮革");
        fields.insert("lining", "");
        fields.insert("outsole", "   ");

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("upper"), Some("牛皮革"));
        assert_eq!(fields.get("lining"), None);
    }

    #[test]
    fn test_first_of_order() {
        let mut fields = FieldValues::new();
        fields.insert("帮面材质", "织物");
        fields.insert("材质", "真皮");

        assert_eq!(fields.first_of(&["鞋面材质", "帮面材质", "材质"]), Some("织物"));
        assert_eq!(fields.first_of(&["鞋垫材质"]), None);
    }

    #[test]
    fn test_or_empty_collapses_failure() {
        let failed: CapabilityResult<String> =
            Err(CapabilityError::ChatModel("timeout".to_string()));
        assert_eq!(or_empty(failed, "value match"), "");
        assert_eq!(or_empty(Ok("  真皮 \n".to_string()), "value match"), "真皮");
    }
}
