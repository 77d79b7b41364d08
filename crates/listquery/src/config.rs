//! Per-call engine configuration.

use serde::{Deserialize, Serialize};

/// Which fields free-text search consults and which field the date range
/// applies to.
///
/// Supplied fresh on every call; the engine does not validate the names.
///
/// ```
/// use listquery::EngineConfig;
///
/// let config = EngineConfig::new()
///     .searchable(["code", "name"])
///     .date_field("created_at");
/// assert_eq!(config.searchable_fields, vec!["code", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fields consulted by `q`, in order.
    #[serde(alias = "searchableFields")]
    pub searchable_fields: Vec<String>,
    /// Field used by `date_from` / `date_to`.
    #[serde(alias = "dateField", skip_serializing_if = "Option::is_none")]
    pub date_field: Option<String>,
}

impl EngineConfig {
    /// Creates a config with no searchable fields and no date field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends searchable fields.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sets the date field.
    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let config = EngineConfig::new().searchable(["a"]).searchable(vec![String::from("b")]);
        assert_eq!(config.searchable_fields, vec!["a", "b"]);
        assert_eq!(config.date_field, None);
    }

    #[test]
    fn deserializes_snake_and_camel_case() {
        let snake: EngineConfig =
            serde_json::from_str(r#"{"searchable_fields":["code"],"date_field":"issued"}"#)
                .unwrap();
        let camel: EngineConfig =
            serde_json::from_str(r#"{"searchableFields":["code"],"dateField":"issued"}"#).unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.date_field.as_deref(), Some("issued"));
    }

    #[test]
    fn missing_keys_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::new());
    }
}
