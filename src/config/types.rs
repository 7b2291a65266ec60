use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{json, Policy};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How replayed JSON records are keyed and ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Field holding each record's unique key (default: "id").
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Field to keep the collection sorted by. Unset means insertion order.
    #[serde(default)]
    pub sort_field: Option<String>,
    /// Direction of the sort (default: ascending).
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset (default: "warn").
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            sort_field: None,
            sort_order: SortOrder::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CollectionConfig {
    /// Build the identity and ordering policy for JSON records.
    pub fn policy(&self) -> Policy<String, Value> {
        let id_field = self.id_field.clone();
        let policy = Policy::new(move |entity: &Value| json::key_of(entity, &id_field));

        match &self.sort_field {
            Some(field) => {
                let field = field.clone();
                let order = self.sort_order;
                policy.with_sort_comparer(move |a, b| {
                    let ordering = json::compare_field(a, b, &field);
                    match order {
                        SortOrder::Ascending => ordering,
                        SortOrder::Descending => ordering.reverse(),
                    }
                })
            }
            None => policy,
        }
    }
}
