mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{CollectionConfig, Config, LoggingConfig, SortOrder};
