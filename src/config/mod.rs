/// Database connection and schema creation
pub mod database;

/// Settings file, secrets and the derived URL
pub mod settings;

pub use settings::{AppConfig, load_config, load_default_config};
