//! lodge-config
//!
//! Property settings (name, currency, invoice prefix, time offset, storage roots)
//! and their persistence with timestamped backups.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
