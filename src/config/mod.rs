//! Service configuration: schema, YAML loader, and validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_or_default};
pub use schema::{AppConfig, ServerSection};
