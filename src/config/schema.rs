//! Configuration schema.
//!
//! Everything is optional in the file; defaults produce a service bound
//! to localhost with the standard 25/5/20/4 timer.

use serde::{Deserialize, Serialize};

use crate::timer::PomodoroConfig;

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerSection,
    /// Default timer configuration installed at startup.
    pub timer: PomodoroConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Address to bind, e.g. `127.0.0.1:8787`.
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}
