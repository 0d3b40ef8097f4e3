//! Settings for the application, read from an optional `settings.toml` and
//! from `EVENT_PLANNER_*` environment variables (nested keys joined by `__`,
//! e.g. `EVENT_PLANNER_SERVER__PORT=8080`).
//!
//! See `settings.toml` at the repository root for an example.

use base64::{Engine as _, prelude::BASE64_STANDARD};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use server::Key;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    /// Base64 of at least 64 random bytes used to sign session cookies.
    pub secret_key: Option<String>,
    pub secure_cookies: bool,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.secure_cookies", false)?
            .set_default("server.database.sqlite", "event_planner.db")?
            .add_source(
                File::with_name("settings")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("EVENT_PLANNER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

impl Server {
    /// The configured cookie signing key, if any.
    pub fn session_key(
        &self,
    ) -> Result<Option<Key>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(encoded) = &self.secret_key else {
            return Ok(None);
        };
        let bytes = BASE64_STANDARD.decode(encoded.trim())?;
        let key = Key::try_from(bytes.as_slice())
            .map_err(|_| "secret_key must decode to at least 64 bytes")?;
        Ok(Some(key))
    }
}
