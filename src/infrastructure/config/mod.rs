//! Loader configuration.
//!
//! Layers, later wins:
//! - built-in defaults
//! - a TOML file (default `loader.toml`, optional)
//! - `LOADER_*` environment variables, `__` separating sections
//!   (`LOADER_DATABASE__PASSWORD`, `LOADER_CSV__PATH`)
//!
//! Credentials have no default and are never written back out.

use crate::domain::error::{LoadError, Result};
use crate::domain::mapping::Mapping;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "loader.toml";
pub const ENV_PREFIX: &str = "LOADER_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub database: DatabaseSettings,
    pub csv: CsvSettings,
    pub mapping: Mapping,
}

impl LoaderConfig {
    pub fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(LoaderConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .map_err(|e| LoadError::Config(format!("Failed to load configuration: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Full connection URL. Takes precedence over the individual fields.
    pub url: Option<String>,
    pub driver: String,
    pub host: String,
    pub port: Option<u16>,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub name: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            driver: "mysql".to_string(),
            host: "localhost".to_string(),
            port: None,
            user: None,
            password: None,
            name: None,
        }
    }
}

impl DatabaseSettings {
    /// Assemble the connection URL, percent-encoding credentials.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }

        let name = required(self.name.as_deref(), "database.name")?;

        if self.driver.eq_ignore_ascii_case("sqlite") {
            // rwc: create the file on first use
            return Ok(format!("sqlite://{}?mode=rwc", name));
        }

        let user = required(self.user.as_deref(), "database.user")?;

        let mut url = Url::parse(&format!("{}://{}", self.driver, self.host))
            .map_err(|e| LoadError::Config(format!("Invalid database host '{}': {e}", self.host)))?;
        url.set_username(user)
            .map_err(|_| LoadError::Config("Cannot set database user".to_string()))?;
        url.set_password(self.password.as_deref())
            .map_err(|_| LoadError::Config("Cannot set database password".to_string()))?;
        url.set_port(self.port)
            .map_err(|_| LoadError::Config("Cannot set database port".to_string()))?;
        url.set_path(&format!("/{}", name));

        Ok(url.to_string())
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LoadError::Config(format!("{} is required", key)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    pub path: PathBuf,
    pub delimiter: char,
    pub trim: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data.csv"),
            delimiter: ',',
            trim: false,
        }
    }
}

impl CsvSettings {
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                LoadError::Config(format!(
                    "CSV delimiter '{}' must be a single ASCII character",
                    self.delimiter
                ))
            })
    }
}
