//! Server configuration.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> explicit config file -> environment -> overrides.
//! The user file lives at `<config dir>/incident-timeline/config.toml`, the
//! workspace file at `.incident-timeline/config.toml`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the workspace-level config file.
pub const WORKSPACE_CONFIG_DIR: &str = ".incident-timeline";

/// Prefix for environment overrides, e.g. `INCIDENT_TIMELINE_OUTPUT__PRETTY_JSON`.
pub const ENV_PREFIX: &str = "INCIDENT_TIMELINE_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Name reported in `serverInfo`.
    pub name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: "incident-timeline-extractor".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print tool results with a two-space indent.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when neither `RUST_LOG` nor `-v`/`-q` is given.
    pub level: String,
    /// When set, JSON logs are also written to daily files in this directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "incident-timeline", "incident-timeline")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace config file under `workspace`.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_CONFIG_DIR).join("config.toml")
}

/// Load configuration with layered sources.
///
/// Later layers win:
/// 1. Built-in defaults
/// 2. User config
/// 3. Workspace config
/// 4. `config_file`, when given (must exist)
/// 5. Environment variables prefixed with `INCIDENT_TIMELINE_`, `__` nesting
/// 6. Explicit overrides
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&ServerConfig>,
) -> Result<ServerConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        if !path.is_file() {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}
