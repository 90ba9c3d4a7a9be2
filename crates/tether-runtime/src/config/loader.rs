//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults ([`TetherConfig::default`])
//! 2. Profile-specific config file (`tether.{profile}.toml` / `.yaml`)
//! 3. Main config file (`tether.toml` / `tether.yaml`)
//! 4. Environment variables (`TETHER_*`, `__` as section separator)
//!
//! Files are searched in the working directory, then in the user
//! configuration directory under `tether/`. The `toml-config` and
//! `yaml-config` features select the formats; with neither enabled only
//! defaults and environment variables apply.
//!
//! # Environment Variable Mapping
//!
//! - `TETHER_MODE=client` → `mode = "client"`
//! - `TETHER_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `TETHER_SCOUTING__TIMEOUT_MS=500` → `scouting.timeout_ms = 500`
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! let core = config.to_core_config()?;
//! let session = Session::open(&engine, &core)?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::debug;

use crate::config::schema::TetherConfig;
use crate::config::validation;
use crate::error::{ConfigError, ConfigResult};

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads `TETHER_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var("TETHER_PROFILE")
            .map(|p| match p.to_lowercase().as_str() {
                "production" | "prod" => Self::Production,
                "development" | "dev" => Self::Development,
                other => Self::Custom(other.to_string()),
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Multi-source configuration loader.
///
/// # Example
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .profile(Profile::Production)
///     .file("./config/tether.toml")
///     .load()?;
/// ```
pub struct ConfigLoader {
    figment: Figment,
    profile: Profile,
    explicit_file: Option<PathBuf>,
    with_env: bool,
}

impl ConfigLoader {
    /// Creates a loader seeded with the built-in defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(TetherConfig::default())),
            profile: Profile::from_env(),
            explicit_file: None,
            with_env: true,
        }
    }

    /// Selects a profile explicitly instead of reading `TETHER_PROFILE`.
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Loads exactly this file instead of searching default locations.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Disables the `TETHER_*` environment layer.
    pub fn without_env(mut self) -> Self {
        self.with_env = false;
        self
    }

    /// Merges programmatic overrides on top of every other source.
    pub fn merge(mut self, config: &TetherConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config.clone()));
        self
    }

    /// Extracts and validates the configuration.
    pub fn load(self) -> ConfigResult<TetherConfig> {
        let mut figment = self.figment;

        match &self.explicit_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.display().to_string()));
                }
                figment = merge_file(figment, path);
            }
            None => {
                for path in search_paths(&self.profile) {
                    if path.exists() {
                        debug!(path = %path.display(), "merging configuration file");
                        figment = merge_file(figment, &path);
                    }
                }
            }
        }

        if self.with_env {
            figment = figment.merge(Env::prefixed("TETHER_").split("__"));
        }

        let config: TetherConfig = figment.extract()?;
        validation::validate(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(unused_variables, unused_mut)]
fn merge_file(mut figment: Figment, path: &Path) -> Figment {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match extension {
        #[cfg(feature = "toml-config")]
        "toml" => figment = figment.merge(Toml::file(path)),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => figment = figment.merge(Yaml::file(path)),
        _ => {
            debug!(path = %path.display(), "skipping file with unsupported extension");
        }
    }
    figment
}

/// Candidate file locations, most specific first so later merges win:
/// profile files rank above the main file, working directory above the
/// user configuration directory.
fn search_paths(profile: &Profile) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let names = [format!("tether.{profile}"), "tether".to_string()];

    #[allow(unused_mut)]
    let mut extensions: Vec<&str> = Vec::new();
    #[cfg(feature = "toml-config")]
    extensions.push("toml");
    #[cfg(feature = "yaml-config")]
    {
        extensions.push("yaml");
        extensions.push("yml");
    }

    let mut roots = vec![PathBuf::from(".")];
    if let Some(config_dir) = dirs::config_dir() {
        roots.push(config_dir.join("tether"));
    }

    // Reverse priority: figment's later merges override earlier ones.
    for root in roots.iter().rev() {
        for name in names.iter().rev() {
            for extension in &extensions {
                paths.push(root.join(format!("{name}.{extension}")));
            }
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Mode;

    #[test]
    fn defaults_load_without_any_sources() {
        let config = ConfigLoader::new().without_env().load().unwrap();
        assert_eq!(config, TetherConfig::default());
    }

    #[test]
    fn programmatic_overrides_win() {
        let mut overrides = TetherConfig::default();
        overrides.mode = Mode::Router;
        overrides.listen.push("tcp/0.0.0.0:7447".to_string());

        let config = ConfigLoader::new()
            .without_env()
            .merge(&overrides)
            .load()
            .unwrap();
        assert_eq!(config.mode, Mode::Router);
        assert_eq!(config.listen, ["tcp/0.0.0.0:7447"]);
    }

    #[test]
    fn invalid_overrides_fail_validation() {
        let mut overrides = TetherConfig::default();
        overrides.connect.push("no-scheme".to_string());
        let result = ConfigLoader::new().without_env().merge(&overrides).load();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = ConfigLoader::new()
            .without_env()
            .file("/definitely/not/here/tether.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn profile_names_render() {
        assert_eq!(Profile::Development.to_string(), "development");
        assert_eq!(Profile::Custom("staging".into()).to_string(), "staging");
    }
}
