//! Configuration loading
//!
//! Resolution order:
//! 1. `<config dir>/config.yml` when a config directory is given and the
//!    file exists
//! 2. the built-in default document
//!
//! A mission override then replaces `selected_mission`.

use crate::error::{ConfigError, ConfigResult};
use crate::mission::MissionConfig;
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// Environment variable naming the directory holding `config.yml`
pub const CONFIG_DIR_ENV: &str = "SWXSOC_CONFIGDIR";

/// Environment variable selecting the active mission
pub const MISSION_ENV: &str = "SWXSOC_MISSION";

/// Configuration file name looked up inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Built-in configuration document
pub const DEFAULT_CONFIG: &str = include_str!("../data/config.yml");

/// Builder for loading [`Settings`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLoader {
    config_dir: Option<PathBuf>,
    mission_override: Option<String>,
}

impl ConfigLoader {
    /// Loader with no config directory and no override
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader configured from `SWXSOC_CONFIGDIR` and `SWXSOC_MISSION`
    ///
    /// Empty variables are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            config_dir: read(CONFIG_DIR_ENV).map(PathBuf::from),
            mission_override: read(MISSION_ENV),
        }
    }

    /// With config directory
    #[inline]
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// With mission override
    #[inline]
    #[must_use]
    pub fn with_mission(mut self, mission: impl Into<String>) -> Self {
        self.mission_override = Some(mission.into());
        self
    }

    /// Config directory, if any
    #[inline]
    #[must_use]
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// Mission override, if any
    #[inline]
    #[must_use]
    pub fn mission_override(&self) -> Option<&str> {
        self.mission_override.as_deref()
    }

    /// Load the configuration document with the override applied
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the config file exists but cannot be
    /// read, [`ConfigError::Yaml`] if it cannot be decoded.
    pub fn load(&self) -> ConfigResult<Settings> {
        let mut settings = match self.config_file() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::io_error(&path, e))?;
                tracing::debug!(path = %path.display(), "loading configuration file");
                Settings::from_yaml(&content, path.display().to_string())?
            }
            None => {
                tracing::debug!("loading built-in configuration");
                Settings::from_yaml(DEFAULT_CONFIG, "built-in config.yml")?
            }
        };

        if let Some(mission) = &self.mission_override {
            settings.selected_mission.clone_from(mission);
        }
        Ok(settings)
    }

    /// Load the configuration and resolve the selected mission
    ///
    /// # Errors
    /// Any error from [`ConfigLoader::load`] or
    /// [`Settings::active_mission`].
    pub fn load_mission(&self) -> ConfigResult<MissionConfig> {
        self.load()?.active_mission()
    }

    fn config_file(&self) -> Option<PathBuf> {
        let path = self.config_dir.as_ref()?.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Some(path)
        } else {
            tracing::warn!(
                path = %path.display(),
                "config directory has no {CONFIG_FILE_NAME}, using built-in configuration"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn built_in_defaults_to_swxsoc() {
        let mission = ConfigLoader::new().load_mission().unwrap();
        assert_eq!(mission.mission_prefix(), "swxsoc");
        assert_eq!(mission.file_extension(), ".cdf");
        assert_eq!(
            mission.instrument_names().collect::<Vec<_>>(),
            vec!["eea", "nemisis", "merit", "spani"]
        );
    }

    #[test]
    fn built_in_defines_hermes() {
        let mission = ConfigLoader::new().with_mission("hermes").load_mission().unwrap();
        assert_eq!(mission.mission_prefix(), "hermes");
        assert_eq!(mission.instrument_by_name("merit").unwrap().shortname, "mrt");
    }

    #[test]
    fn override_to_unknown_mission_fails() {
        let result = ConfigLoader::new().with_mission("veeger").load_mission();
        assert!(matches!(result, Err(ConfigError::UnknownMission { .. })));
    }

    #[test]
    fn missing_config_file_falls_back_to_built_in() {
        let dir = tempfile::tempdir().unwrap();
        let mission = ConfigLoader::new()
            .with_config_dir(dir.path())
            .load_mission()
            .unwrap();
        assert_eq!(mission.mission_prefix(), "swxsoc");
    }

    #[test]
    fn builder_accessors() {
        let loader = ConfigLoader::new().with_config_dir("/tmp").with_mission("hermes");
        assert_eq!(loader.config_dir(), Some(Path::new("/tmp")));
        assert_eq!(loader.mission_override(), Some("hermes"));
    }
}
