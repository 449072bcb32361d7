//! Configuration document schema
//!
//! Mirrors the layout of `config.yml`: general settings, the selected
//! mission, per-mission data, download settings and logger settings.

use crate::error::{ConfigError, ConfigResult};
use crate::mission::{InstrumentConfig, MissionConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whole configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,
    /// Mission used when no override is given
    pub selected_mission: String,
    /// Mission definitions keyed by mission name, in file order
    pub missions_data: IndexMap<String, MissionData>,
    /// Download settings
    #[serde(default)]
    pub downloads: DownloadSettings,
    /// Logger settings
    #[serde(default)]
    pub logger: LoggerSettings,
}

impl Settings {
    /// Decode a configuration document
    ///
    /// `origin` names the document in error messages.
    ///
    /// # Errors
    /// Returns [`ConfigError::Yaml`] if the document does not match the schema.
    pub fn from_yaml(content: &str, origin: impl Into<String>) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            origin: origin.into(),
            source,
        })
    }

    /// Names of all configured missions
    pub fn mission_names(&self) -> impl Iterator<Item = &str> {
        self.missions_data.keys().map(String::as_str)
    }

    /// Resolve the selected mission
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownMission`] if `selected_mission` has no
    /// entry, or [`ConfigError::Invalid`] if the entry fails validation.
    pub fn active_mission(&self) -> ConfigResult<MissionConfig> {
        self.mission(&self.selected_mission)
    }

    /// Resolve a named mission
    ///
    /// # Errors
    /// Same as [`Settings::active_mission`].
    pub fn mission(&self, name: &str) -> ConfigResult<MissionConfig> {
        let data = self
            .missions_data
            .get(name)
            .ok_or_else(|| ConfigError::UnknownMission {
                mission: name.to_string(),
                available: self.mission_names().map(str::to_string).collect(),
            })?;

        let mission = MissionConfig::new(
            name,
            data.file_extension.clone(),
            data.instruments.clone(),
        )?;
        match &data.data_levels {
            Some(levels) => mission.with_data_levels(levels.clone()),
            None => Ok(mission),
        }
    }
}

/// `general` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// strftime-style format used when displaying times
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
        }
    }
}

fn default_time_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

/// One entry of `missions_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionData {
    /// File extension for science files, with leading dot
    pub file_extension: String,
    /// Instrument table
    pub instruments: Vec<InstrumentConfig>,
    /// Optional finite set of data levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_levels: Option<Vec<String>>,
}

/// `downloads` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Directory for downloaded data
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
        }
    }
}

fn default_download_dir() -> String {
    "data".to_string()
}

/// `logger` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Console log level (`DEBUG`, `INFO`, ...)
    pub log_level: String,
    /// Colorize console output
    pub use_color: bool,
    /// Route warnings through the logger
    pub log_warnings: bool,
    /// Route errors through the logger
    pub log_exceptions: bool,
    /// Also write log records to `log_file_path`
    pub log_to_file: bool,
    /// Log file location
    pub log_file_path: String,
    /// File log level
    pub log_file_level: String,
    /// File record format, kept for compatibility with existing files
    pub log_file_format: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            use_color: true,
            log_warnings: true,
            log_exceptions: true,
            log_to_file: false,
            log_file_path: "swxsoc.log".to_string(),
            log_file_level: "INFO".to_string(),
            log_file_format: "%(asctime)s, %(origin)s, %(levelname)s, %(message)s".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"
selected_mission: mission
missions_data:
  mission:
    file_extension: .txt
    instruments:
      - name: instrument1
        shortname: ins1
        fullname: Instrument 1
        targetname: INS1
      - name: instrument2
        shortname: ins2
        fullname: Instrument 2
        targetname: INS2
  other:
    file_extension: .cdf
    data_levels: [l0, ql, l1]
    instruments:
      - name: mag
        shortname: mag
        fullname: Magnetometer
        targetname: MAG
"#;

    #[test]
    fn decodes_minimal_document_with_defaults() {
        let settings = Settings::from_yaml(DOC, "inline").unwrap();
        assert_eq!(settings.selected_mission, "mission");
        assert_eq!(settings.general, GeneralSettings::default());
        assert_eq!(settings.downloads.download_dir, "data");
        assert_eq!(settings.logger.log_level, "INFO");
        assert_eq!(
            settings.mission_names().collect::<Vec<_>>(),
            vec!["mission", "other"]
        );
    }

    #[test]
    fn resolves_active_mission() {
        let settings = Settings::from_yaml(DOC, "inline").unwrap();
        let mission = settings.active_mission().unwrap();
        assert_eq!(mission.mission_prefix(), "mission");
        assert_eq!(mission.file_extension(), ".txt");
        assert_eq!(mission.instruments().len(), 2);
        assert!(mission.data_levels().is_none());
    }

    #[test]
    fn resolves_data_levels() {
        let settings = Settings::from_yaml(DOC, "inline").unwrap();
        let mission = settings.mission("other").unwrap();
        assert_eq!(mission.data_levels().unwrap(), ["l0", "ql", "l1"]);
    }

    #[test]
    fn unknown_mission_lists_available() {
        let settings = Settings::from_yaml(DOC, "inline").unwrap();
        match settings.mission("veeger") {
            Err(ConfigError::UnknownMission { available, .. }) => {
                assert_eq!(available, vec!["mission", "other"]);
            }
            other => panic!("expected UnknownMission, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_document() {
        let result = Settings::from_yaml("selected_mission: [", "inline");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
