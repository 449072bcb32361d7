//! Resolved mission configuration
//!
//! [`MissionConfig`] is the read-only view consumed by the file name codec:
//! mission prefix, file extension, instrument table and an optional finite
//! set of data levels.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row of a mission's instrument table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Canonical instrument name (`nemisis`)
    pub name: String,
    /// Short code used in science file names (`nem`)
    pub shortname: String,
    /// Human readable name
    pub fullname: String,
    /// Uppercase target code used in level 0 file names (`NEM`)
    pub targetname: String,
}

impl InstrumentConfig {
    /// Create instrument row
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        shortname: impl Into<String>,
        fullname: impl Into<String>,
        targetname: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shortname: shortname.into(),
            fullname: fullname.into(),
            targetname: targetname.into(),
        }
    }
}

/// Active mission as seen by the codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionConfig {
    mission_name: String,
    file_extension: String,
    instruments: Vec<InstrumentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_levels: Option<Vec<String>>,
}

impl MissionConfig {
    /// Create and validate a mission
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the mission name is empty, the
    /// extension does not start with `.`, the instrument table is empty,
    /// or instrument codes collide.
    pub fn new(
        mission_name: impl Into<String>,
        file_extension: impl Into<String>,
        instruments: Vec<InstrumentConfig>,
    ) -> ConfigResult<Self> {
        let mission = Self {
            mission_name: mission_name.into(),
            file_extension: file_extension.into(),
            instruments,
            data_levels: None,
        };
        mission.validate()?;
        Ok(mission)
    }

    /// Restrict the mission to a finite set of data levels
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the set is empty or a level
    /// contains the `_` separator.
    pub fn with_data_levels(mut self, levels: Vec<String>) -> ConfigResult<Self> {
        self.data_levels = Some(levels);
        self.validate()?;
        Ok(self)
    }

    /// File name prefix (the mission name)
    #[inline]
    #[must_use]
    pub fn mission_prefix(&self) -> &str {
        &self.mission_name
    }

    /// File extension including the leading dot
    #[inline]
    #[must_use]
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Instrument table in configuration order
    #[inline]
    #[must_use]
    pub fn instruments(&self) -> &[InstrumentConfig] {
        &self.instruments
    }

    /// Finite data-level set, if the mission defines one
    #[inline]
    #[must_use]
    pub fn data_levels(&self) -> Option<&[String]> {
        self.data_levels.as_deref()
    }

    /// Look up an instrument by canonical name
    #[must_use]
    pub fn instrument_by_name(&self, name: &str) -> Option<&InstrumentConfig> {
        self.instruments.iter().find(|i| i.name == name)
    }

    /// Look up an instrument by science short code (case-sensitive)
    #[must_use]
    pub fn instrument_by_shortname(&self, shortname: &str) -> Option<&InstrumentConfig> {
        self.instruments.iter().find(|i| i.shortname == shortname)
    }

    /// Look up an instrument by level 0 target code (case-insensitive)
    #[must_use]
    pub fn instrument_by_targetname(&self, targetname: &str) -> Option<&InstrumentConfig> {
        self.instruments
            .iter()
            .find(|i| i.targetname.eq_ignore_ascii_case(targetname))
    }

    /// Canonical instrument names in configuration order
    pub fn instrument_names(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|i| i.name.as_str())
    }

    fn validate(&self) -> ConfigResult<()> {
        let mission = self.mission_name.as_str();
        if mission.is_empty() {
            return Err(ConfigError::invalid(mission, "empty mission name"));
        }
        if mission.contains('_') {
            return Err(ConfigError::invalid(
                mission,
                "mission name must not contain '_'",
            ));
        }
        if !self.file_extension.starts_with('.') || self.file_extension.len() < 2 {
            return Err(ConfigError::invalid(
                mission,
                format!(
                    "file extension '{}' must start with '.'",
                    self.file_extension
                ),
            ));
        }
        if self.instruments.is_empty() {
            return Err(ConfigError::invalid(mission, "empty instrument table"));
        }

        let mut names = HashSet::new();
        let mut shortnames = HashSet::new();
        let mut targetnames = HashSet::new();
        for instrument in &self.instruments {
            for (field, value) in [
                ("name", &instrument.name),
                ("shortname", &instrument.shortname),
                ("targetname", &instrument.targetname),
            ] {
                if value.is_empty() || value.contains('_') {
                    return Err(ConfigError::invalid(
                        mission,
                        format!("instrument {field} '{value}' must be non-empty without '_'"),
                    ));
                }
            }
            if instrument.shortname != instrument.shortname.to_ascii_lowercase() {
                return Err(ConfigError::invalid(
                    mission,
                    format!("shortname '{}' must be lowercase", instrument.shortname),
                ));
            }
            if !names.insert(instrument.name.as_str()) {
                return Err(ConfigError::invalid(
                    mission,
                    format!("duplicate instrument name '{}'", instrument.name),
                ));
            }
            if !shortnames.insert(instrument.shortname.as_str()) {
                return Err(ConfigError::invalid(
                    mission,
                    format!("duplicate shortname '{}'", instrument.shortname),
                ));
            }
            if !targetnames.insert(instrument.targetname.to_ascii_uppercase()) {
                return Err(ConfigError::invalid(
                    mission,
                    format!("duplicate targetname '{}'", instrument.targetname),
                ));
            }
        }

        if let Some(levels) = &self.data_levels {
            if levels.is_empty() {
                return Err(ConfigError::invalid(mission, "empty data level set"));
            }
            if let Some(bad) = levels.iter().find(|l| l.is_empty() || l.contains('_')) {
                return Err(ConfigError::invalid(
                    mission,
                    format!("data level '{bad}' must be non-empty without '_'"),
                ));
            }
        }

        Ok(())
    }
}
