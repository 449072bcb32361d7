//! Error types for configuration loading
//!
//! Covers reading the configuration file, decoding it, selecting a
//! mission and validating the selected mission's instrument table.

use std::path::PathBuf;

/// Errors produced while loading or resolving the mission configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error while reading a configuration file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid YAML for the expected schema
    #[error("invalid configuration document {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Selected mission has no entry in `missions_data`
    #[error("unknown mission '{mission}', expected one of: {available:?}")]
    UnknownMission {
        mission: String,
        available: Vec<String>,
    },

    /// Mission entry failed validation
    #[error("invalid mission '{mission}': {reason}")]
    Invalid { mission: String, reason: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create validation error for a mission
    pub fn invalid(mission: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            mission: mission.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mission_display() {
        let err = ConfigError::UnknownMission {
            mission: "veeger".to_string(),
            available: vec!["swxsoc".to_string(), "hermes".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown mission 'veeger', expected one of: [\"swxsoc\", \"hermes\"]"
        );
    }

    #[test]
    fn invalid_display() {
        let err = ConfigError::invalid("swxsoc", "empty instrument table");
        assert!(err.to_string().contains("empty instrument table"));
    }
}
