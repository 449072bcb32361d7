//! Error types for the file name codec
//!
//! Every variant carries the offending value; none are recovered from
//! inside the codec.

/// File name construction and parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    /// Instrument name or code is not in the active mission table
    #[error("unknown instrument '{instrument}' for mission '{mission}'")]
    UnknownInstrument { instrument: String, mission: String },

    /// Data level fails the allowed pattern or configured set
    #[error("invalid data level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    /// Version fails the level-appropriate pattern
    #[error("invalid version '{version}' for level '{level}': expected {expected}")]
    InvalidVersion {
        version: String,
        level: String,
        expected: &'static str,
    },

    /// Mode or descriptor is not a usable file name token
    #[error("invalid {field} '{value}': {reason}")]
    InvalidToken {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Time text is malformed or names an impossible date
    #[error("invalid time '{value}': {reason}")]
    InvalidTime { value: String, reason: String },

    /// Name matches neither convention, or prefix/extension mismatch
    #[error("invalid file name '{name}': {reason}")]
    InvalidFilename { name: String, reason: String },

    /// No mission could be loaded for the process-wide codec
    #[error("mission configuration unavailable: {message}")]
    Configuration { message: String },
}

impl From<swxsoc_config::ConfigError> for FilenameError {
    fn from(err: swxsoc_config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

impl FilenameError {
    /// Create invalid file name error
    pub fn invalid_filename(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFilename {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid time error
    pub fn invalid_time(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTime {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid level error
    pub fn invalid_level(level: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLevel {
            level: level.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid token error
    pub fn invalid_token(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidToken {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Name of the record field the error is about
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownInstrument { .. } => "instrument",
            Self::InvalidLevel { .. } => "level",
            Self::InvalidVersion { .. } => "version",
            Self::InvalidToken { field, .. } => *field,
            Self::InvalidTime { .. } => "time",
            Self::InvalidFilename { .. } => "name",
            Self::Configuration { .. } => "configuration",
        }
    }
}

/// Result type alias for codec operations
pub type FilenameResult<T> = Result<T, FilenameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_instrument_display() {
        let err = FilenameError::UnknownInstrument {
            instrument: "potato".to_string(),
            mission: "swxsoc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown instrument 'potato' for mission 'swxsoc'"
        );
        assert_eq!(err.field(), "instrument");
    }

    #[test]
    fn token_error_names_field() {
        let err = FilenameError::invalid_token("descriptor", "blue_green", "contains '_'");
        assert_eq!(err.field(), "descriptor");
        assert_eq!(err.to_string(), "invalid descriptor 'blue_green': contains '_'");
    }

    #[test]
    fn version_display() {
        let err = FilenameError::InvalidVersion {
            version: "1.3".to_string(),
            level: "l1".to_string(),
            expected: "X.Y.Z",
        };
        assert!(err.to_string().contains("expected X.Y.Z"));
    }

    #[test]
    fn configuration_error_keeps_loader_message() {
        let err = FilenameError::from(swxsoc_config::ConfigError::UnknownMission {
            mission: "veeger".to_string(),
            available: vec!["swxsoc".to_string()],
        });
        assert_eq!(err.field(), "configuration");
        assert!(err.to_string().starts_with("mission configuration unavailable"));
        assert!(err.to_string().contains("veeger"));
    }
}
