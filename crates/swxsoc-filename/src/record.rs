//! Science file metadata
//!
//! [`ScienceFileRecord`] is what a file name encodes. [`FileNameRequest`]
//! is the builder input: the same fields, with the time not yet
//! normalized.

use crate::time::TimeInput;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Data level that selects the fixed-width convention
pub const LEVEL0: &str = "l0";

/// File naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// `<prefix>_<short>[_<mode>]_<level>[test]_[<descriptor>_]<YYYYMMDDThhmmss>_v<X.Y.Z><ext>`
    Science,
    /// `<prefix>_<TARGET>[_<mode>]_l0_<YYYYDDD>-<hhmmss>_v<NN>.bin`
    Level0,
}

impl Convention {
    /// Convention used for a data level
    #[inline]
    #[must_use]
    pub fn for_level(level: &str) -> Self {
        if level == LEVEL0 {
            Self::Level0
        } else {
            Self::Science
        }
    }
}

impl Display for Convention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Science => write!(f, "science"),
            Self::Level0 => write!(f, "level0"),
        }
    }
}

/// Metadata encoded in a science file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScienceFileRecord {
    /// Canonical instrument name
    pub instrument: String,
    /// Observation time, whole seconds
    pub time: NaiveDateTime,
    /// Data level (`l0`, `l1`, ...)
    pub level: String,
    /// `X.Y.Z`, or two digits for `l0`
    pub version: String,
    /// Optional instrument mode
    pub mode: Option<String>,
    /// Optional product descriptor (science convention only)
    pub descriptor: Option<String>,
    /// Test product flag (science convention only)
    pub test: bool,
}

impl ScienceFileRecord {
    /// Convention this record is named with
    #[inline]
    #[must_use]
    pub fn convention(&self) -> Convention {
        Convention::for_level(&self.level)
    }
}

/// Input to the file name builder
#[derive(Debug, Clone, PartialEq)]
pub struct FileNameRequest {
    /// Canonical instrument name
    pub instrument: String,
    /// Observation time
    pub time: TimeInput,
    /// Data level
    pub level: String,
    /// Version string
    pub version: String,
    /// Optional instrument mode
    pub mode: Option<String>,
    /// Optional product descriptor
    pub descriptor: Option<String>,
    /// Test product flag
    pub test: bool,
}

impl FileNameRequest {
    /// Request with the required fields
    #[must_use]
    pub fn new(
        instrument: impl Into<String>,
        time: impl Into<TimeInput>,
        level: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            time: time.into(),
            level: level.into(),
            version: version.into(),
            mode: None,
            descriptor: None,
            test: false,
        }
    }

    /// With mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// With descriptor
    #[inline]
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    /// With test flag
    #[inline]
    #[must_use]
    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }
}

impl From<&ScienceFileRecord> for FileNameRequest {
    fn from(record: &ScienceFileRecord) -> Self {
        Self {
            instrument: record.instrument.clone(),
            time: TimeInput::DateTime(record.time),
            level: record.level.clone(),
            version: record.version.clone(),
            mode: record.mode.clone(),
            descriptor: record.descriptor.clone(),
            test: record.test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convention_for_level() {
        assert_eq!(Convention::for_level("l0"), Convention::Level0);
        assert_eq!(Convention::for_level("l1"), Convention::Science);
        assert_eq!(Convention::for_level("ql"), Convention::Science);
        assert_eq!(Convention::Level0.to_string(), "level0");
    }

    #[test]
    fn request_builder() {
        let request = FileNameRequest::new("spani", "2024-04-06T12:06:21", "l3", "2.4.5")
            .with_mode("2s")
            .with_descriptor("burst")
            .with_test(true);

        assert_eq!(request.mode.as_deref(), Some("2s"));
        assert_eq!(request.descriptor.as_deref(), Some("burst"));
        assert!(request.test);
        assert_eq!(request.time, TimeInput::Iso("2024-04-06T12:06:21".to_string()));
    }
}
