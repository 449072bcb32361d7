//! Field validation shared by `build` and `parse`

use crate::error::{FilenameError, FilenameResult};
use crate::record::{Convention, LEVEL0};
use once_cell::sync::Lazy;
use regex::Regex;
use swxsoc_config::MissionConfig;

/// Field separator of both conventions
pub const SEPARATOR: char = '_';

/// Suffix appended to the level token of test products
pub const TEST_SUFFIX: &str = "test";

static LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^l[0-9]+$").expect("valid level regex"));

static SCIENCE_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("valid version regex"));

static LEVEL0_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}$").expect("valid version regex"));

/// Check a data level against the mission's level set, or `l[0-9]+`
pub fn check_level(mission: &MissionConfig, level: &str) -> FilenameResult<()> {
    match mission.data_levels() {
        Some(levels) if levels.iter().any(|l| l == level) => Ok(()),
        Some(levels) => Err(FilenameError::invalid_level(
            level,
            format!(
                "mission '{}' allows {levels:?}",
                mission.mission_prefix()
            ),
        )),
        None if LEVEL_RE.is_match(level) => Ok(()),
        None => Err(FilenameError::invalid_level(level, "expected l<digits>")),
    }
}

/// Whether a science level token (optionally `test`-suffixed) names a valid level
#[must_use]
pub fn reads_as_level(mission: &MissionConfig, token: &str) -> bool {
    let (level, _) = split_test_suffix(token);
    check_level(mission, level).is_ok()
}

/// Split `l3test` into (`l3`, true)
#[must_use]
pub fn split_test_suffix(token: &str) -> (&str, bool) {
    match token.strip_suffix(TEST_SUFFIX) {
        Some(level) if !level.is_empty() => (level, true),
        _ => (token, false),
    }
}

/// Check a version string for the convention of `level`
pub fn check_version(level: &str, version: &str) -> FilenameResult<()> {
    let (pattern, expected) = match Convention::for_level(level) {
        Convention::Level0 => (&*LEVEL0_VERSION_RE, "two digits (NN)"),
        Convention::Science => (&*SCIENCE_VERSION_RE, "three dot-separated numbers (X.Y.Z)"),
    };
    if pattern.is_match(version) {
        Ok(())
    } else {
        Err(FilenameError::InvalidVersion {
            version: version.to_string(),
            level: level.to_string(),
            expected,
        })
    }
}

/// Check an optional mode or descriptor token
pub fn check_token(field: &'static str, value: Option<&str>) -> FilenameResult<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value.is_empty() {
        return Err(FilenameError::invalid_token(field, value, "must not be empty"));
    }
    if value.contains(SEPARATOR) {
        return Err(FilenameError::invalid_token(
            field,
            value,
            format!("must not contain '{SEPARATOR}'"),
        ));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FilenameError::invalid_token(
            field,
            value,
            "must be ASCII alphanumeric",
        ));
    }
    Ok(())
}

/// Check that a science mode cannot be mistaken for the level field
pub fn check_mode_distinct(mission: &MissionConfig, mode: Option<&str>) -> FilenameResult<()> {
    match mode {
        Some(mode) if reads_as_level(mission, mode) => Err(FilenameError::invalid_token(
            "mode",
            mode,
            "reads as a data level",
        )),
        _ => Ok(()),
    }
}

/// Whether `level` is the level 0 marker
#[inline]
#[must_use]
pub fn is_level0(level: &str) -> bool {
    level == LEVEL0
}
