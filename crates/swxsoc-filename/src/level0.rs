//! Fixed-width level 0 (MOC) convention
//!
//! `<mission>_<TARGET>[_<MODE>]_l0_<YYYYDDD>-<hhmmss>_v<NN>.bin`
//!
//! Mission and target tokens compare case-insensitively. Descriptor and
//! test flag are not representable.

use crate::error::{FilenameError, FilenameResult};
use crate::record::{ScienceFileRecord, LEVEL0};
use crate::time;
use crate::validation;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use swxsoc_config::{InstrumentConfig, MissionConfig};

/// Extension of level 0 products, independent of the mission extension
pub const LEVEL0_EXTENSION: &str = ".bin";

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<mission>[^_]+)_(?P<target>[^_]+)(?:_(?P<mode>[^_]+))?_l0_(?P<stamp>[0-9]{7}-[0-9]{6})_v(?P<version>[0-9]{2})\.bin$",
    )
    .expect("valid level 0 regex")
});

/// Full structural match of a level 0 name
#[must_use]
pub fn match_name(name: &str) -> Option<Captures<'_>> {
    NAME_RE.captures(name)
}

/// Render a level 0 name; inputs are already validated
#[must_use]
pub fn render(
    mission: &MissionConfig,
    instrument: &InstrumentConfig,
    mode: Option<&str>,
    time: &NaiveDateTime,
    version: &str,
) -> String {
    let mode = mode.map(|m| format!("_{m}")).unwrap_or_default();
    format!(
        "{prefix}_{target}{mode}_{LEVEL0}_{stamp}_v{version}{LEVEL0_EXTENSION}",
        prefix = mission.mission_prefix(),
        target = instrument.targetname,
        stamp = time::format_level0(time),
    )
}

/// Decode a name already matched by [`match_name`]
pub fn parse(
    mission: &MissionConfig,
    name: &str,
    caps: &Captures<'_>,
) -> FilenameResult<ScienceFileRecord> {
    let prefix = &caps["mission"];
    if !prefix.eq_ignore_ascii_case(mission.mission_prefix()) {
        return Err(FilenameError::invalid_filename(
            name,
            format!(
                "mission prefix '{prefix}' does not match '{}'",
                mission.mission_prefix()
            ),
        ));
    }

    let target = &caps["target"];
    let instrument = mission.instrument_by_targetname(target).ok_or_else(|| {
        FilenameError::UnknownInstrument {
            instrument: target.to_string(),
            mission: mission.mission_prefix().to_string(),
        }
    })?;

    validation::check_level(mission, LEVEL0)?;

    let mode = caps.name("mode").map(|m| m.as_str());
    validation::check_token("mode", mode)?;

    let version = &caps["version"];
    validation::check_version(LEVEL0, version)?;

    Ok(ScienceFileRecord {
        instrument: instrument.name.clone(),
        time: time::parse_level0(&caps["stamp"])?,
        level: LEVEL0.to_string(),
        version: version.to_string(),
        mode: mode.map(str::to_string),
        descriptor: None,
        test: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn mission() -> MissionConfig {
        MissionConfig::new(
            "swxsoc",
            ".cdf",
            vec![
                InstrumentConfig::new("nemisis", "nem", "Magnetometer", "NEM"),
                InstrumentConfig::new("merit", "mrt", "Telescope", "MERIT"),
            ],
        )
        .unwrap()
    }

    fn parse_name(name: &str) -> FilenameResult<ScienceFileRecord> {
        let caps = match_name(name).expect("level 0 shape");
        parse(&mission(), name, &caps)
    }

    #[test]
    fn structural_match() {
        assert!(match_name("swxsoc_NEM_l0_2024094-124603_v01.bin").is_some());
        assert!(match_name("swxsoc_MERIT_VC_l0_2026215-124603_v21.bin").is_some());
        assert!(match_name("swxsoc_NEM_l0_2024094-124603_v01.cdf").is_none());
        assert!(match_name("swxsoc_NEM_l0_2024094-124603_v1.bin").is_none());
        assert!(match_name("swxsoc_nem_l1_20240406T120621_v1.2.3.cdf").is_none());
    }

    #[test]
    fn parses_mode_between_target_and_level() {
        let record = parse_name("swxsoc_MERIT_VC_l0_2026215-124603_v21.bin").unwrap();
        assert_eq!(record.instrument, "merit");
        assert_eq!(record.mode.as_deref(), Some("VC"));
        assert_eq!(record.version, "21");
        assert_eq!(
            record.time,
            NaiveDate::from_ymd_opt(2026, 8, 3)
                .unwrap()
                .and_hms_opt(12, 46, 3)
                .unwrap()
        );
    }

    #[test]
    fn prefix_and_target_are_case_insensitive() {
        let record = parse_name("SWXSOC_nem_l0_2024094-124603_v01.bin").unwrap();
        assert_eq!(record.instrument, "nemisis");
    }

    #[test]
    fn rejects_wrong_prefix() {
        let result = parse_name("hermes_NEM_l0_2024094-124603_v01.bin");
        assert!(matches!(result, Err(FilenameError::InvalidFilename { .. })));
    }

    #[test]
    fn rejects_unknown_target() {
        let result = parse_name("swxsoc_FPI_l0_2024094-124603_v01.bin");
        assert!(matches!(result, Err(FilenameError::UnknownInstrument { .. })));
    }

    #[test]
    fn rejects_missing_day() {
        let result = parse_name("swxsoc_NEM_l0_2025366-124603_v01.bin");
        assert!(matches!(result, Err(FilenameError::InvalidTime { .. })));
    }

    #[test]
    fn render_without_mode() {
        let m = mission();
        let instrument = m.instrument_by_name("nemisis").unwrap();
        let time = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(12, 46, 3)
            .unwrap();
        assert_eq!(
            render(&m, instrument, None, &time, "01"),
            "swxsoc_NEM_l0_2024094-124603_v01.bin"
        );
        assert_eq!(
            render(&m, instrument, Some("VA"), &time, "01"),
            "swxsoc_NEM_VA_l0_2024094-124603_v01.bin"
        );
    }
}
