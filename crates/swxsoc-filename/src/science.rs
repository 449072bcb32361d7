//! Science convention
//!
//! `<prefix>_<short>[_<mode>]_<level>[test]_[<descriptor>_]<YYYYMMDDThhmmss>_v<X.Y.Z><ext>`
//!
//! Mode and descriptor are independently optional, giving four layouts.
//! The six-field layout is ambiguous between mode-only and
//! descriptor-only; it is descriptor-only when the third field reads as a
//! level, which is why the builder refuses modes that read as levels.

use crate::error::{FilenameError, FilenameResult};
use crate::record::ScienceFileRecord;
use crate::time;
use crate::validation::{self, SEPARATOR, TEST_SUFFIX};
use chrono::NaiveDateTime;
use swxsoc_config::{InstrumentConfig, MissionConfig};

/// Optional-field presence of a science name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `prefix_short_level_time_vver`
    Bare,
    /// `prefix_short_mode_level_time_vver`
    Mode,
    /// `prefix_short_level_descriptor_time_vver`
    Descriptor,
    /// `prefix_short_mode_level_descriptor_time_vver`
    ModeAndDescriptor,
}

/// A science stem split into its positional fields
///
/// Fields are raw tokens borrowed from the stem; none are validated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields<'a> {
    /// Which optional fields are present
    pub layout: Layout,
    /// Mission prefix token
    pub prefix: &'a str,
    /// Instrument short name
    pub short: &'a str,
    /// Instrument mode, when the layout has one
    pub mode: Option<&'a str>,
    /// Data level, still carrying any `test` suffix
    pub level: &'a str,
    /// Descriptor, when the layout has one
    pub descriptor: Option<&'a str>,
    /// Science time stamp, `YYYYMMDDThhmmss`
    pub stamp: &'a str,
    /// Version token, still carrying the leading `v`
    pub version: &'a str,
}

impl<'a> Fields<'a> {
    /// Split a stem (name without extension) into fields
    ///
    /// Returns `None` when the field count fits no layout.
    #[must_use]
    pub fn split(mission: &MissionConfig, stem: &'a str) -> Option<Self> {
        let tokens: Vec<&'a str> = stem.split(SEPARATOR).collect();
        let fields = match tokens.as_slice() {
            &[prefix, short, level, stamp, version] => Self {
                layout: Layout::Bare,
                prefix,
                short,
                mode: None,
                level,
                descriptor: None,
                stamp,
                version,
            },
            &[prefix, short, third, fourth, stamp, version]
                if validation::reads_as_level(mission, third) =>
            {
                Self {
                    layout: Layout::Descriptor,
                    prefix,
                    short,
                    mode: None,
                    level: third,
                    descriptor: Some(fourth),
                    stamp,
                    version,
                }
            }
            &[prefix, short, third, fourth, stamp, version] => Self {
                layout: Layout::Mode,
                prefix,
                short,
                mode: Some(third),
                level: fourth,
                descriptor: None,
                stamp,
                version,
            },
            &[prefix, short, mode, level, descriptor, stamp, version] => Self {
                layout: Layout::ModeAndDescriptor,
                prefix,
                short,
                mode: Some(mode),
                level,
                descriptor: Some(descriptor),
                stamp,
                version,
            },
            _ => return None,
        };
        Some(fields)
    }
}

/// Render a science name; inputs are already validated
#[must_use]
pub fn render(
    mission: &MissionConfig,
    instrument: &InstrumentConfig,
    record: &ScienceFileRecord,
) -> String {
    let mut name = String::with_capacity(64);
    name.push_str(mission.mission_prefix());
    name.push(SEPARATOR);
    name.push_str(&instrument.shortname);
    if let Some(mode) = &record.mode {
        name.push(SEPARATOR);
        name.push_str(mode);
    }
    name.push(SEPARATOR);
    name.push_str(&record.level);
    if record.test {
        name.push_str(TEST_SUFFIX);
    }
    name.push(SEPARATOR);
    if let Some(descriptor) = &record.descriptor {
        name.push_str(descriptor);
        name.push(SEPARATOR);
    }
    name.push_str(&time::format_science(&record.time));
    name.push(SEPARATOR);
    name.push('v');
    name.push_str(&record.version);
    name.push_str(mission.file_extension());
    name
}

/// Decode a science name whose extension is `mission.file_extension()`
pub fn parse(mission: &MissionConfig, name: &str, stem: &str) -> FilenameResult<ScienceFileRecord> {
    let fields = Fields::split(mission, stem).ok_or_else(|| {
        FilenameError::invalid_filename(
            name,
            format!(
                "expected 5 to 7 '{SEPARATOR}'-separated fields, found {}",
                stem.split(SEPARATOR).count()
            ),
        )
    })?;

    if fields.prefix != mission.mission_prefix() {
        return Err(FilenameError::invalid_filename(
            name,
            format!(
                "mission prefix '{}' does not match '{}'",
                fields.prefix,
                mission.mission_prefix()
            ),
        ));
    }

    let instrument = mission
        .instrument_by_shortname(fields.short)
        .ok_or_else(|| FilenameError::UnknownInstrument {
            instrument: fields.short.to_string(),
            mission: mission.mission_prefix().to_string(),
        })?;

    let (level, test) = validation::split_test_suffix(fields.level);
    validation::check_level(mission, level)?;
    if validation::is_level0(level) {
        return Err(FilenameError::invalid_filename(
            name,
            "level 0 products use the fixed-width convention",
        ));
    }

    validation::check_token("mode", fields.mode)?;
    validation::check_token("descriptor", fields.descriptor)?;

    let version = fields.version.strip_prefix('v').ok_or_else(|| {
        FilenameError::invalid_filename(
            name,
            format!("version field '{}' must start with 'v'", fields.version),
        )
    })?;
    validation::check_version(level, version)?;

    let time: NaiveDateTime = time::parse_science(fields.stamp)?;

    Ok(ScienceFileRecord {
        instrument: instrument.name.clone(),
        time,
        level: level.to_string(),
        version: version.to_string(),
        mode: fields.mode.map(str::to_string),
        descriptor: fields.descriptor.map(str::to_string),
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> MissionConfig {
        MissionConfig::new(
            "swxsoc",
            ".cdf",
            vec![InstrumentConfig::new("spani", "spn", "Ion Analyzer", "SPANI")],
        )
        .unwrap()
    }

    #[test]
    fn splits_all_four_layouts() {
        let m = mission();
        let cases = [
            ("swxsoc_spn_l3_20240406T120621_v2.4.5", Layout::Bare, None, None),
            ("swxsoc_spn_2s_l3_20240406T120621_v2.4.5", Layout::Mode, Some("2s"), None),
            (
                "swxsoc_spn_l3_burst_20240406T120621_v2.4.5",
                Layout::Descriptor,
                None,
                Some("burst"),
            ),
            (
                "swxsoc_spn_2s_l3test_burst_20240406T120621_v2.4.5",
                Layout::ModeAndDescriptor,
                Some("2s"),
                Some("burst"),
            ),
        ];
        for (stem, layout, mode, descriptor) in cases {
            let fields = Fields::split(&m, stem).unwrap();
            assert_eq!(fields.layout, layout, "{stem}");
            assert_eq!(fields.mode, mode, "{stem}");
            assert_eq!(fields.descriptor, descriptor, "{stem}");
            assert_eq!(fields.stamp, "20240406T120621");
        }
    }

    #[test]
    fn six_fields_with_test_level_is_descriptor_layout() {
        let fields = Fields::split(&mission(), "swxsoc_spn_l1test_burst_20240406T120621_v2.4.5")
            .unwrap();
        assert_eq!(fields.layout, Layout::Descriptor);
        assert_eq!(fields.level, "l1test");
    }

    #[test]
    fn fields_are_raw_tokens() {
        let fields =
            Fields::split(&mission(), "swxsoc_spn_2s_l3test_burst_20240406T120621_v2.4.5").unwrap();
        assert_eq!(
            fields,
            Fields {
                layout: Layout::ModeAndDescriptor,
                prefix: "swxsoc",
                short: "spn",
                mode: Some("2s"),
                level: "l3test",
                descriptor: Some("burst"),
                stamp: "20240406T120621",
                version: "v2.4.5",
            }
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(Fields::split(&mission(), "swxsoc_spn_20240406T120621_v2.4.5").is_none());
        assert!(Fields::split(&mission(), "a_b_c_d_e_f_g_h").is_none());
    }

    #[test]
    fn rejects_split_timestamp() {
        let m = mission();
        let name = "swxsoc_spn_2s_l3test_burst_20240406_120621_v2.4.5.cdf";
        let stem = name.strip_suffix(".cdf").unwrap();
        assert!(parse(&m, name, stem).is_err());
    }

    #[test]
    fn rejects_science_level0() {
        let m = mission();
        let name = "swxsoc_spn_l0_20240406T120621_v1.2.3.cdf";
        let stem = name.strip_suffix(".cdf").unwrap();
        assert!(matches!(
            parse(&m, name, stem),
            Err(FilenameError::InvalidFilename { .. })
        ));
    }

    #[test]
    fn rejects_missing_version_marker() {
        let m = mission();
        let name = "swxsoc_spn_l3_20240406T120621_2.4.5.cdf";
        let stem = name.strip_suffix(".cdf").unwrap();
        assert!(matches!(
            parse(&m, name, stem),
            Err(FilenameError::InvalidFilename { .. })
        ));
    }
}
