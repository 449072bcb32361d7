//! File name codec
//!
//! [`FilenameCodec`] pairs `build` and `parse` over a [`MissionProvider`].
//! The provider is consulted on every call, so a reconfigured mission
//! takes effect immediately.

use crate::error::{FilenameError, FilenameResult};
use crate::level0;
use crate::record::{Convention, FileNameRequest, ScienceFileRecord};
use crate::science;
use crate::validation;
use std::sync::Arc;
use swxsoc_config::{ConfigHandle, MissionConfig, MissionProvider};

/// Builds and parses science file names for the provider's active mission
#[derive(Debug, Clone)]
pub struct FilenameCodec<P> {
    provider: P,
}

impl FilenameCodec<&'static ConfigHandle> {
    /// Codec over the process-wide configuration
    ///
    /// # Errors
    /// [`FilenameError::Configuration`] if the environment selects a
    /// mission that cannot be loaded.
    pub fn global() -> FilenameResult<Self> {
        Ok(Self::new(swxsoc_config::global()?))
    }
}

impl FilenameCodec<Arc<MissionConfig>> {
    /// Codec over a fixed mission
    #[must_use]
    pub fn for_mission(mission: MissionConfig) -> Self {
        Self::new(Arc::new(mission))
    }
}

impl<P: MissionProvider> FilenameCodec<P> {
    /// Create codec over a provider
    #[inline]
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Underlying provider
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build a file name
    ///
    /// Level `l0` requests use the fixed-width convention, which drops
    /// `descriptor` and `test`.
    ///
    /// # Errors
    /// - [`FilenameError::UnknownInstrument`] if the instrument is not in the mission table
    /// - [`FilenameError::InvalidLevel`] if the level is not allowed
    /// - [`FilenameError::InvalidVersion`] if the version does not fit the level
    /// - [`FilenameError::InvalidToken`] if mode or descriptor is unusable
    /// - [`FilenameError::InvalidTime`] if the time cannot be normalized
    pub fn build(&self, request: &FileNameRequest) -> FilenameResult<String> {
        let mission = self.provider.mission();
        let record = validate_request(&mission, request)?;
        let instrument = mission
            .instrument_by_name(&record.instrument)
            .ok_or_else(|| unknown_instrument(&mission, &record.instrument))?;

        let name = match record.convention() {
            Convention::Science => science::render(&mission, instrument, &record),
            Convention::Level0 => level0::render(
                &mission,
                instrument,
                record.mode.as_deref(),
                &record.time,
                &record.version,
            ),
        };

        tracing::debug!(
            mission = mission.mission_prefix(),
            convention = %record.convention(),
            %name,
            "built science file name"
        );
        Ok(name)
    }

    /// Build the name of an existing record
    ///
    /// # Errors
    /// Same as [`FilenameCodec::build`].
    pub fn build_record(&self, record: &ScienceFileRecord) -> FilenameResult<String> {
        self.build(&FileNameRequest::from(record))
    }

    /// Parse a file name
    ///
    /// A name is level 0 when it matches the whole fixed-width pattern;
    /// otherwise it must carry the mission extension and the science
    /// grammar.
    ///
    /// # Errors
    /// - [`FilenameError::InvalidFilename`] on grammar, prefix or extension mismatch
    /// - any field error [`FilenameCodec::build`] can report
    pub fn parse(&self, name: &str) -> FilenameResult<ScienceFileRecord> {
        let mission = self.provider.mission();

        let (convention, record) = if let Some(caps) = level0::match_name(name) {
            (Convention::Level0, level0::parse(&mission, name, &caps)?)
        } else {
            let stem = name.strip_suffix(mission.file_extension()).ok_or_else(|| {
                FilenameError::invalid_filename(
                    name,
                    format!(
                        "expected extension '{}' or a level 0 '{}' name",
                        mission.file_extension(),
                        level0::LEVEL0_EXTENSION
                    ),
                )
            })?;
            (Convention::Science, science::parse(&mission, name, stem)?)
        };

        tracing::debug!(
            mission = mission.mission_prefix(),
            %convention,
            instrument = %record.instrument,
            level = %record.level,
            "parsed science file name"
        );
        Ok(record)
    }
}

/// Run the build-side checks in order and normalize the time
fn validate_request(
    mission: &MissionConfig,
    request: &FileNameRequest,
) -> FilenameResult<ScienceFileRecord> {
    if mission.instrument_by_name(&request.instrument).is_none() {
        return Err(unknown_instrument(mission, &request.instrument));
    }

    validation::check_level(mission, &request.level)?;
    validation::check_version(&request.level, &request.version)?;

    validation::check_token("mode", request.mode.as_deref())?;
    validation::check_token("descriptor", request.descriptor.as_deref())?;

    let convention = Convention::for_level(&request.level);
    if convention == Convention::Science {
        validation::check_mode_distinct(mission, request.mode.as_deref())?;
    }

    let time = request.time.resolve()?;

    let (descriptor, test) = match convention {
        Convention::Science => (request.descriptor.clone(), request.test),
        Convention::Level0 => (None, false),
    };

    Ok(ScienceFileRecord {
        instrument: request.instrument.clone(),
        time,
        level: request.level.clone(),
        version: request.version.clone(),
        mode: request.mode.clone(),
        descriptor,
        test,
    })
}

fn unknown_instrument(mission: &MissionConfig, instrument: &str) -> FilenameError {
    FilenameError::UnknownInstrument {
        instrument: instrument.to_string(),
        mission: mission.mission_prefix().to_string(),
    }
}

/// Build a file name against the process-wide configuration
///
/// # Errors
/// [`FilenameError::Configuration`] if the environment configuration is
/// rejected, otherwise same as [`FilenameCodec::build`].
pub fn create_science_filename(request: &FileNameRequest) -> FilenameResult<String> {
    FilenameCodec::global()?.build(request)
}

/// Parse a file name against the process-wide configuration
///
/// # Errors
/// [`FilenameError::Configuration`] if the environment configuration is
/// rejected, otherwise same as [`FilenameCodec::parse`].
pub fn parse_science_filename(name: &str) -> FilenameResult<ScienceFileRecord> {
    FilenameCodec::global()?.parse(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use swxsoc_config::InstrumentConfig;

    fn codec() -> FilenameCodec<Arc<MissionConfig>> {
        let mission = MissionConfig::new(
            "swxsoc",
            ".cdf",
            vec![
                InstrumentConfig::new("eea", "eea", "EEA", "EEA"),
                InstrumentConfig::new("spani", "spn", "SPANI", "SPANI"),
            ],
        )
        .unwrap();
        FilenameCodec::for_mission(mission)
    }

    #[test]
    fn builds_minimal_name() {
        let request = FileNameRequest::new("eea", "2024-04-06T12:06:21", "l1", "1.2.3");
        assert_eq!(
            codec().build(&request).unwrap(),
            "swxsoc_eea_l1_20240406T120621_v1.2.3.cdf"
        );
    }

    #[test]
    fn level0_drops_descriptor_and_test() {
        let request = FileNameRequest::new("spani", "2026-12-03T06:54:22", "l0", "11")
            .with_descriptor("burst")
            .with_test(true);
        let name = codec().build(&request).unwrap();
        assert_eq!(name, "swxsoc_SPANI_l0_2026337-065422_v11.bin");

        let record = codec().parse(&name).unwrap();
        assert_eq!(record.descriptor, None);
        assert!(!record.test);
    }

    #[test]
    fn science_mode_that_reads_as_level_is_rejected() {
        let request =
            FileNameRequest::new("eea", "2024-04-06T12:06:21", "l1", "1.2.3").with_mode("l2");
        assert!(matches!(
            codec().build(&request),
            Err(FilenameError::InvalidToken { field: "mode", .. })
        ));
    }

    #[test]
    fn level0_mode_may_read_as_level() {
        let request =
            FileNameRequest::new("eea", "2024-04-06T12:06:21", "l0", "01").with_mode("l2");
        let name = codec().build(&request).unwrap();
        assert_eq!(codec().parse(&name).unwrap().mode.as_deref(), Some("l2"));
    }

    #[test]
    fn build_record_round_trips() {
        let record = ScienceFileRecord {
            instrument: "spani".to_string(),
            time: NaiveDate::from_ymd_opt(2024, 4, 6)
                .unwrap()
                .and_hms_opt(12, 6, 21)
                .unwrap(),
            level: "l3".to_string(),
            version: "2.4.5".to_string(),
            mode: Some("2s".to_string()),
            descriptor: Some("burst".to_string()),
            test: true,
        };
        let name = codec().build_record(&record).unwrap();
        assert_eq!(name, "swxsoc_spn_2s_l3test_burst_20240406T120621_v2.4.5.cdf");
        assert_eq!(codec().parse(&name).unwrap(), record);
    }

    #[test]
    fn fixed_mission_is_shared_between_calls() {
        let codec = codec();
        let first = codec.provider().mission();
        assert!(Arc::ptr_eq(&first, &codec.provider().mission()));
        assert!(Arc::ptr_eq(&first, codec.provider()));
    }

    #[test]
    fn parse_rejects_foreign_extension() {
        let result = codec().parse("swxsoc_eea_l1_20240406T120621_v1.2.3.txt");
        assert!(matches!(result, Err(FilenameError::InvalidFilename { .. })));
    }
}
