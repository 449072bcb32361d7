//! Testing utilities for the SWxSOC workspace
//!
//! Shared fixtures: the built-in missions, the two-instrument `mission`
//! used for config-directory tests, and canonical timestamps.

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use swxsoc_config::{ConfigLoader, InstrumentConfig, MissionConfig, CONFIG_FILE_NAME};

/// ISO form of the canonical test time
pub const TIME: &str = "2024-04-06T12:06:21";

/// Science stamp of [`TIME`]
pub const TIME_FORMATTED: &str = "20240406T120621";

/// Configuration document defining a single `mission` with `.txt` files
pub const MISSION_CONFIG: &str = r#"
general:
  time_format: "%Y-%m-%d %H:%M:%S"
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
downloads:
  download_dir: data
logger:
  log_level: INFO
  use_color: true
  log_warnings: true
  log_exceptions: true
  log_to_file: false
  log_file_path: swxsoc.log
  log_file_level: INFO
  log_file_format: "%(asctime)s, %(origin)s, %(levelname)s, %(message)s"
"#;

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .unwrap()
}

/// The canonical test time, 2024-04-06T12:06:21
pub fn canonical_time() -> NaiveDateTime {
    at(2024, 4, 6, 12, 6, 21)
}

pub fn swxsoc_mission() -> MissionConfig {
    ConfigLoader::new().load_mission().unwrap()
}

pub fn hermes_mission() -> MissionConfig {
    ConfigLoader::new().with_mission("hermes").load_mission().unwrap()
}

pub fn custom_mission() -> MissionConfig {
    MissionConfig::new(
        "mission",
        ".txt",
        vec![
            InstrumentConfig::new("instrument1", "ins1", "Instrument 1", "INS1"),
            InstrumentConfig::new("instrument2", "ins2", "Instrument 2", "INS2"),
        ],
    )
    .unwrap()
}

/// Write `content` as `config.yml` into a fresh temporary directory
pub fn config_dir_with(content: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), content);
    dir
}

pub fn write_config(dir: &Path, content: &str) {
    std::fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
}
