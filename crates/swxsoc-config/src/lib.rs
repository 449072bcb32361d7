//! SWxSOC Mission Configuration
//!
//! Loads the pipeline configuration document and exposes the selected
//! mission to the rest of the workspace.
//!
//! # Overview
//!
//! - **Settings**: the decoded `config.yml` document
//! - **ConfigLoader**: config directory / mission override resolution,
//!   including `SWXSOC_CONFIGDIR` and `SWXSOC_MISSION`
//! - **MissionConfig**: prefix, extension and instrument table of one mission
//! - **ConfigHandle**: reconfigurable [`MissionProvider`]
//!
//! # Example
//!
//! ```rust
//! use swxsoc_config::{ConfigHandle, ConfigLoader, MissionProvider};
//!
//! let handle = ConfigHandle::load(ConfigLoader::new()).unwrap();
//! assert_eq!(handle.mission().mission_prefix(), "swxsoc");
//!
//! handle
//!     .reconfigure_with(ConfigLoader::new().with_mission("hermes"))
//!     .unwrap();
//! assert_eq!(handle.mission().mission_prefix(), "hermes");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod mission;
pub mod provider;
pub mod settings;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, CONFIG_DIR_ENV, CONFIG_FILE_NAME, DEFAULT_CONFIG, MISSION_ENV};
pub use mission::{InstrumentConfig, MissionConfig};
pub use provider::{global, reconfigure, ConfigHandle, MissionProvider};
pub use settings::{DownloadSettings, GeneralSettings, LoggerSettings, MissionData, Settings};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
