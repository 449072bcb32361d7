//! SWxSOC Science File Names
//!
//! Bidirectional mapping between science file metadata and standardized
//! file names.
//!
//! # Conventions
//!
//! - **Science** (levels other than `l0`):
//!   `swxsoc_spn_2s_l3test_burst_20240406T120621_v2.4.5.cdf`
//! - **Level 0 / MOC** (fixed width, day-of-year time):
//!   `swxsoc_MERIT_VC_l0_2026215-124603_v21.bin`
//!
//! # Example
//!
//! ```rust
//! use swxsoc_config::ConfigLoader;
//! use swxsoc_filename::{FileNameRequest, FilenameCodec};
//!
//! let mission = ConfigLoader::new().load_mission().unwrap();
//! let codec = FilenameCodec::for_mission(mission);
//!
//! let name = codec
//!     .build(&FileNameRequest::new("eea", "2024-04-06T12:06:21", "l1", "1.2.3"))
//!     .unwrap();
//! assert_eq!(name, "swxsoc_eea_l1_20240406T120621_v1.2.3.cdf");
//!
//! let record = codec.parse("swxsoc_NEM_l0_2024094-124603_v01.bin").unwrap();
//! assert_eq!(record.instrument, "nemisis");
//! assert_eq!(record.version, "01");
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod level0;
pub mod record;
pub mod science;
pub mod time;
pub mod validation;

// Re-exports
pub use codec::{create_science_filename, parse_science_filename, FilenameCodec};
pub use error::{FilenameError, FilenameResult};
pub use level0::LEVEL0_EXTENSION;
pub use record::{Convention, FileNameRequest, ScienceFileRecord, LEVEL0};
pub use time::TimeInput;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and parsing file names
    pub use crate::{
        Convention, FileNameRequest, FilenameCodec, FilenameError, ScienceFileRecord, TimeInput,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
