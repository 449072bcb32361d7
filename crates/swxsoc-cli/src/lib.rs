//! SWxSOC command line tools
//!
//! Library half of the `swxsoc` binary: the clap command tree, handlers
//! returning printable output, and tracing setup.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::command;
pub use commands::run;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
