//! Core utilities for the ClearWay map engine
//!
//! This crate provides the pieces shared by every other ClearWay crate:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions,
//!   grouped into the categories the engine distinguishes (validation, source
//!   availability, fetch failures, missing location)
//! - **Configuration**: TOML-based configuration with defaults and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use clearway_core::config::Config;
//!
//! let config = Config::load(None).expect("config should load");
//! println!("nearby radius: {} km", config.schema.nearby.radius_km);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ClearwayConfig, Config};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
}
