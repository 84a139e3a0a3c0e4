//! # xmp-interp Common Library
//!
//! Shared code for the xmp-interp crates:
//! - Error type and result alias
//! - Settings model and resolution
//! - Sidecar value parsing and formatting

pub mod config;
pub mod error;
pub mod value;

pub use config::{Settings, SettingsResolver, SettingsSource};
pub use error::{Error, Result};
pub use value::{format_value, parse_value};
