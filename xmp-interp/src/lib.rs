//! xmp-interp - linear interpolation of develop settings across sidecar files
//!
//! Given a directory of sidecars sorted by name, the first and last file
//! define a ramp. Every allow-listed field that differs between them is
//! rewritten in each file to its linearly interpolated value, leaving all
//! other lines untouched. Originals are copied to a backup folder once.

pub mod backup;
pub mod driver;
pub mod ramp;
pub mod scan;
pub mod sidecar;

pub use driver::{RampDriver, RunOptions, RunOutcome, RunSummary, MIN_SEQUENCE_LEN};
