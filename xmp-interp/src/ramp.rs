//! Linear ramp between the first and last sidecar of a sequence
//!
//! The endpoints of a sequence define the ramp: every field whose value
//! differs between them is interpolated, every other field is left alone.
//!
//! For a changed field with endpoint values `a` and `b`, the value at
//! progress `p` is `a + (b - a) × p`, where `p = index / (len - 1)`.

use crate::sidecar::{FieldMap, ValueMap};
use tracing::warn;

/// Normalized position of `index` within a sequence of `len` files
///
/// The first file is 0.0 and the last is 1.0. A sequence of fewer than two
/// files has no ramp; every position is 0.0.
pub fn progress(index: usize, len: usize) -> f64 {
    if len < 2 {
        return 0.0;
    }
    index as f64 / (len - 1) as f64
}

/// Fields whose values differ between the two endpoints, in key order
///
/// A field assigned in only one endpoint cannot be interpolated; it is
/// skipped with a warning.
pub fn changed_fields(first: &FieldMap, last: &FieldMap) -> Vec<String> {
    for key in first.keys().filter(|k| !last.contains_key(*k)) {
        warn!("{} only present in the first file, not interpolating it", key);
    }
    for key in last.keys().filter(|k| !first.contains_key(*k)) {
        warn!("{} only present in the last file, not interpolating it", key);
    }

    first
        .iter()
        .filter_map(|(key, a)| match last.get(key) {
            Some(b) if a != b => Some(key.clone()),
            _ => None,
        })
        .collect()
}

/// Interpolate every field present in both mappings at `progress`
///
/// No clamping is applied; callers pass progress in [0, 1].
pub fn interpolate(first: &FieldMap, last: &FieldMap, progress: f64) -> ValueMap {
    first
        .iter()
        .filter_map(|(key, &a)| {
            let b = *last.get(key)?;
            let a = a as f64;
            Some((key.clone(), a + (b as f64 - a) * progress))
        })
        .collect()
}

/// Endpoint values of the changed fields of a sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ramp {
    first: FieldMap,
    last: FieldMap,
}

impl Ramp {
    /// Build the ramp between two endpoint mappings, keeping changed fields only
    pub fn between(first: &FieldMap, last: &FieldMap) -> Self {
        let changed = changed_fields(first, last);
        let pick = |source: &FieldMap| -> FieldMap {
            changed
                .iter()
                .filter_map(|key| source.get(key).map(|v| (key.clone(), *v)))
                .collect()
        };

        Self {
            first: pick(first),
            last: pick(last),
        }
    }

    /// True when no field changes between the endpoints
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Names of the interpolated fields
    pub fn fields(&self) -> Vec<String> {
        self.first.keys().cloned().collect()
    }

    /// Interpolated values at `progress`
    pub fn at(&self, progress: f64) -> ValueMap {
        interpolate(&self.first, &self.last, progress)
    }
}
