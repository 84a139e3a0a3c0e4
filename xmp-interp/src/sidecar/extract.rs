//! Field extraction

use super::{FieldMap, FieldMatcher};
use std::path::Path;
use xmp_interp_common::{parse_value, Error, Result};

/// Read every allow-listed field assignment in `text`
///
/// Values keep only their integer part (see [`parse_value`]). When a field is
/// assigned more than once the last assignment wins. A value that is not a
/// decimal number fails with [`Error::InvalidValue`]; `path` is only used for
/// that report.
pub fn extract_fields(matcher: &FieldMatcher, text: &str, path: &Path) -> Result<FieldMap> {
    let mut fields = FieldMap::new();

    for (index, line) in text.split('\n').enumerate() {
        let Some(found) = matcher.match_line(line) else {
            continue;
        };

        let value = parse_value(found.value).ok_or_else(|| Error::InvalidValue {
            path: path.to_path_buf(),
            line: index + 1,
            field: found.field.to_string(),
            value: found.value.to_string(),
        })?;

        fields.insert(found.field.to_string(), value);
    }

    Ok(fields)
}
