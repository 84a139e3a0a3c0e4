//! Value rewriting

use super::{FieldMatcher, ValueMap};
use xmp_interp_common::format_value;

/// Rewrite the values of the fields in `values`, leaving every other line as-is
///
/// Matching lines keep their left-hand side and anything after the value;
/// only the value is replaced, and it is always written double-quoted.
/// Fields the matcher knows but `values` does not carry are left untouched.
pub fn patch_text(matcher: &FieldMatcher, text: &str, values: &ValueMap) -> String {
    text.split('\n')
        .map(|line| {
            let Some(found) = matcher.match_line(line) else {
                return line.to_string();
            };
            match values.get(found.field) {
                Some(value) => format!(
                    "{}\"{}\"{}",
                    found.lhs,
                    format_value(*value),
                    found.rest
                ),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
