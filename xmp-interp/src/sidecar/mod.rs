//! Sidecar text handling
//!
//! A sidecar is line-oriented text in which develop settings appear as
//! assignment lines such as `   crs:Exposure2012="+0.50"`. Only lines that
//! assign an allow-listed field are ever read or rewritten.

mod extract;
mod patch;

pub use extract::extract_fields;
pub use patch::patch_text;

use regex::Regex;
use std::collections::BTreeMap;
use xmp_interp_common::{Error, Result};

/// Integer field values as read from a sidecar
pub type FieldMap = BTreeMap<String, i64>;

/// Interpolated field values to be written into a sidecar
pub type ValueMap = BTreeMap<String, f64>;

/// One assignment line split into its parts
///
/// `lhs` runs up to and including `=` and any whitespace after it, `value` is
/// the text between the quotes (or the bare token for an unquoted value),
/// `rest` is everything after the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLine<'a> {
    pub field: &'a str,
    pub lhs: &'a str,
    pub value: &'a str,
    pub rest: &'a str,
}

/// Anchored matcher for assignments to allow-listed fields
///
/// A line matches field `K` when, after optional indentation and an optional
/// namespace prefix (`crs:`), it starts with exactly `K`, optional
/// whitespace, `=` and a value. The value is either double-quoted or a bare
/// token running up to whitespace, `/` or `>`. `Saturation` does not match
/// `crs:SaturationAdjustmentRed="0"`.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    regex: Regex,
}

impl FieldMatcher {
    /// Build a matcher for the given allow-list
    pub fn new<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let mut names: Vec<&str> = fields
            .iter()
            .map(|f| f.as_ref().trim())
            .filter(|f| !f.is_empty())
            .collect();

        if names.is_empty() {
            return Err(Error::Config("no fields to match".to_string()));
        }

        // Longest first keeps the reported field unambiguous
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        names.dedup();

        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            r#"^(?P<lhs>\s*(?:[A-Za-z_][\w.-]*:)?(?P<field>{})\s*=\s*)(?:"(?P<quoted>[^"]*)"|(?P<bare>[^\s"/>]+))(?P<rest>.*)$"#,
            alternation
        );

        let regex = Regex::new(&pattern)
            .map_err(|e| Error::Config(format!("Invalid field list: {}", e)))?;

        Ok(Self { regex })
    }

    /// Split a line if it assigns an allow-listed field
    pub fn match_line<'a>(&self, line: &'a str) -> Option<FieldLine<'a>> {
        let caps = self.regex.captures(line)?;
        Some(FieldLine {
            field: caps.name("field")?.as_str(),
            lhs: caps.name("lhs")?.as_str(),
            value: caps.name("quoted").or_else(|| caps.name("bare"))?.as_str(),
            rest: caps.name("rest")?.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> FieldMatcher {
        FieldMatcher::new(&["Exposure2012", "Saturation", "crs:Tint"]).unwrap()
    }

    #[test]
    fn test_matches_prefixed_and_bare_fields() {
        let m = matcher();

        let line = m.match_line(r#"   crs:Exposure2012="+0.50""#).unwrap();
        assert_eq!(line.field, "Exposure2012");
        assert_eq!(line.lhs, "   crs:Exposure2012=");
        assert_eq!(line.value, "+0.50");
        assert_eq!(line.rest, "");

        let line = m.match_line(r#"Exposure2012 = "-1""#).unwrap();
        assert_eq!(line.field, "Exposure2012");
        assert_eq!(line.lhs, "Exposure2012 = ");
    }

    #[test]
    fn test_matches_unquoted_values() {
        let m = matcher();

        let line = m.match_line("Exposure2012=+1.00").unwrap();
        assert_eq!(line.field, "Exposure2012");
        assert_eq!(line.lhs, "Exposure2012=");
        assert_eq!(line.value, "+1.00");
        assert_eq!(line.rest, "");

        let line = m.match_line("  crs:Saturation = -12/>").unwrap();
        assert_eq!(line.value, "-12");
        assert_eq!(line.rest, "/>");
    }

    #[test]
    fn test_allow_list_entry_with_namespace() {
        let line = matcher().match_line(r#"  crs:Tint="+4">"#).unwrap();
        assert_eq!(line.field, "crs:Tint");
        assert_eq!(line.rest, ">");
    }

    #[test]
    fn test_no_substring_collisions() {
        let m = matcher();
        assert!(m.match_line(r#"   crs:SaturationAdjustmentRed="0""#).is_none());
        assert!(m.match_line(r#"   crs:HueSaturation="0""#).is_none());
        assert!(m.match_line(r#"   crs:Saturation="0""#).is_some());
    }

    #[test]
    fn test_ignores_non_assignments() {
        let m = matcher();
        assert!(m.match_line("<crs:Exposure2012>+0.50</crs:Exposure2012>").is_none());
        assert!(m.match_line("Exposure2012 is mentioned here").is_none());
        assert!(m.match_line("").is_none());
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let empty: [&str; 0] = [];
        assert!(FieldMatcher::new(&empty).is_err());
        assert!(FieldMatcher::new(&["  "]).is_err());
    }

    #[test]
    fn test_identifiers_are_escaped() {
        let m = FieldMatcher::new(&["a.b"]).unwrap();
        assert!(m.match_line(r#"a.b="1""#).is_some());
        assert!(m.match_line(r#"axb="1""#).is_none());
    }
}
