//! Settings loading and resolution
//!
//! Settings name the develop fields that may be interpolated (the allow-list),
//! the marker that identifies sidecar files, and the backup folder name.
//!
//! Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `interpolator-settings.toml` / `interpolator-settings.json` in the target directory
//! 4. `settings.toml` in the per-user config directory
//! 5. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit settings file
pub const SETTINGS_ENV_VAR: &str = "XMP_INTERP_SETTINGS";

/// File stem looked up inside the target directory
pub const SETTINGS_FILE_STEM: &str = "interpolator-settings";

/// Default marker a file name must contain to be part of the sequence
pub const DEFAULT_FILE_MARKER: &str = ".xmp";

/// Default name of the backup folder under the target directory
pub const DEFAULT_BACKUP_DIR: &str = "bak";

/// Lightroom develop sliders interpolated when no settings file is found
pub const DEFAULT_FIELDS: &[&str] = &[
    "Temperature",
    "Tint",
    "Exposure2012",
    "Contrast2012",
    "Highlights2012",
    "Shadows2012",
    "Whites2012",
    "Blacks2012",
    "Texture",
    "Clarity2012",
    "Dehaze",
    "Vibrance",
    "Saturation",
];

/// Interpolation settings
///
/// JSON settings written for the original tool use `crsToInterpolate` for the
/// allow-list; `fields` is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Field identifiers eligible for interpolation
    #[serde(rename = "crsToInterpolate", alias = "fields")]
    pub fields: Vec<String>,

    /// Substring a file name must contain to be part of the sequence
    #[serde(alias = "fileMarker")]
    pub file_marker: String,

    /// Backup folder name, relative to the target directory
    #[serde(alias = "backupDir")]
    pub backup_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            file_marker: DEFAULT_FILE_MARKER.to_string(),
            backup_dir: DEFAULT_BACKUP_DIR.to_string(),
        }
    }
}

impl Settings {
    /// Check the settings can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::Config(
                "crsToInterpolate must list at least one field".to_string(),
            ));
        }
        if let Some(blank) = self.fields.iter().position(|f| f.trim().is_empty()) {
            return Err(Error::Config(format!(
                "crsToInterpolate entry {} is blank",
                blank
            )));
        }
        if self.file_marker.is_empty() {
            return Err(Error::Config("file_marker must not be empty".to_string()));
        }
        if self.backup_dir.is_empty()
            || self.backup_dir.contains(['/', '\\'])
            || self.backup_dir == "."
            || self.backup_dir == ".."
        {
            return Err(Error::Config(format!(
                "backup_dir must be a plain folder name, got {:?}",
                self.backup_dir
            )));
        }
        Ok(())
    }
}

/// Load and validate a settings file
///
/// `.json` files are parsed as JSON, everything else as TOML.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let settings: Settings = if is_json {
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?
    } else {
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?
    };

    settings.validate()?;
    Ok(settings)
}

/// Where the effective settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    TargetDirectory(PathBuf),
    UserConfig(PathBuf),
    CompiledDefaults,
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsSource::CommandLine(p) => write!(f, "command line ({})", p.display()),
            SettingsSource::Environment(p) => {
                write!(f, "{} ({})", SETTINGS_ENV_VAR, p.display())
            }
            SettingsSource::TargetDirectory(p) => write!(f, "target directory ({})", p.display()),
            SettingsSource::UserConfig(p) => write!(f, "user config ({})", p.display()),
            SettingsSource::CompiledDefaults => write!(f, "compiled defaults"),
        }
    }
}

/// Settings resolver following the priority order in the module docs
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    cli_path: Option<PathBuf>,
    target_dir: PathBuf,
    user_config_dir: Option<PathBuf>,
}

impl SettingsResolver {
    /// Create a resolver for a run against `target_dir`
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            cli_path: None,
            target_dir: target_dir.into(),
            user_config_dir: dirs::config_dir().map(|d| d.join("xmp-interp")),
        }
    }

    /// Settings file given on the command line
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_path = path;
        self
    }

    /// Override the per-user config directory (`None` disables the tier)
    pub fn with_user_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_config_dir = dir;
        self
    }

    /// Resolve the effective settings
    ///
    /// Explicitly named files (command line, environment) must load;
    /// discovered files are only used when present.
    pub fn resolve(&self) -> Result<(Settings, SettingsSource)> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            let settings = load_settings_file(path)?;
            return Ok((settings, SettingsSource::CommandLine(path.clone())));
        }

        // Priority 2: Environment variable
        if let Ok(value) = std::env::var(SETTINGS_ENV_VAR) {
            if !value.trim().is_empty() {
                let path = PathBuf::from(value);
                let settings = load_settings_file(&path)?;
                return Ok((settings, SettingsSource::Environment(path)));
            }
        }

        // Priority 3: Settings file next to the sidecars
        for ext in ["toml", "json"] {
            let path = self.target_dir.join(format!("{}.{}", SETTINGS_FILE_STEM, ext));
            if path.is_file() {
                let settings = load_settings_file(&path)?;
                return Ok((settings, SettingsSource::TargetDirectory(path)));
            }
        }

        // Priority 4: Per-user config directory
        if let Some(dir) = &self.user_config_dir {
            let path = dir.join("settings.toml");
            if path.is_file() {
                let settings = load_settings_file(&path)?;
                return Ok((settings, SettingsSource::UserConfig(path)));
            }
            debug!("No user settings at {}", path.display());
        }

        // Priority 5: Compiled defaults
        Ok((Settings::default(), SettingsSource::CompiledDefaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert!(settings.fields.contains(&"Exposure2012".to_string()));
        assert_eq!(settings.file_marker, ".xmp");
        assert_eq!(settings.backup_dir, "bak");
    }

    #[test]
    fn test_empty_field_list_rejected() {
        let settings = Settings {
            fields: vec![],
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_field_rejected() {
        let settings = Settings {
            fields: vec!["Exposure2012".to_string(), "  ".to_string()],
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_nested_backup_dir_rejected() {
        for bad in ["", "a/b", "..", "."] {
            let settings = Settings {
                backup_dir: bad.to_string(),
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_json_original_key_name() {
        let settings: Settings =
            serde_json::from_str(r#"{"crsToInterpolate": ["crs:Exposure2012"]}"#).unwrap();
        assert_eq!(settings.fields, vec!["crs:Exposure2012".to_string()]);
        assert_eq!(settings.file_marker, DEFAULT_FILE_MARKER);
    }

    #[test]
    fn test_toml_alias_key_name() {
        let settings: Settings = toml::from_str(
            r#"
            fields = ["Exposure2012", "Contrast2012"]
            file_marker = ".XMP"
            "#,
        )
        .unwrap();
        assert_eq!(settings.fields.len(), 2);
        assert_eq!(settings.file_marker, ".XMP");
        assert_eq!(settings.backup_dir, DEFAULT_BACKUP_DIR);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(SettingsSource::CompiledDefaults.to_string(), "compiled defaults");
        let s = SettingsSource::Environment(PathBuf::from("/tmp/s.toml")).to_string();
        assert!(s.starts_with(SETTINGS_ENV_VAR));
    }
}
