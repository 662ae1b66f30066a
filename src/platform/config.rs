// RosterSleuth - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for RosterSleuth configuration.
///
/// Roster files are not placed here; relative file names resolve against
/// `[roster] data_dir` or the current directory (see `AppConfig::resolve_path`).
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/rostersleuth/)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[roster]` section.
    pub roster: RosterSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[roster]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RosterSection {
    /// Upper bound of the CGPA scale (inclusive).
    pub max_cgpa: Option<f64>,
    /// Directory that relative roster file names resolve against.
    pub data_dir: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Upper bound of the CGPA scale (inclusive); the lower bound is 0.
    pub max_cgpa: f64,

    /// Directory for relative roster paths. `None` = current directory.
    pub data_dir: Option<PathBuf>,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_cgpa: constants::DEFAULT_MAX_CGPA,
            data_dir: None,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Resolve a roster file argument against the configured data directory.
    ///
    /// Without `[roster] data_dir`, relative paths stay relative to the
    /// current directory. Absolute paths are returned unchanged.
    pub fn resolve_path(&self, file: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }
}

/// Read and parse a config file without validating values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal problems.
/// A missing file yields defaults with no problems (first run). An unreadable
/// or unparseable file yields defaults plus the error. Out-of-range values
/// fall back to their defaults individually.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(&config_path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Config unusable; using defaults");
            warnings.push(e);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Roster: max_cgpa --
    if let Some(max) = raw.roster.max_cgpa {
        if max > constants::MIN_CGPA && max <= constants::ABSOLUTE_MAX_CGPA {
            config.max_cgpa = max;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[roster] max_cgpa".to_string(),
                value: max.to_string(),
                expected: format!(
                    "greater than {} and at most {}; using default {}",
                    constants::MIN_CGPA,
                    constants::ABSOLUTE_MAX_CGPA,
                    constants::DEFAULT_MAX_CGPA
                ),
            });
        }
    }

    // -- Roster: data_dir --
    if let Some(ref dir) = raw.roster.data_dir {
        if !dir.is_empty() {
            config.data_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "one of error, warn, info, debug, trace; using default info"
                    .to_string(),
            });
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config_is_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "[roster]\nmax_cgpa = 4.0\ndata_dir = \"/srv/roster\"\n\n[logging]\nlevel = \"DEBUG\"\n",
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.max_cgpa, 4.0);
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/roster")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[roster]\nmax_cgpa = 42.0\n[logging]\nlevel = \"loud\"\n");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config.max_cgpa, constants::DEFAULT_MAX_CGPA);
        assert_eq!(config.log_level, None);
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| matches!(w, ConfigError::ValueOutOfRange { .. })));
    }

    #[test]
    fn test_malformed_config_reports_parse_error() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[roster\nmax_cgpa = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(matches!(warnings.as_slice(), [ConfigError::TomlParse { .. }]));
    }

    #[test]
    fn test_platform_paths_resolve_a_config_dir() {
        let paths = PlatformPaths::resolve();
        assert!(!paths.config_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_resolve_path() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/srv/roster")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_path(Path::new("students.csv")),
            PathBuf::from("/srv/roster/students.csv")
        );
        assert_eq!(
            config.resolve_path(Path::new("/tmp/x.csv")),
            PathBuf::from("/tmp/x.csv")
        );
        assert_eq!(
            AppConfig::default().resolve_path(Path::new("a.csv")),
            PathBuf::from("a.csv")
        );
    }
}
