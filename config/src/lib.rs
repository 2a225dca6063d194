//! Ora configuration.
//!
//! Read from `~/.ora/config.toml` (or the file named by `ORA_CONFIG`). Every
//! section is optional; a missing file means "all defaults".
//!
//! ```toml
//! [app]
//! reduced_motion = false
//!
//! [intro]
//! hold_ms = 700
//! spin_ms = 900
//! fast_ms = 400
//! fade_ms = 600
//!
//! [counter]
//! min = 0
//! max = 1000000
//!
//! [[stats]]
//! label = "Members"
//! value = 1280
//! suffix = "+"
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use ora_types::ui::UiOptions;
use ora_types::{CountRange, IntroElement, IntroTimingPlan, InvalidCountRange, TimingPlanError};

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "ORA_CONFIG";

/// Forces reduced motion when set to `1` or `true`.
pub const REDUCED_MOTION_ENV: &str = "ORA_REDUCED_MOTION";

#[derive(Debug, Default, Deserialize)]
pub struct OraConfig {
    pub app: Option<AppConfig>,
    pub intro: Option<IntroConfig>,
    pub counter: Option<CounterConfig>,
    /// Statistics shown on the home page. Empty means the built-in set.
    #[serde(default)]
    pub stats: Vec<StatConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config at {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => {
                path
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Skip the intro overlay and the content reveal.
    #[serde(default)]
    pub reduced_motion: bool,
}

/// Intro timing overrides, in milliseconds.
#[derive(Debug, Default, Deserialize)]
pub struct IntroConfig {
    pub hold_ms: Option<u64>,
    pub spin_ms: Option<u64>,
    pub fast_ms: Option<u64>,
    pub fade_ms: Option<u64>,
    /// Replaces the default logo elements.
    pub elements: Option<Vec<IntroElement>>,
}

impl IntroConfig {
    pub fn timing_plan(&self) -> Result<IntroTimingPlan, TimingPlanError> {
        let ms = |value: Option<u64>, default: Duration| value.map_or(default, Duration::from_millis);
        IntroTimingPlan::new(
            ms(self.hold_ms, IntroTimingPlan::DEFAULT_HOLD),
            ms(self.spin_ms, IntroTimingPlan::DEFAULT_SPIN),
            ms(self.fast_ms, IntroTimingPlan::DEFAULT_FAST),
            ms(self.fade_ms, IntroTimingPlan::DEFAULT_FADE),
            self.elements
                .clone()
                .unwrap_or_else(IntroTimingPlan::default_elements),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CounterConfig {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl CounterConfig {
    pub fn range(&self) -> Result<CountRange, InvalidCountRange> {
        CountRange::new(
            self.min.unwrap_or(CountRange::DEFAULT.min()),
            self.max.unwrap_or(CountRange::DEFAULT.max()),
        )
    }
}

/// One statistic display. `value` is raw and gets clamped at mount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatConfig {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub suffix: String,
}

impl StatConfig {
    pub fn new(label: impl Into<String>, value: f64, suffix: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            suffix: suffix.into(),
        }
    }
}

/// Fully resolved settings handed to the engine.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ui: UiOptions,
    pub intro: IntroTimingPlan,
    pub range: CountRange,
    pub stats: Vec<StatConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ui: UiOptions::default(),
            intro: IntroTimingPlan::default(),
            range: CountRange::DEFAULT,
            stats: default_stats(),
        }
    }
}

/// Statistics shown when the config names none.
#[must_use]
pub fn default_stats() -> Vec<StatConfig> {
    vec![
        StatConfig::new("Members", 1280.0, "+"),
        StatConfig::new("Partners", 42.0, ""),
        StatConfig::new("Events hosted", 315.0, ""),
        StatConfig::new("Hours streamed", 86_400.0, "+"),
    ]
}

impl OraConfig {
    /// Load the config file. `Ok(None)` when there is none.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Validate and resolve against defaults.
    ///
    /// `path` only labels errors.
    pub fn resolve(&self, path: &Path) -> Result<Settings, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let ui = self.app.as_ref().map_or_else(UiOptions::default, |app| UiOptions {
            ascii_only: app.ascii_only,
            high_contrast: app.high_contrast,
            reduced_motion: app.reduced_motion,
        });

        let intro = match &self.intro {
            Some(intro) => intro.timing_plan().map_err(|e| invalid(e.to_string()))?,
            None => IntroTimingPlan::default(),
        };

        let range = match &self.counter {
            Some(counter) => counter.range().map_err(|e| invalid(e.to_string()))?,
            None => CountRange::DEFAULT,
        };

        let stats = if self.stats.is_empty() {
            default_stats()
        } else {
            self.stats.clone()
        };

        Ok(Settings {
            ui,
            intro,
            range,
            stats,
        })
    }
}

impl Settings {
    /// Load and resolve the config file, applying environment overrides.
    ///
    /// Any config problem is logged and the defaults are used instead.
    #[must_use]
    pub fn load() -> Self {
        let mut settings = match OraConfig::load() {
            Ok(Some(config)) => {
                let path = config_path().unwrap_or_default();
                config.resolve(&path).unwrap_or_else(|err| {
                    tracing::warn!("{err}; using defaults");
                    Self::default()
                })
            }
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        };
        if reduced_motion_forced(env::var(REDUCED_MOTION_ENV).ok().as_deref()) {
            settings.ui.reduced_motion = true;
        }
        settings
    }
}

fn reduced_motion_forced(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true")
    )
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".ora").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;

    use super::{ConfigError, OraConfig, reduced_motion_forced};

    fn parse(toml: &str) -> OraConfig {
        toml::from_str(toml).expect("valid toml")
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = parse("").resolve(Path::new("config.toml")).unwrap();
        assert!(!settings.ui.reduced_motion);
        assert_eq!(settings.intro.hold(), Duration::from_millis(700));
        assert_eq!(settings.range.max(), 1_000_000);
        assert_eq!(settings.stats.len(), 4);
    }

    #[test]
    fn intro_overrides_keep_other_defaults() {
        let config = parse(
            r#"
            [intro]
            hold_ms = 100
            fade_ms = 0
            "#,
        );
        let plan = config.intro.as_ref().unwrap().timing_plan().unwrap();
        assert_eq!(plan.hold(), Duration::from_millis(100));
        assert_eq!(plan.spin(), Duration::from_millis(900));
        assert_eq!(plan.fade(), Duration::ZERO);
        assert_eq!(plan.elements().len(), 3);
    }

    #[test]
    fn custom_elements_replace_defaults() {
        let config = parse(
            r#"
            [intro]
            elements = [
                { label = "X", offset = { x = 3.0, y = -1.0 } },
                { label = "Y" },
            ]
            "#,
        );
        let plan = config.intro.as_ref().unwrap().timing_plan().unwrap();
        let labels: Vec<_> = plan.elements().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["X", "Y"]);
        assert_eq!(plan.elements()[1].offset.x, 0.0);
    }

    #[test]
    fn stats_and_app_section_parse() {
        let config = parse(
            r#"
            [app]
            reduced_motion = true
            ascii_only = true

            [[stats]]
            label = "Members"
            value = 1280.5
            suffix = "+"

            [[stats]]
            label = "Cities"
            value = -3
            "#,
        );
        let settings = config.resolve(Path::new("config.toml")).unwrap();
        assert!(settings.ui.reduced_motion);
        assert!(settings.ui.ascii_only);
        assert!(!settings.ui.high_contrast);
        assert_eq!(settings.stats.len(), 2);
        assert_eq!(settings.stats[0].suffix, "+");
        assert_eq!(settings.stats[1].value, -3.0);
        assert!(settings.stats[1].suffix.is_empty());
    }

    #[test]
    fn inverted_counter_range_is_invalid() {
        let config = parse(
            r#"
            [counter]
            min = 10
            max = 5
            "#,
        );
        let err = config.resolve(Path::new("/tmp/ora.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.path(), Path::new("/tmp/ora.toml"));
    }

    #[test]
    fn partial_counter_range_uses_default_bound() {
        let config = parse("[counter]\nmax = 500\n");
        let range = config.counter.as_ref().unwrap().range().unwrap();
        assert_eq!((range.min(), range.max()), (0, 500));
    }

    #[test]
    fn load_from_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[intro]\nspin_ms = 1200").unwrap();

        let config = OraConfig::load_from(file.path()).unwrap();
        assert_eq!(config.intro.unwrap().spin_ms, Some(1200));
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[intro\nhold_ms = ").unwrap();

        let err = OraConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), file.path());
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = OraConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn reduced_motion_env_values() {
        assert!(reduced_motion_forced(Some("1")));
        assert!(reduced_motion_forced(Some("TRUE")));
        assert!(!reduced_motion_forced(Some("0")));
        assert!(!reduced_motion_forced(None));
    }
}
