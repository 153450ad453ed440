//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::loader::{LoaderOptions, LoaderResult};
use crate::table::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub budget: BudgetConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Progressive loader configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    #[serde(default = "default_step")]
    pub step: usize,

    #[serde(default)]
    pub start_at: usize,

    pub seed: Option<u64>,
}

fn default_min_delay() -> u64 {
    200
}

fn default_max_delay() -> u64 {
    1500
}

fn default_step() -> usize {
    2
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            step: default_step(),
            start_at: 0,
            seed: None,
        }
    }
}

/// Table screen configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_item_count")]
    pub item_count: usize,

    #[serde(default = "default_skeleton_rows")]
    pub skeleton_rows: usize,

    #[serde(default = "default_max_rows")]
    pub max_rows: Option<usize>,
}

fn default_item_count() -> usize {
    crate::sample::ITEMS_COUNT
}

fn default_skeleton_rows() -> usize {
    10
}

fn default_max_rows() -> Option<usize> {
    Some(20)
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            item_count: default_item_count(),
            skeleton_rows: default_skeleton_rows(),
            max_rows: default_max_rows(),
        }
    }
}

/// Expense tracker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_budget")]
    pub initial_budget: u64,
}

fn default_budget() -> u64 {
    1000
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            initial_budget: default_budget(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Returns the file the config came from, or `None` when no config file
    /// exists. A config file that exists but cannot be read or parsed is an
    /// error rather than a silent fallback to defaults.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("shimmer").join("config.toml")),
            Some(PathBuf::from("/etc/shimmer/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists, falling back to defaults with
    /// environment overrides when none does
    pub fn load_first(paths: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Ok((Self::load_with_env(path)?, Some(path.clone()))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Validated loader options for this configuration
    pub fn loader_options(&self) -> LoaderResult<LoaderOptions> {
        let loader = &self.loader;
        let mut options = LoaderOptions::default()
            .delays(loader.min_delay_ms, loader.max_delay_ms)
            .step(loader.step)
            .start_at(loader.start_at);
        options.seed = loader.seed;
        options.validate()?;
        Ok(options)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            skeleton_rows: self.table.skeleton_rows,
            max_rows: self.table.max_rows,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Loader overrides
        if let Some(ms) = env_parse("SHIMMER_MIN_DELAY_MS") {
            self.loader.min_delay_ms = ms;
        }
        if let Some(ms) = env_parse("SHIMMER_MAX_DELAY_MS") {
            self.loader.max_delay_ms = ms;
        }
        if let Some(step) = env_parse("SHIMMER_STEP") {
            self.loader.step = step;
        }
        if let Some(seed) = env_parse("SHIMMER_SEED") {
            self.loader.seed = Some(seed);
        }

        // Table overrides
        if let Some(count) = env_parse("SHIMMER_ITEM_COUNT") {
            self.table.item_count = count;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("SHIMMER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SHIMMER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, value);
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Shimmer Configuration
#
# Environment variables override these settings:
# - SHIMMER_MIN_DELAY_MS
# - SHIMMER_MAX_DELAY_MS
# - SHIMMER_STEP
# - SHIMMER_SEED
# - SHIMMER_ITEM_COUNT
# - SHIMMER_LOG_LEVEL
# - SHIMMER_LOG_FORMAT

[loader]
# Bounds of the random delay between ticks (ms, inclusive)
min_delay_ms = 200
max_delay_ms = 1500

# Rows revealed per tick
step = 2

# Cursor value each start resets to
start_at = 0

# Fixed seed for reproducible tick delays and sample data
# seed = 42

[table]
# Number of generated sample items
item_count = 200

# Skeleton lines drawn before loading starts
skeleton_rows = 10

# Maximum rows drawn per frame
max_rows = 20

[budget]
# Starting budget for the expense tracker
initial_budget = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.loader.min_delay_ms, 200);
        assert_eq!(config.loader.max_delay_ms, 1500);
        assert_eq!(config.loader.step, 2);
        assert_eq!(config.table.item_count, 200);
        assert_eq!(config.budget.initial_budget, 1000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.loader.step, defaults.loader.step);
        assert_eq!(config.loader.max_delay_ms, defaults.loader.max_delay_ms);
        assert_eq!(config.table.max_rows, defaults.table.max_rows);
        assert_eq!(config.loader.seed, None);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loader]\nstep = 5\nseed = 7\n\n[logging]\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.loader.step, 5);
        assert_eq!(config.loader.seed, Some(7));
        assert_eq!(config.loader.min_delay_ms, 200);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.table.skeleton_rows, 10);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/shimmer.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loader]\nstep = \"two\"").unwrap();
        let invalid = Config::load(file.path());
        assert!(matches!(invalid, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_reports_origin_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let good = dir.path().join("good.toml");
        let broken = dir.path().join("broken.toml");
        std::fs::write(&good, "[table]\nskeleton_rows = 3\n").unwrap();
        std::fs::write(&broken, "[table\nskeleton_rows = ").unwrap();

        let (config, origin) = Config::load_first(&[missing.clone(), good.clone()]).unwrap();
        assert_eq!(origin, Some(good.clone()));
        assert_eq!(config.table.skeleton_rows, 3);

        // A broken file is reported, not skipped in favour of a later one
        let result = Config::load_first(&[broken, good]);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));

        let (config, origin) = Config::load_first(&[missing]).unwrap();
        assert_eq!(origin, None);
        assert_eq!(config.table.skeleton_rows, 10);
    }

    #[test]
    fn test_loader_options_are_validated() {
        let mut config = Config::default();
        config.loader.seed = Some(3);
        let options = config.loader_options().unwrap();
        assert_eq!(options.seed, Some(3));
        assert!(!options.auto_start);

        config.loader.min_delay_ms = 2000;
        assert!(config.loader_options().is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("SHIMMER_STEP", "4");
        std::env::set_var("SHIMMER_SEED", "not-a-number");
        let config = Config::from_env();
        std::env::remove_var("SHIMMER_STEP");
        std::env::remove_var("SHIMMER_SEED");

        assert_eq!(config.loader.step, 4);
        assert_eq!(config.loader.seed, None);
    }
}
