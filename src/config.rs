//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/docket-diff/config.toml` (XDG) or platform config dir
//! 3. Project config: `.docket-diff.toml`, then `.docket-diff.yaml`
//! 4. Environment variables: `DOCKET_*`, nested keys split on `__`
//!    (e.g. `DOCKET_COMPARE__MODE=pairwise`)
//!
//! # Intended Usage
//!
//! **Project config** (`.docket-diff.toml` next to the case folder):
//! ```toml
//! [paths]
//! input = "input"
//! output = "output/date_diffs"
//! cache = "cache/text"
//!
//! [compare]
//! names = ["Noel", "Andy Maki", "Banister", "Russell", "Verde"]
//! mode = "baseline"
//! ```
//!
//! CLI flags are applied on top of the loaded value once at startup; after
//! that the config is shared read-only through [`crate::context::Context`].

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::models::{ComparisonMode, LawRule, RuleTable};

/// File name of the TOML project config.
pub const PROJECT_CONFIG_TOML: &str = ".docket-diff.toml";

/// File name of the YAML project config.
pub const PROJECT_CONFIG_YAML: &str = ".docket-diff.yaml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub compare: CompareConfig,
    pub tagging: TaggingConfig,
}

/// Where documents come from and where reports go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned recursively for documents.
    pub input: PathBuf,
    /// Directory receiving `index.html`, the CSV and per-date pair pages.
    pub output: PathBuf,
    /// On-disk text cache. `None` keeps the cache in memory only.
    pub cache: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input"),
            output: PathBuf::from("output/date_diffs"),
            cache: Some(PathBuf::from("cache/text")),
        }
    }
}

/// Names tracked when no list is configured.
pub const DEFAULT_NAMES: [&str; 5] = ["Noel", "Andy Maki", "Banister", "Russell", "Verde"];

/// Comparison engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Tracked names, matched case-insensitively as whole words or phrases.
    pub names: Vec<String>,
    /// Baseline-vs-rest or full pairwise comparison.
    pub mode: ComparisonMode,
    /// Documents with more tokens than this fail their pair instead of diffing.
    pub max_tokens: usize,
    /// Diff pairs on the rayon pool. Output order is unaffected.
    pub parallel: bool,
    /// File extensions (without dot) picked up by the corpus scan.
    pub extensions: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
            mode: ComparisonMode::Baseline,
            max_tokens: 200_000,
            parallel: false,
            extensions: vec!["txt".to_string(), "md".to_string(), "text".to_string()],
        }
    }
}

impl CompareConfig {
    /// Names with surrounding whitespace removed and blanks dropped, in order.
    pub fn tracked_names(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Replace the tracked names from a comma separated list.
    pub fn set_names_csv(&mut self, names: &str) {
        self.names = names
            .split(',')
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
    }
}

/// Classification rules and legal keyword lists for the `tag` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    pub rules: RuleTable,
    pub laws: Vec<LawRule>,
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env)
    /// from the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load config with project files looked up in `project_dir`.
    pub fn load_from(project_dir: &Path) -> Result<Self, ConfigError> {
        Self::figment(project_dir)
            .extract()
            .map_err(ConfigError::from)
    }

    /// The layered figment, exposed so callers can merge extra providers.
    pub fn figment(project_dir: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config (lowest priority after defaults)
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(project_dir.join(PROJECT_CONFIG_TOML)))
            .merge(Yaml::file(project_dir.join(PROJECT_CONFIG_YAML)))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("DOCKET_").split("__"))
    }

    /// User config path: ~/.config/docket-diff/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("docket-diff").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("docket-diff").join("config.toml"))
            .unwrap_or_default()
    }
}
