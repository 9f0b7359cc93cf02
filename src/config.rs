// ⚙️ Application Configuration - config.toml
// Every field has a default, so a missing file or a partial file both work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const APP_DIR: &str = "tutorial-apps";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOCAL_CONFIG_FILE: &str = "tutorial-apps.toml";

/// Upper bound on `tip.slider_steps`; stops past this collapse at f32 precision
pub const MAX_SLIDER_STEPS: u32 = 99;

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tip: TipConfig,

    #[serde(default)]
    pub counter: CounterConfig,

    #[serde(default)]
    pub card: CardConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Tip calculator form defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipConfig {
    /// Intermediate slider stops between 0% and 100%
    #[serde(default = "default_slider_steps")]
    pub slider_steps: u32,

    /// Split count the form starts with (floored at 1)
    #[serde(default = "default_split")]
    pub default_split: u32,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            slider_steps: default_slider_steps(),
            default_split: default_split(),
        }
    }
}

fn default_slider_steps() -> u32 {
    5
}

fn default_split() -> u32 {
    1
}

/// Tap counter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_tap_amount")]
    pub tap_amount: u64,

    /// Counter is "rich" strictly above this value
    #[serde(default = "default_rich_threshold")]
    pub rich_threshold: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            tap_amount: default_tap_amount(),
            rich_threshold: default_rich_threshold(),
        }
    }
}

fn default_tap_amount() -> u64 {
    1
}

fn default_rich_threshold() -> u64 {
    10
}

/// Business card profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_handle")]
    pub handle: String,

    /// Subtitle shown under every project in the portfolio
    #[serde(default = "default_project_blurb")]
    pub project_blurb: String,

    #[serde(default = "default_projects")]
    pub projects: Vec<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            title: default_title(),
            handle: default_handle(),
            project_blurb: default_project_blurb(),
            projects: default_projects(),
        }
    }
}

fn default_name() -> String {
    "Mai, Guang-Ting".to_string()
}

fn default_title() -> String {
    "Jetpack Compose Learning".to_string()
}

fn default_handle() -> String {
    "@themilesCompose".to_string()
}

fn default_project_blurb() -> String {
    "A great Project".to_string()
}

fn default_projects() -> Vec<String> {
    (1..=6).map(|i| format!("Project {}", i)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0:3000".to_string()
}

// ============================================================================
// LOADING
// ============================================================================

impl AppConfig {
    /// Standard locations, in lookup order: user config dir, then cwd
    pub fn standard_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE)),
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn find_config_path() -> Option<PathBuf> {
        Self::find_in(&Self::standard_paths())
    }

    /// First candidate that exists on disk
    pub fn find_in(candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates.iter().find(|p| p.exists()).cloned()
    }

    /// Load from an explicit path if given, otherwise search standard
    /// locations and fall back to defaults.
    ///
    /// An explicit path that does not exist is an error; a missing file in
    /// the standard locations is not.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        Self::load_first_of(&Self::standard_paths())
    }

    /// Load the first existing candidate, or defaults when none exists
    pub fn load_first_of(candidates: &[PathBuf]) -> AppResult<Self> {
        match Self::find_in(candidates) {
            Some(path) => Self::load_from_path(&path),
            None => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> AppResult<Self> {
        log::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> AppResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn check(&self) -> AppResult<()> {
        if self.tip.default_split < 1 {
            return Err(AppError::InvalidSplit(self.tip.default_split));
        }
        if self.tip.slider_steps > MAX_SLIDER_STEPS {
            return Err(AppError::Config(format!(
                "tip.slider_steps must be at most {}, got {}",
                MAX_SLIDER_STEPS, self.tip.slider_steps
            )));
        }
        if self.counter.tap_amount == 0 {
            return Err(AppError::Config("counter.tap_amount must be positive".to_string()));
        }
        Ok(())
    }
}
