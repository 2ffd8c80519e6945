//! Application configuration for questform.
//!
//! User config lives at `~/.questform/questform.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuestformError, Result};
use crate::types::FormSettings;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "questform.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".questform";

// ---------------------------------------------------------------------------
// Config structs (matching questform.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Repair defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Overrides applied on top of the built-in settings overlay.
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Title used when the form title is missing or malformed.
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,

    /// Prefix for placeholder question titles (`<prefix><position>`).
    #[serde(default = "default_question_title_prefix")]
    pub question_title_prefix: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            placeholder_title: default_placeholder_title(),
            question_title_prefix: default_question_title_prefix(),
        }
    }
}

fn default_placeholder_title() -> String {
    "問診票".into()
}
fn default_question_title_prefix() -> String {
    "質問".into()
}

/// `[settings]` section. Unset keys keep the built-in value.
///
/// `is_public` / `is_trial` are not configurable; the pair is always
/// forced off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_bar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_progress_bar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_typeform_branding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_question_number: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_key_hint_on_choices: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosave_progress: Option<bool>,
}

impl SettingsConfig {
    /// Overlay the configured values onto `settings`.
    pub fn apply_to(&self, settings: &mut FormSettings) {
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }
        if let Some(progress_bar) = &self.progress_bar {
            settings.progress_bar = progress_bar.clone();
        }
        if let Some(v) = self.show_progress_bar {
            settings.show_progress_bar = v;
        }
        if let Some(v) = self.show_typeform_branding {
            settings.show_typeform_branding = v;
        }
        if let Some(v) = self.show_question_number {
            settings.show_question_number = v;
        }
        if let Some(v) = self.show_key_hint_on_choices {
            settings.show_key_hint_on_choices = v;
        }
        if let Some(v) = self.autosave_progress {
            settings.autosave_progress = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Transform config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime transform configuration.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Replacement for a missing or malformed form title.
    pub placeholder_title: String,
    /// Prefix for placeholder question titles.
    pub question_title_prefix: String,
    /// Settings overlay before the public/trial pair is forced.
    pub settings: FormSettings,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for TransformConfig {
    fn from(config: &AppConfig) -> Self {
        let mut settings = FormSettings::default();
        config.settings.apply_to(&mut settings);
        Self {
            placeholder_title: config.defaults.placeholder_title.clone(),
            question_title_prefix: config.defaults.question_title_prefix.clone(),
            settings,
        }
    }
}

impl TransformConfig {
    /// Placeholder title for the question at 1-based `position`.
    pub fn placeholder_question_title(&self, position: usize) -> String {
        format!("{}{position}", self.question_title_prefix)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.questform/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QuestformError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.questform/questform.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QuestformError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        QuestformError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| QuestformError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| QuestformError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| QuestformError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
